use rand_pcg::Pcg64Mcg;
use slicesim_core::agent::AgentId;
use slicesim_core::metrics::Resource;
use slicesim_models::device::mobility::Point2D;
use slicesim_models::net::signal::{SignalModel, FREQUENCY_LOW_BAND};
use slicesim_models::net::slice::{PoolArena, PoolId, PoolSettings, ResourcePool, SliceType};
use slicesim_models::net::station::AccessPoint;
use slicesim_models::rand::SeedableRng;

pub const TEST_SEED: u64 = 42;

pub fn make_rng() -> Pcg64Mcg {
    Pcg64Mcg::seed_from_u64(TEST_SEED)
}

pub fn make_pool(id: u32, slice: SliceType, priority: f64, capacity: f64) -> ResourcePool {
    ResourcePool::with_settings(&PoolSettings {
        id: PoolId::from(id),
        slice,
        priority,
        capacity,
    })
}

/// A low band access point at the given position with the usual height and gain.
pub fn make_station(id: u64, x: f64, y: f64, power: f64, pools: &[u32]) -> AccessPoint {
    let mut station = AccessPoint::builder()
        .id(AgentId::from(id))
        .position(Point2D::new(x, y))
        .frequency(FREQUENCY_LOW_BAND)
        .power(power)
        .build();
    for pool in pools {
        station.add_pool(PoolId::from(*pool));
    }
    station
}

/// Arena with one pool per slice using IDs 1, 2 and 3.
pub fn make_slice_arena(capacity: f64) -> PoolArena {
    let mut arena = PoolArena::new();
    for (idx, slice) in SliceType::ALL.iter().enumerate() {
        let priority = slice.requirements().bandwidth_priority;
        arena
            .insert(make_pool(idx as u32 + 1, *slice, priority, capacity))
            .expect("pool IDs are distinct");
    }
    arena
}

pub fn deterministic_model() -> SignalModel {
    SignalModel::deterministic()
}
