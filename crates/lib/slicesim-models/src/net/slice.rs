use std::fmt::{Display, Formatter};
use std::ops::{Add, Mul, Sub};

use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;

use slicesim_core::metrics::{Feasibility, Metric, MetricSettings, Resource};

use crate::error::PoolError;
use crate::net::signal::SignalMetrics;

/// Requests below this amount are refused outright.
pub const BANDWIDTH_FLOOR: f64 = 0.1;

const RELEASE_TOLERANCE: f64 = 1e-9;

#[derive(Deserialize, Debug, Hash, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SliceType {
    #[serde(rename = "eMBB", alias = "embb")]
    Embb,
    #[serde(rename = "URLLC", alias = "urllc")]
    Urllc,
    #[serde(rename = "mMTC", alias = "mmtc")]
    Mmtc,
}

impl Display for SliceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SliceType::Embb => write!(f, "eMBB"),
            SliceType::Urllc => write!(f, "URLLC"),
            SliceType::Mmtc => write!(f, "mMTC"),
        }
    }
}

impl SliceType {
    pub const ALL: [SliceType; 3] = [SliceType::Embb, SliceType::Urllc, SliceType::Mmtc];

    pub fn requirements(&self) -> SliceRequirements {
        match self {
            SliceType::Embb => SliceRequirements {
                min_sinr: 5.0,
                min_rsrp: -110.0,
                bandwidth_priority: 0.7,
            },
            SliceType::Urllc => SliceRequirements {
                min_sinr: 10.0,
                min_rsrp: -105.0,
                bandwidth_priority: 0.9,
            },
            SliceType::Mmtc => SliceRequirements {
                min_sinr: 0.0,
                min_rsrp: -120.0,
                bandwidth_priority: 0.3,
            },
        }
    }

    pub fn index(&self) -> usize {
        match self {
            SliceType::Embb => 0,
            SliceType::Urllc => 1,
            SliceType::Mmtc => 2,
        }
    }
}

/// Signal quality a link must reach before a node of the slice type will consider it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliceRequirements {
    pub min_sinr: f64,
    pub min_rsrp: f64,
    pub bandwidth_priority: f64,
}

impl SliceRequirements {
    pub fn check(&self, metrics: &SignalMetrics) -> Feasibility<SignalMetrics> {
        if metrics.sinr >= self.min_sinr && metrics.rsrp >= self.min_rsrp {
            Feasibility::Feasible(*metrics)
        } else {
            Feasibility::Infeasible(*metrics)
        }
    }
}

/// Bandwidth in MHz.
#[derive(Deserialize, Default, Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Bandwidth(f64);

impl Metric for Bandwidth {}

impl Bandwidth {
    pub fn new(value: f64) -> Self {
        Self(value)
    }
    pub fn as_f64(&self) -> f64 {
        self.0
    }
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }
    pub fn is_zero(&self) -> bool {
        self.0 == 0.0
    }
}

impl Display for Bandwidth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Bandwidth {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Bandwidth {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul<f64> for Bandwidth {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u32);

impl From<u32> for PoolId {
    fn from(f: u32) -> Self {
        Self(f)
    }
}

impl Display for PoolId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct PoolSettings {
    pub id: PoolId,
    pub slice: SliceType,
    pub priority: f64,
    pub capacity: f64,
}

impl MetricSettings for PoolSettings {}

impl PoolSettings {
    pub fn validate(&self) -> Result<(), PoolError> {
        if !(0.0..=1.0).contains(&self.priority) {
            return Err(PoolError::InvalidPriority {
                pool: self.id,
                priority: self.priority,
            });
        }
        if !self.capacity.is_finite() || self.capacity < 0.0 {
            return Err(PoolError::InvalidCapacity {
                pool: self.id,
                capacity: self.capacity,
            });
        }
        Ok(())
    }
}

/// A network slice: a share of bandwidth reserved for one service type.
///
/// The pool advertises <code>remaining * priority</code> rather than the raw remainder, and a
/// single grant never exceeds that figure. Every grant stays debited until it is released.
#[derive(Clone, Debug)]
pub struct ResourcePool {
    id: PoolId,
    slice: SliceType,
    priority: f64,
    capacity: Bandwidth,
    remaining: Bandwidth,
}

impl Resource<Bandwidth> for ResourcePool {
    type S = PoolSettings;
    type E = PoolError;

    fn with_settings(settings: &PoolSettings) -> Self {
        let capacity = Bandwidth::new(settings.capacity);
        Self {
            id: settings.id,
            slice: settings.slice,
            priority: settings.priority,
            capacity,
            remaining: capacity,
        }
    }

    fn consume(&mut self, request: Bandwidth) -> Feasibility<Bandwidth> {
        // Written so that NaN requests are refused as well.
        if !(request.as_f64() >= BANDWIDTH_FLOOR) {
            return Feasibility::Infeasible(self.available());
        }
        let granted = request.min(self.available());
        if !(granted.as_f64() > 0.0) {
            return Feasibility::Infeasible(self.available());
        }
        self.remaining = self.remaining - granted;
        debug!(
            "Pool {} granted {} of {}, {} left",
            self.id, granted, request, self.remaining
        );
        Feasibility::Feasible(granted)
    }

    fn release(&mut self, amount: Bandwidth) -> Result<(), PoolError> {
        if !(amount.as_f64() >= 0.0) {
            return Err(PoolError::InvalidAmount {
                pool: self.id,
                amount: amount.as_f64(),
            });
        }
        let restored = self.remaining + amount;
        if restored.as_f64() > self.capacity.as_f64() + RELEASE_TOLERANCE {
            return Err(PoolError::OverRelease {
                pool: self.id,
                amount: amount.as_f64(),
                remaining: self.remaining.as_f64(),
                capacity: self.capacity.as_f64(),
            });
        }
        self.remaining = restored.min(self.capacity);
        Ok(())
    }

    fn available(&self) -> Bandwidth {
        self.remaining * self.priority
    }
}

impl ResourcePool {
    pub fn id(&self) -> PoolId {
        self.id
    }

    pub fn slice(&self) -> SliceType {
        self.slice
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn capacity(&self) -> Bandwidth {
        self.capacity
    }

    pub fn remaining(&self) -> Bandwidth {
        self.remaining
    }

    /// Priority weighted availability. This is the figure demand is compared against.
    pub fn check_available(&self) -> Bandwidth {
        self.available()
    }

    /// Grants up to the advertised availability and returns the granted amount, which is
    /// zero when the request is refused.
    pub fn allocate(&mut self, requested: Bandwidth) -> Bandwidth {
        match self.consume(requested) {
            Feasibility::Feasible(granted) => granted,
            Feasibility::Infeasible(_) => Bandwidth::default(),
        }
    }
}

/// All the pools of the simulation, addressed by their stable IDs. Access points and
/// connections only hold IDs, so every change is visible through every holder.
#[derive(Clone, Debug, Default)]
pub struct PoolArena {
    pools: IndexMap<PoolId, ResourcePool>,
}

impl PoolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pool: ResourcePool) -> Result<PoolId, PoolError> {
        let pool_id = pool.id();
        if self.pools.contains_key(&pool_id) {
            return Err(PoolError::DuplicatePool(pool_id));
        }
        self.pools.insert(pool_id, pool);
        Ok(pool_id)
    }

    pub fn get(&self, pool_id: &PoolId) -> Option<&ResourcePool> {
        self.pools.get(pool_id)
    }

    pub fn get_mut(&mut self, pool_id: &PoolId) -> Option<&mut ResourcePool> {
        self.pools.get_mut(pool_id)
    }

    pub fn ids(&self) -> Vec<PoolId> {
        self.pools.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourcePool> {
        self.pools.values()
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn available(&self, pool_id: &PoolId) -> Result<Bandwidth, PoolError> {
        self.get(pool_id)
            .map(|pool| pool.check_available())
            .ok_or(PoolError::UnknownPool(*pool_id))
    }

    pub fn allocate(&mut self, pool_id: &PoolId, requested: Bandwidth) -> Result<Bandwidth, PoolError> {
        self.get_mut(pool_id)
            .map(|pool| pool.allocate(requested))
            .ok_or(PoolError::UnknownPool(*pool_id))
    }

    pub fn release(&mut self, pool_id: &PoolId, amount: Bandwidth) -> Result<(), PoolError> {
        self.get_mut(pool_id)
            .ok_or(PoolError::UnknownPool(*pool_id))?
            .release(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(capacity: f64, priority: f64) -> ResourcePool {
        ResourcePool::with_settings(&PoolSettings {
            id: PoolId::from(1),
            slice: SliceType::Embb,
            priority,
            capacity,
        })
    }

    #[test]
    fn advertises_priority_weighted_availability() {
        let pool = pool(100.0, 0.7);
        assert!((pool.check_available().as_f64() - 70.0).abs() < 1e-9);
        assert_eq!(pool.remaining(), Bandwidth::new(100.0));
    }

    #[test]
    fn grant_is_capped_by_weighted_availability() {
        let mut pool = pool(100.0, 0.5);
        let granted = pool.allocate(Bandwidth::new(80.0));
        assert_eq!(granted, Bandwidth::new(50.0));
        assert_eq!(pool.remaining(), Bandwidth::new(50.0));
    }

    #[test]
    fn requests_below_floor_are_refused() {
        let mut pool = pool(100.0, 1.0);
        for request in [0.0, 0.05, 0.0999] {
            assert!(pool.allocate(Bandwidth::new(request)).is_zero());
        }
        assert!(pool.allocate(Bandwidth::new(f64::NAN)).is_zero());
        assert_eq!(pool.remaining(), Bandwidth::new(100.0));
        assert_eq!(pool.allocate(Bandwidth::new(0.1)), Bandwidth::new(0.1));
    }

    #[test]
    fn grants_never_drive_remaining_negative() {
        let mut pool = pool(30.0, 0.9);
        for _ in 0..100 {
            let before = pool.remaining().as_f64();
            let granted = pool.allocate(Bandwidth::new(7.0)).as_f64();
            assert!(granted <= 7.0);
            assert!(granted <= before * 0.9 + 1e-12);
            assert!(pool.remaining().as_f64() >= 0.0);
        }
    }

    #[test]
    fn balanced_sequence_restores_capacity() {
        let mut pool = pool(200.0, 0.3);
        let grants: Vec<Bandwidth> = [10.0, 24.0, 5.0, 17.5]
            .iter()
            .map(|r| pool.allocate(Bandwidth::new(*r)))
            .collect();
        assert!(pool.remaining().as_f64() < 200.0);
        for granted in grants.into_iter().rev() {
            pool.release(granted).expect("balanced release");
        }
        assert!((pool.remaining().as_f64() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn over_release_is_rejected() {
        let mut pool = pool(100.0, 0.7);
        let granted = pool.allocate(Bandwidth::new(20.0));
        pool.release(granted).expect("first release");
        let err = pool.release(granted).unwrap_err();
        assert!(matches!(err, PoolError::OverRelease { .. }));
        assert_eq!(pool.remaining(), Bandwidth::new(100.0));
        assert!(matches!(
            pool.release(Bandwidth::new(-1.0)),
            Err(PoolError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn thresholds_per_slice() {
        let embb = SliceType::Embb.requirements();
        let pass = SignalMetrics {
            sinr: 5.0,
            rsrp: -110.0,
            rssi: 0.0,
        };
        assert!(embb.check(&pass).is_feasible());
        let weak = SignalMetrics {
            sinr: 4.99,
            ..pass
        };
        assert!(!embb.check(&weak).is_feasible());
        assert!(!SliceType::Urllc.requirements().check(&pass).is_feasible());
        assert!(SliceType::Mmtc.requirements().check(&pass).is_feasible());
        assert!(!embb.check(&SignalMetrics::unreachable()).is_feasible());
    }

    #[test]
    fn settings_validation() {
        let mut settings = PoolSettings {
            id: PoolId::from(4),
            slice: SliceType::Urllc,
            priority: 1.2,
            capacity: 10.0,
        };
        assert!(matches!(
            settings.validate(),
            Err(PoolError::InvalidPriority { .. })
        ));
        settings.priority = 0.9;
        settings.capacity = -1.0;
        assert!(matches!(
            settings.validate(),
            Err(PoolError::InvalidCapacity { .. })
        ));
        settings.capacity = 10.0;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn arena_shares_state_by_id() {
        let mut arena = PoolArena::new();
        let id = arena.insert(pool(100.0, 0.7)).expect("new pool");
        assert!(matches!(
            arena.insert(pool(5.0, 0.1)),
            Err(PoolError::DuplicatePool(_))
        ));
        let granted = arena.allocate(&id, Bandwidth::new(20.0)).expect("known pool");
        assert_eq!(granted, Bandwidth::new(20.0));
        assert_eq!(arena.get(&id).map(|p| p.remaining()), Some(Bandwidth::new(80.0)));
        arena.release(&id, granted).expect("release");
        assert_eq!(arena.get(&id).map(|p| p.remaining()), Some(Bandwidth::new(100.0)));
        assert_eq!(
            arena.release(&PoolId::from(9), granted),
            Err(PoolError::UnknownPool(PoolId::from(9)))
        );
    }
}
