use rand::Rng;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use slicesim_core::agent::AgentId;

use crate::device::mobility::Point2D;
use crate::net::signal::{RadioSite, SignalMetrics, SignalModel};
use crate::net::slice::PoolId;

pub const DEFAULT_HEIGHT_M: f64 = 25.0;
pub const DEFAULT_ANTENNA_GAIN_DBI: f64 = 10.0;

#[serde_with::skip_serializing_none]
#[derive(Deserialize, Debug, Clone)]
pub struct StationSettings {
    pub id: AgentId,
    pub x: f64,
    pub y: f64,
    pub frequency: f64,
    pub power: f64,
    pub height: Option<f64>,
    pub antenna_gain: Option<f64>,
    pub pools: Option<Vec<PoolId>>,
}

/// A base station. Its radio parameters are fixed, the only thing that changes after
/// construction is the list of pools it hosts, and only during setup.
#[derive(Clone, Debug, TypedBuilder)]
pub struct AccessPoint {
    pub id: AgentId,
    pub position: Point2D,
    pub frequency: f64,
    pub power: f64,
    #[builder(default = DEFAULT_HEIGHT_M)]
    pub height: f64,
    #[builder(default = DEFAULT_ANTENNA_GAIN_DBI)]
    pub antenna_gain: f64,
    #[builder(default)]
    hosted_pools: Vec<PoolId>,
}

impl AccessPoint {
    /// Builds the access point without any hosted pool; the pools listed in the settings
    /// are attached by the caller once the arena is known.
    pub fn with_settings(settings: &StationSettings) -> Self {
        AccessPoint::builder()
            .id(settings.id)
            .position(Point2D::new(settings.x, settings.y))
            .frequency(settings.frequency)
            .power(settings.power)
            .height(settings.height.unwrap_or(DEFAULT_HEIGHT_M))
            .antenna_gain(settings.antenna_gain.unwrap_or(DEFAULT_ANTENNA_GAIN_DBI))
            .build()
    }

    pub fn site(&self) -> RadioSite {
        RadioSite {
            position: self.position,
            height: self.height,
            frequency: self.frequency,
            power: self.power,
            antenna_gain: self.antenna_gain,
        }
    }

    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        model: &SignalModel,
        ue_position: &Point2D,
        rng: &mut R,
    ) -> SignalMetrics {
        model.compute_metrics(&self.site(), ue_position, rng)
    }

    pub fn hosted_pools(&self) -> &[PoolId] {
        &self.hosted_pools
    }

    pub fn add_pool(&mut self, pool_id: PoolId) {
        if !self.hosted_pools.contains(&pool_id) {
            self.hosted_pools.push(pool_id);
        }
    }
}
