use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use slicesim_core::agent::AgentId;
use slicesim_core::bucket::Tick;
use slicesim_models::device::retry::MAX_CONNECTION_ATTEMPTS;
use slicesim_models::dist::DistParams;
use slicesim_models::error::{ModelError, PoolError};
use slicesim_models::net::signal::{
    Shadowing, ShadowingSettings, SignalModel, FREQUENCY_LOW_BAND, FREQUENCY_MMWAVE,
    INTERFERENCE_DBM, UE_HEIGHT_M,
};
use slicesim_models::net::slice::{PoolId, PoolSettings, SliceType};
use slicesim_models::net::station::StationSettings;
use slicesim_output::logger::LogSettings;
use slicesim_output::result::OutputSettings;

use crate::ran::bucket::{DEFAULT_DROP_PROBABILITY, DEFAULT_TIME_STEP};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("station {station} hosts unknown pool {pool}")]
    UnknownPool { station: AgentId, pool: PoolId },
    #[error("station {0} is configured twice")]
    DuplicateStation(AgentId),
    #[error("node {0} is configured twice")]
    DuplicateNode(AgentId),
    #[error("node {node}: {reason}")]
    InvalidNode { node: AgentId, reason: String },
    #[error("slice weights must not be empty")]
    EmptySliceWeights,
    #[error("weight {weight} of slice {slice} must be a non-negative number")]
    InvalidWeight { slice: SliceType, weight: f64 },
    #[error("drop probability {0} is outside [0, 1]")]
    InvalidProbability(f64),
    #[error("time step {0} must be a positive number")]
    InvalidTimeStep(f64),
    #[error("at least one connection attempt must be allowed")]
    NoAttempts,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BaseConfig {
    pub simulation_settings: SimSettings,
    #[serde(default)]
    pub signal_settings: SignalSettings,
    pub stations: Vec<StationSettings>,
    pub pools: Vec<PoolSettings>,
    #[serde(default)]
    pub nodes: Vec<NodeSettings>,
    pub population: Option<PopulationSettings>,
    pub log_settings: Option<LogSettings>,
    pub output_settings: Option<OutputSettings>,
}

#[serde_with::skip_serializing_none]
#[derive(Deserialize, Debug, Clone)]
pub struct SimSettings {
    pub scenario: String,
    pub duration: Tick,
    pub seed: u64,
    pub time_step: Option<f64>,
    pub drop_probability: Option<f64>,
    pub max_attempts: Option<u32>,
    pub backoff_unit: Option<Tick>,
}

impl SimSettings {
    pub fn time_step(&self) -> f64 {
        self.time_step.unwrap_or(DEFAULT_TIME_STEP)
    }

    pub fn drop_probability(&self) -> f64 {
        self.drop_probability.unwrap_or(DEFAULT_DROP_PROBABILITY)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.unwrap_or(MAX_CONNECTION_ATTEMPTS)
    }

    pub fn backoff_unit(&self) -> Tick {
        self.backoff_unit.unwrap_or(Tick(1))
    }
}

#[serde_with::skip_serializing_none]
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SignalSettings {
    pub shadowing: Option<ShadowingSettings>,
    pub ue_height: Option<f64>,
    pub interference: Option<f64>,
}

impl SignalSettings {
    pub fn build_model(&self) -> Result<SignalModel, ModelError> {
        let shadowing = Shadowing::with_settings(&self.shadowing.clone().unwrap_or_default())?;
        Ok(SignalModel::new(
            shadowing,
            self.interference.unwrap_or(INTERFERENCE_DBM),
            self.ue_height.unwrap_or(UE_HEIGHT_M),
        ))
    }
}

/// A node placed explicitly.
#[derive(Deserialize, Debug, Clone)]
pub struct NodeSettings {
    pub id: AgentId,
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    pub slice: SliceType,
    pub bandwidth: f64,
}

/// Randomly generated nodes. IDs continue after the highest explicit node ID.
#[derive(Deserialize, Debug, Clone)]
pub struct PopulationSettings {
    pub count: u32,
    pub position: DistParams,
    pub speed: DistParams,
    pub bandwidth: DistParams,
    pub slice_weights: Vec<SliceWeight>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct SliceWeight {
    pub slice: SliceType,
    pub weight: f64,
}

impl BaseConfig {
    /// Four access points at the corners of a 1 km square, alternating between low band and
    /// mmWave, every one of them hosting the three slices, and 50 random nodes.
    pub fn demo() -> Self {
        let corners = [
            (1, 0.0, 0.0, FREQUENCY_LOW_BAND, 40.0),
            (2, 1000.0, 1000.0, FREQUENCY_MMWAVE, 30.0),
            (3, 0.0, 1000.0, FREQUENCY_LOW_BAND, 40.0),
            (4, 1000.0, 0.0, FREQUENCY_MMWAVE, 30.0),
        ];
        let stations = corners
            .iter()
            .map(|(id, x, y, frequency, power)| StationSettings {
                id: AgentId::from(*id),
                x: *x,
                y: *y,
                frequency: *frequency,
                power: *power,
                height: None,
                antenna_gain: None,
                pools: None,
            })
            .collect();

        let pools = [
            (1, SliceType::Embb, 100.0),
            (2, SliceType::Urllc, 50.0),
            (3, SliceType::Mmtc, 200.0),
        ]
        .iter()
        .map(|(id, slice, capacity)| PoolSettings {
            id: PoolId::from(*id),
            slice: *slice,
            priority: slice.requirements().bandwidth_priority,
            capacity: *capacity,
        })
        .collect();

        let population = PopulationSettings {
            count: 50,
            position: DistParams::uniform(0.0, 1000.0),
            speed: DistParams::uniform(1.0, 6.0).integer(),
            bandwidth: DistParams::uniform(5.0, 25.0).integer(),
            slice_weights: vec![
                SliceWeight {
                    slice: SliceType::Embb,
                    weight: 70.0,
                },
                SliceWeight {
                    slice: SliceType::Urllc,
                    weight: 20.0,
                },
                SliceWeight {
                    slice: SliceType::Mmtc,
                    weight: 10.0,
                },
            ],
        };

        Self {
            simulation_settings: SimSettings {
                scenario: "demo".to_string(),
                duration: Tick(10),
                seed: 42,
                time_step: None,
                drop_probability: None,
                max_attempts: None,
                backoff_unit: None,
            },
            signal_settings: SignalSettings::default(),
            stations,
            pools,
            nodes: Vec::new(),
            population: Some(population),
            log_settings: None,
            output_settings: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation_settings;
        if !(sim.time_step() > 0.0 && sim.time_step().is_finite()) {
            return Err(ConfigError::InvalidTimeStep(sim.time_step()));
        }
        if !(0.0..=1.0).contains(&sim.drop_probability()) {
            return Err(ConfigError::InvalidProbability(sim.drop_probability()));
        }
        if sim.max_attempts() == 0 {
            return Err(ConfigError::NoAttempts);
        }

        let mut pool_ids = HashSet::new();
        for pool in self.pools.iter() {
            pool.validate()?;
            if !pool_ids.insert(pool.id) {
                return Err(PoolError::DuplicatePool(pool.id).into());
            }
        }

        let mut station_ids = HashSet::new();
        for station in self.stations.iter() {
            if !station_ids.insert(station.id) {
                return Err(ConfigError::DuplicateStation(station.id));
            }
            for pool in station.pools.iter().flatten() {
                if !pool_ids.contains(pool) {
                    return Err(ConfigError::UnknownPool {
                        station: station.id,
                        pool: *pool,
                    });
                }
            }
        }

        let mut node_ids = HashSet::new();
        for node in self.nodes.iter() {
            if !node_ids.insert(node.id) {
                return Err(ConfigError::DuplicateNode(node.id));
            }
            if !(node.bandwidth.is_finite() && node.bandwidth >= 0.0) {
                return Err(ConfigError::InvalidNode {
                    node: node.id,
                    reason: format!("bandwidth {} must be a non-negative number", node.bandwidth),
                });
            }
            if !(node.speed.is_finite() && node.speed >= 0.0) {
                return Err(ConfigError::InvalidNode {
                    node: node.id,
                    reason: format!("speed {} must be a non-negative number", node.speed),
                });
            }
        }

        if let Some(population) = &self.population {
            if population.slice_weights.is_empty() {
                return Err(ConfigError::EmptySliceWeights);
            }
            for entry in population.slice_weights.iter() {
                if !(entry.weight.is_finite() && entry.weight >= 0.0) {
                    return Err(ConfigError::InvalidWeight {
                        slice: entry.slice,
                        weight: entry.weight,
                    });
                }
            }
        }

        self.signal_settings.build_model()?;
        Ok(())
    }
}

pub struct BaseConfigReader {
    file_path: PathBuf,
}

impl BaseConfigReader {
    pub fn new(file_name: &Path) -> Self {
        Self {
            file_path: file_name.to_path_buf(),
        }
    }

    pub fn parse(&self) -> Result<BaseConfig, ConfigError> {
        let content =
            std::fs::read_to_string(&self.file_path).map_err(|source| ConfigError::Read {
                path: self.file_path.clone(),
                source,
            })?;
        let config = Self::parse_str(&content)?;
        Ok(config)
    }

    pub fn parse_str(content: &str) -> Result<BaseConfig, ConfigError> {
        let config: BaseConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}
