use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::info;
use rand::distributions::{WeightedError, WeightedIndex};
use rand::prelude::Distribution;
use rand_pcg::Pcg64Mcg;
use thiserror::Error;

use slicesim_core::agent::AgentId;
use slicesim_core::bucket::Tick;
use slicesim_core::metrics::Resource;
use slicesim_core::scheduler::DefaultScheduler;
use slicesim_models::device::mobility::{Point2D, RandomWalk};
use slicesim_models::device::retry::RetryPacer;
use slicesim_models::device::select::CandidateSelector;
use slicesim_models::dist::RngSampler;
use slicesim_models::error::{ModelError, PoolError};
use slicesim_models::net::slice::{Bandwidth, PoolArena, ResourcePool, SliceType};
use slicesim_models::net::station::AccessPoint;
use slicesim_output::error::OutputError;
use slicesim_output::logger::initiate_logger;
use slicesim_output::result::Results;
use slicesim_output::ui::SimUIMetadata;

use crate::ran::bucket::{NetworkBucket, NodeBehaviour};
use crate::ran::network::RadioNetwork;
use crate::ran::node::{MobileNode, NodeInfo};
use crate::ran::simulator::Simulator;
use crate::simulation::config::{BaseConfig, BaseConfigReader, ConfigError, PopulationSettings};
use crate::simulation::ui::SimRenderer;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pool(#[from] PoolError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("invalid slice weights: {0}")]
    Weights(#[from] WeightedError),
}

pub struct SimulationBuilder {
    base_config: BaseConfig,
    config_path: PathBuf,
    metadata: SimUIMetadata,
}

impl SimulationBuilder {
    pub fn new(base_config_file: &Path) -> Result<Self, BuildError> {
        let base_config = BaseConfigReader::new(base_config_file).parse()?;
        let config_path = base_config_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let input_file = base_config_file.display().to_string();
        Ok(Self::with_config(base_config, config_path, input_file))
    }

    /// The built-in demo topology, with output paths resolved against the working directory.
    pub fn demo() -> Self {
        Self::with_config(BaseConfig::demo(), PathBuf::new(), "demo".to_string())
    }

    pub fn from_config(base_config: BaseConfig) -> Self {
        Self::with_config(base_config, PathBuf::new(), String::new())
    }

    fn with_config(base_config: BaseConfig, config_path: PathBuf, input_file: String) -> Self {
        let metadata = Self::build_metadata(&base_config, input_file);
        Self {
            base_config,
            config_path,
            metadata,
        }
    }

    fn build_metadata(base_config: &BaseConfig, input_file: String) -> SimUIMetadata {
        SimUIMetadata {
            scenario: base_config.simulation_settings.scenario.clone(),
            input_file,
            output_path: base_config
                .output_settings
                .as_ref()
                .map(|settings| settings.output_path.clone())
                .unwrap_or_default(),
            log_path: base_config
                .log_settings
                .as_ref()
                .map(|settings| settings.log_path.clone())
                .unwrap_or_default(),
        }
    }

    pub fn config(&self) -> &BaseConfig {
        &self.base_config
    }

    /// Starts the file logger when the configuration asks for one. Can only succeed once per
    /// process.
    pub fn initiate_logger(&mut self) -> Result<(), BuildError> {
        if let Some(log_settings) = &self.base_config.log_settings {
            let scenario_id = self
                .base_config
                .output_settings
                .as_ref()
                .map(|settings| settings.scenario_id);
            let log_file = initiate_logger(&self.config_path, log_settings, scenario_id)?;
            self.metadata.log_path = log_file.display().to_string();
        }
        Ok(())
    }

    pub fn build(&mut self) -> Result<Simulator, BuildError> {
        self.base_config.validate()?;
        let mut rng = Pcg64Mcg::new(self.sim_seed());

        info!("Building network...");
        let network = self.build_network()?;
        info!("Building nodes...");
        let agents = self.build_agents(&mut rng)?;
        info!("Building bucket...");
        let bucket = self.build_bucket(network, rng)?;
        Ok(Simulator::new(self.build_scheduler(agents, bucket)))
    }

    fn build_network(&self) -> Result<RadioNetwork, BuildError> {
        let mut pools = PoolArena::new();
        for pool_settings in self.base_config.pools.iter() {
            pools.insert(ResourcePool::with_settings(pool_settings))?;
        }

        let mut stations = Vec::with_capacity(self.base_config.stations.len());
        for station_settings in self.base_config.stations.iter() {
            let mut station = AccessPoint::with_settings(station_settings);
            match &station_settings.pools {
                Some(hosted) => hosted.iter().for_each(|pool_id| station.add_pool(*pool_id)),
                None => pools.ids().into_iter().for_each(|pool_id| station.add_pool(pool_id)),
            }
            stations.push(station);
        }

        Ok(RadioNetwork::builder()
            .stations(stations)
            .pools(pools)
            .model(self.base_config.signal_settings.build_model()?)
            .selector(CandidateSelector::default())
            .build())
    }

    fn build_agents(&self, rng: &mut Pcg64Mcg) -> Result<IndexMap<AgentId, MobileNode>, BuildError> {
        let mut agents = IndexMap::new();
        for node in self.base_config.nodes.iter() {
            let mobile_node = self.build_node(
                node.id,
                node.slice,
                node.bandwidth,
                Point2D::new(node.x, node.y),
                node.speed,
            );
            agents.insert(node.id, mobile_node);
        }

        if let Some(population) = &self.base_config.population {
            let first_id = agents.keys().map(AgentId::as_u64).max().unwrap_or(0) + 1;
            for mobile_node in self.build_population(population, first_id, rng)? {
                agents.insert(mobile_node.node_info.id, mobile_node);
            }
        }
        info!("Built {} nodes", agents.len());
        Ok(agents)
    }

    fn build_population(
        &self,
        population: &PopulationSettings,
        first_id: u64,
        rng: &mut Pcg64Mcg,
    ) -> Result<Vec<MobileNode>, BuildError> {
        let slices: Vec<SliceType> = population.slice_weights.iter().map(|w| w.slice).collect();
        let weights = WeightedIndex::new(population.slice_weights.iter().map(|w| w.weight))?;
        let position = RngSampler::new(&population.position)?;
        let speed = RngSampler::new(&population.speed)?;
        let bandwidth = RngSampler::new(&population.bandwidth)?;

        let mut nodes = Vec::with_capacity(population.count as usize);
        for offset in 0..u64::from(population.count) {
            let slice = slices[weights.sample(rng)];
            let start = Point2D::new(position.sample(rng), position.sample(rng));
            let required = bandwidth.sample(rng);
            let node_speed = speed.sample(rng);
            nodes.push(self.build_node(
                AgentId::from(first_id + offset),
                slice,
                required,
                start,
                node_speed,
            ));
        }
        Ok(nodes)
    }

    fn build_node(
        &self,
        node_id: AgentId,
        slice: SliceType,
        bandwidth: f64,
        position: Point2D,
        speed: f64,
    ) -> MobileNode {
        let sim = &self.base_config.simulation_settings;
        let node_info = NodeInfo::builder()
            .id(node_id)
            .slice(slice)
            .required_bandwidth(Bandwidth::new(bandwidth))
            .build();
        let pacer = RetryPacer::builder()
            .max_attempts(sim.max_attempts())
            .backoff_unit(sim.backoff_unit())
            .build();
        MobileNode::builder()
            .node_info(node_info)
            .position(position)
            .walk(RandomWalk::builder().speed(speed).build())
            .pacer(pacer)
            .build()
    }

    fn build_bucket(&self, network: RadioNetwork, rng: Pcg64Mcg) -> Result<NetworkBucket, BuildError> {
        let sim = &self.base_config.simulation_settings;
        let behaviour = NodeBehaviour::builder()
            .time_step(sim.time_step())
            .drop_probability(sim.drop_probability())
            .build();
        let results = match &self.base_config.output_settings {
            Some(output_settings) => Results::new(output_settings, &self.config_path)?,
            None => Results::disabled(),
        };
        Ok(NetworkBucket::builder()
            .network(network)
            .rng(rng)
            .behaviour(behaviour)
            .results(results)
            .build())
    }

    fn build_scheduler(
        &self,
        agents: IndexMap<AgentId, MobileNode>,
        bucket: NetworkBucket,
    ) -> DefaultScheduler<MobileNode, NetworkBucket> {
        info!("Building scheduler...");
        DefaultScheduler::builder()
            .duration(self.duration())
            .agents(agents)
            .output_interval(self.output_interval())
            .bucket(bucket)
            .build()
    }

    fn output_interval(&self) -> Tick {
        self.base_config
            .output_settings
            .as_ref()
            .map(|settings| settings.output_interval)
            .unwrap_or(Tick(1))
    }

    pub fn duration(&self) -> Tick {
        self.base_config.simulation_settings.duration
    }

    fn sim_seed(&self) -> u128 {
        u128::from(self.base_config.simulation_settings.seed)
    }

    pub fn metadata(&self) -> SimUIMetadata {
        self.metadata.clone()
    }

    pub fn renderer(&self) -> SimRenderer {
        SimRenderer::new()
    }
}
