use slicesim_core::agent::AgentId;
use slicesim_models::net::slice::{PoolId, SliceType};
use slicesim_ran::simulation::builder::{BuildError, SimulationBuilder};
use slicesim_ran::simulation::config::{BaseConfig, BaseConfigReader, ConfigError, NodeSettings};

#[test]
fn demo_topology_matches_the_reference_layout() {
    let simulator = SimulationBuilder::demo().build().expect("demo builds");
    let network = simulator.network();
    assert_eq!(network.stations.len(), 4);
    for station in network.stations.iter() {
        assert_eq!(
            station.hosted_pools(),
            &[PoolId::from(1), PoolId::from(2), PoolId::from(3)]
        );
        assert_eq!(station.height, 25.0);
    }

    let ids: Vec<u64> = simulator.nodes().map(|node| node.info().id.as_u64()).collect();
    assert_eq!(ids, (1..=50).collect::<Vec<u64>>());
    for node in simulator.nodes() {
        let position = node.position();
        assert!((0.0..1000.0).contains(&position.x));
        assert!((0.0..1000.0).contains(&position.y));
        let bandwidth = node.info().required_bandwidth.as_f64();
        assert!((5.0..25.0).contains(&bandwidth));
        assert_eq!(bandwidth, bandwidth.floor());
    }
}

#[test]
fn population_ids_follow_explicit_nodes() {
    let mut config = BaseConfig::demo();
    config.nodes.push(NodeSettings {
        id: AgentId::from(100),
        x: 1.0,
        y: 2.0,
        speed: 0.0,
        slice: SliceType::Urllc,
        bandwidth: 12.0,
    });
    if let Some(population) = config.population.as_mut() {
        population.count = 3;
    }
    let simulator = SimulationBuilder::from_config(config).build().expect("builds");
    let ids: Vec<u64> = simulator.nodes().map(|node| node.info().id.as_u64()).collect();
    assert_eq!(ids, vec![100, 101, 102, 103]);
    let first = simulator.node(&AgentId::from(100)).expect("explicit node");
    assert_eq!(first.info().slice, SliceType::Urllc);
}

#[test]
fn zero_weights_fail_the_build() {
    let mut config = BaseConfig::demo();
    if let Some(population) = config.population.as_mut() {
        population.slice_weights.iter_mut().for_each(|w| w.weight = 0.0);
    }
    assert!(matches!(
        SimulationBuilder::from_config(config).build(),
        Err(BuildError::Weights(_))
    ));
}

#[test]
fn bundled_scenario_parses() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("configs/campus.toml");
    let config = BaseConfigReader::new(&path).parse().expect("campus config");
    assert_eq!(config.stations.len(), 4);
    assert_eq!(config.stations[1].pools.as_deref(), Some(&[PoolId::from(1), PoolId::from(2)][..]));
    assert_eq!(config.population.as_ref().map(|p| p.count), Some(60));
    assert!(config.output_settings.is_some());
}

#[test]
fn missing_file_is_a_read_error() {
    let result = SimulationBuilder::new(std::path::Path::new("does/not/exist.toml"));
    assert!(matches!(
        result,
        Err(BuildError::Config(ConfigError::Read { .. }))
    ));
}
