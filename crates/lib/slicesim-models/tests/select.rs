use slicesim_core::agent::AgentId;
use slicesim_models::device::mobility::Point2D;
use slicesim_models::device::select::CandidateSelector;
use slicesim_models::net::slice::{Bandwidth, PoolArena, PoolId, SliceType};
use slicesim_testutils::topology::{
    deterministic_model, make_pool, make_rng, make_slice_arena, make_station,
};

#[test]
fn only_pools_of_the_node_slice_are_candidates() {
    let arena = make_slice_arena(100.0);
    let stations = vec![make_station(1, 0.0, 0.0, 40.0, &[1, 2, 3])];
    let mut rng = make_rng();

    let evaluation = CandidateSelector::default().evaluate(
        &stations,
        &arena,
        &deterministic_model(),
        &Point2D::new(30.0, 40.0),
        SliceType::Urllc,
        Bandwidth::new(10.0),
        &mut rng,
    );
    assert_eq!(evaluation.viable_stations, 1);
    assert_eq!(evaluation.candidates.len(), 1);
    assert_eq!(evaluation.candidates[0].pool, PoolId::from(2));
    assert!((evaluation.candidates[0].available.as_f64() - 90.0).abs() < 1e-9);
}

#[test]
fn closer_station_ranks_first() {
    let arena = make_slice_arena(100.0);
    let stations = vec![
        make_station(1, 400.0, 0.0, 40.0, &[1]),
        make_station(2, 10.0, 0.0, 40.0, &[1]),
    ];
    let selector = CandidateSelector::default();
    let mut rng = make_rng();

    let evaluation = selector.evaluate(
        &stations,
        &arena,
        &deterministic_model(),
        &Point2D::new(0.0, 0.0),
        SliceType::Embb,
        Bandwidth::new(10.0),
        &mut rng,
    );
    assert_eq!(evaluation.candidates.len(), 2);
    let best = selector.select(evaluation).expect("two candidates");
    assert_eq!(best.link.target, AgentId::from(2));
}

#[test]
fn starved_pool_is_reported_as_best_rejected() {
    let mut arena = PoolArena::new();
    arena
        .insert(make_pool(1, SliceType::Embb, 0.7, 5.0))
        .expect("new pool");
    let stations = vec![make_station(1, 0.0, 0.0, 40.0, &[1])];
    let mut rng = make_rng();

    let evaluation = CandidateSelector::default().evaluate(
        &stations,
        &arena,
        &deterministic_model(),
        &Point2D::new(0.0, 0.0),
        SliceType::Embb,
        Bandwidth::new(20.0),
        &mut rng,
    );
    assert!(evaluation.candidates.is_empty());
    assert_eq!(evaluation.viable_stations, 1);
    let rejected = evaluation.best_rejected.expect("pool failed admission");
    assert!((rejected.available.as_f64() - 3.5).abs() < 1e-9);
}

#[test]
fn weak_station_is_not_viable() {
    let arena = make_slice_arena(100.0);
    let stations = vec![make_station(1, 0.0, 0.0, -100.0, &[1, 2, 3])];
    let mut rng = make_rng();

    for slice in SliceType::ALL {
        let evaluation = CandidateSelector::default().evaluate(
            &stations,
            &arena,
            &deterministic_model(),
            &Point2D::new(30.0, 40.0),
            slice,
            Bandwidth::new(5.0),
            &mut rng,
        );
        assert_eq!(evaluation.viable_stations, 0);
        assert!(evaluation.candidates.is_empty());
        assert!(evaluation.best_rejected.is_none());
    }
}

#[test]
fn unknown_hosted_pool_is_skipped() {
    let arena = make_slice_arena(100.0);
    let stations = vec![make_station(1, 0.0, 0.0, 40.0, &[9, 1])];
    let mut rng = make_rng();

    let evaluation = CandidateSelector::default().evaluate(
        &stations,
        &arena,
        &deterministic_model(),
        &Point2D::new(3.0, 4.0),
        SliceType::Embb,
        Bandwidth::new(5.0),
        &mut rng,
    );
    assert_eq!(evaluation.candidates.len(), 1);
    assert_eq!(evaluation.candidates[0].pool, PoolId::from(1));
}
