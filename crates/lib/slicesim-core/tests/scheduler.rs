use slicesim_core::agent::AgentId;
use slicesim_core::bucket::Tick;
use slicesim_core::indexmap::IndexMap;
use slicesim_core::scheduler::{DefaultScheduler, Scheduler};
use slicesim_testutils::agent::WalkingNode;
use slicesim_testutils::bucket::TraceBucket;

fn create_scheduler(ids: &[u64]) -> DefaultScheduler<WalkingNode, TraceBucket> {
    let mut agents = IndexMap::new();
    for id in ids {
        let node = WalkingNode::with_id(*id);
        agents.insert(node.id, node);
    }
    DefaultScheduler::builder()
        .bucket(TraceBucket::default())
        .agents(agents)
        .duration(Tick::from(10u64))
        .output_interval(Tick::from(3u64))
        .build()
}

#[test]
fn test_initialize() {
    let mut scheduler = create_scheduler(&[1, 2, 3]);
    scheduler.initialize();
    assert!(scheduler.bucket.initialized);
    assert_eq!(scheduler.active_agents(), 3);
}

#[test]
fn test_trigger_advances_time() {
    let mut scheduler = create_scheduler(&[1, 2]);
    scheduler.initialize();
    assert_eq!(scheduler.trigger(), Tick::from(1u64));
    assert_eq!(scheduler.trigger(), Tick::from(2u64));
    assert_eq!(scheduler.bucket.completed_ticks, 2);
}

#[test]
fn test_agents_stepped_in_insertion_order() {
    let mut scheduler = create_scheduler(&[7, 3, 5]);
    scheduler.initialize();
    scheduler.trigger();
    let expected: Vec<AgentId> = [7u64, 3, 5].iter().map(|i| AgentId::from(*i)).collect();
    assert_eq!(scheduler.bucket.staged_at(Tick(0)), expected);
}

#[test]
fn test_every_agent_stepped_once_per_tick() {
    let mut scheduler = create_scheduler(&[1, 2, 3]);
    scheduler.initialize();
    for _ in 0..4 {
        scheduler.trigger();
    }
    assert!(scheduler.agents.values().all(|agent| agent.stages == 4));
}

#[test]
fn test_output_streamed_at_interval() {
    let mut scheduler = create_scheduler(&[1]);
    scheduler.initialize();
    for _ in 0..7 {
        scheduler.trigger();
    }
    // Ticks 0, 3 and 6.
    assert_eq!(scheduler.bucket.flushes, 3);
}

#[test]
fn test_add_agent_appends() {
    let mut scheduler = create_scheduler(&[1]);
    scheduler.add_agent(WalkingNode::with_id(9));
    assert_eq!(scheduler.active_agents(), 2);
    assert_eq!(
        scheduler.agents.keys().last().copied(),
        Some(AgentId::from(9))
    );
    assert!(scheduler.agent_of(&AgentId::from(9)).is_some());
}
