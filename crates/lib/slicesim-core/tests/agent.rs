use slicesim_core::agent::{Agent, AgentId, Movable};
use slicesim_core::bucket::{Bucket, Tick};
use slicesim_testutils::agent::WalkingNode;
use slicesim_testutils::bucket::TraceBucket;

#[test]
fn node_keeps_its_id() {
    let node = WalkingNode::with_id(1);
    assert_eq!(node.id(), AgentId::from(1));
}

#[test]
fn stage_one_moves_and_records() {
    let mut node = WalkingNode::with_id(1);
    let mut bucket = TraceBucket::default();
    bucket.before_agents(Tick(0));
    node.stage_one(&mut bucket);
    bucket.before_agents(Tick(1));
    node.stage_one(&mut bucket);

    assert_eq!(node.stages, 2);
    assert_eq!(node.mobility().x, 2.0);
    assert_eq!(bucket.staged_at(Tick(1)), vec![AgentId::from(1)]);
    assert_eq!(bucket.trace.len(), 2);
}
