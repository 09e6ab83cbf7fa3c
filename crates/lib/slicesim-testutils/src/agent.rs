use slicesim_core::agent::{Agent, AgentId, MobilityInfo, Movable};

use crate::bucket::TraceBucket;

#[derive(Copy, Clone, Default, Debug)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl MobilityInfo for Position {}

/// Walks one unit along x per tick and leaves its id in the bucket trace.
#[derive(Default, Clone, Debug)]
pub struct WalkingNode {
    pub id: AgentId,
    pub position: Position,
    pub stages: u32,
}

impl WalkingNode {
    pub fn with_id(id: u64) -> Self {
        Self {
            id: AgentId::from(id),
            ..Default::default()
        }
    }
}

impl Movable<TraceBucket> for WalkingNode {
    type M = Position;

    fn mobility(&self) -> &Self::M {
        &self.position
    }

    fn set_mobility(&mut self, _bucket: &mut TraceBucket) {
        self.position.x += 1.0;
    }
}

impl Agent<TraceBucket> for WalkingNode {
    fn id(&self) -> AgentId {
        self.id
    }

    fn stage_one(&mut self, bucket: &mut TraceBucket) {
        self.set_mobility(bucket);
        self.stages += 1;
        bucket.trace.push((bucket.now, self.id));
    }
}
