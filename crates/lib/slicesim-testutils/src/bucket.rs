use slicesim_core::agent::AgentId;
use slicesim_core::bucket::{Bucket, Tick};

/// Records every hook the scheduler fires, and which node was staged at which tick.
#[derive(Default, Clone, Debug)]
pub struct TraceBucket {
    pub now: Tick,
    pub initialized: bool,
    pub trace: Vec<(Tick, AgentId)>,
    pub completed_ticks: u32,
    pub flushes: u32,
}

impl TraceBucket {
    pub fn staged_at(&self, tick: Tick) -> Vec<AgentId> {
        self.trace
            .iter()
            .filter(|(at, _)| *at == tick)
            .map(|(_, id)| *id)
            .collect()
    }
}

impl Bucket for TraceBucket {
    fn initialize(&mut self, tick: Tick) {
        self.now = tick;
        self.initialized = true;
    }

    fn before_agents(&mut self, tick: Tick) {
        self.now = tick;
    }

    fn after_agents(&mut self) {
        self.completed_ticks += 1;
    }

    fn stream_output(&mut self) {
        self.flushes += 1;
    }

    fn terminate(self) {}
}
