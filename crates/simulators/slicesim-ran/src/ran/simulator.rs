use log::{debug, info, warn};

use slicesim_core::agent::AgentId;
use slicesim_core::bucket::Tick;
use slicesim_core::scheduler::{DefaultScheduler, Scheduler};

use crate::ran::bucket::NetworkBucket;
use crate::ran::network::RadioNetwork;
use crate::ran::node::MobileNode;
use crate::ran::report::TickReport;

pub type RanScheduler = DefaultScheduler<MobileNode, NetworkBucket>;

/// Drives the tick loop. Nodes are stepped one after another in the order they were added,
/// and every tick ends with a report of the connection counts.
pub struct Simulator {
    scheduler: RanScheduler,
    initialized: bool,
}

impl Simulator {
    pub fn new(scheduler: RanScheduler) -> Self {
        Self {
            scheduler,
            initialized: false,
        }
    }

    pub fn initialize(&mut self) {
        if self.initialized {
            return;
        }
        self.scheduler.initialize();
        self.initialized = true;
    }

    pub fn tick(&mut self) -> TickReport {
        self.initialize();
        let now = self.scheduler.now;
        self.scheduler.trigger();
        self.scheduler.bucket.take_report().unwrap_or_else(|| {
            warn!("Tick {} finished without a report", now);
            TickReport::new(now)
        })
    }

    pub fn run(&mut self, steps: u64) -> Vec<TickReport> {
        info!("Running {} ticks", steps);
        (0..steps).map(|_| self.tick()).collect()
    }

    /// Clears the attempt counter of a node so that it tries to connect again. Returns false
    /// when the node is unknown.
    pub fn reset_node(&mut self, node_id: &AgentId) -> bool {
        match self.scheduler.agent_mut(node_id) {
            Some(node) => {
                debug!("Resetting node {}", node_id);
                node.reset();
                true
            }
            None => false,
        }
    }

    pub fn node(&self, node_id: &AgentId) -> Option<&MobileNode> {
        self.scheduler.agent_of(node_id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &MobileNode> {
        self.scheduler.agents.values()
    }

    pub fn network(&self) -> &RadioNetwork {
        &self.scheduler.bucket.network
    }

    pub fn now(&self) -> Tick {
        self.scheduler.now
    }

    pub fn duration(&self) -> Tick {
        self.scheduler.duration()
    }

    pub fn node_count(&self) -> u64 {
        self.scheduler.active_agents()
    }

    pub fn terminate(self) {
        self.scheduler.terminate();
    }
}
