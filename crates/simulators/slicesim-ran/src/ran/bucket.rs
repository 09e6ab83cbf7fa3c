use indexmap::IndexMap;
use itertools::Itertools;
use log::{debug, error, info};
use rand_pcg::Pcg64Mcg;
use typed_builder::TypedBuilder;

use slicesim_core::agent::AgentId;
use slicesim_core::bucket::{Bucket, Tick};
use slicesim_models::net::slice::SliceType;
use slicesim_output::result::Results;

use crate::ran::network::RadioNetwork;
use crate::ran::node::NodeStatus;
use crate::ran::report::{AttemptResult, TickReport};

pub const DEFAULT_DROP_PROBABILITY: f64 = 0.1;
pub const DEFAULT_TIME_STEP: f64 = 1.0;

/// Per-tick behaviour shared by all nodes.
#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct NodeBehaviour {
    #[builder(default = DEFAULT_TIME_STEP)]
    pub time_step: f64,
    #[builder(default = DEFAULT_DROP_PROBABILITY)]
    pub drop_probability: f64,
}

impl Default for NodeBehaviour {
    fn default() -> Self {
        NodeBehaviour::builder().build()
    }
}

/// Everything the nodes share: the network, the random generator and the bookkeeping of
/// the tick in progress.
#[derive(TypedBuilder)]
pub struct NetworkBucket {
    pub network: RadioNetwork,
    pub rng: Pcg64Mcg,
    #[builder(default)]
    pub behaviour: NodeBehaviour,
    #[builder(default)]
    pub results: Results,
    #[builder(default)]
    pub(crate) step: Tick,
    #[builder(default)]
    pub(crate) node_states: IndexMap<AgentId, NodeStatus>,
    #[builder(default)]
    pub(crate) report: TickReport,
    #[builder(default)]
    pub(crate) completed: Option<TickReport>,
}

impl NetworkBucket {
    pub fn now(&self) -> Tick {
        self.step
    }

    pub fn status_of(&self, node_id: &AgentId) -> Option<&NodeStatus> {
        self.node_states.get(node_id)
    }

    pub(crate) fn update_status_of(&mut self, node_id: AgentId, status: NodeStatus) {
        self.node_states.insert(node_id, status);
    }

    pub(crate) fn record_attempt(&mut self, result: AttemptResult) {
        if let Some(writer) = &mut self.results.attempts {
            writer.add_data(result.tick, result.to_record());
        }
        self.report.attempts.push(result);
    }

    pub(crate) fn record_drop(&mut self, node_id: AgentId) {
        debug!("Node {} dropped its connection", node_id);
        self.report.dropped.push(node_id);
    }

    /// The report of the last finished tick. Each report is handed out once.
    pub fn take_report(&mut self) -> Option<TickReport> {
        self.completed.take()
    }

    fn summarize(&mut self) {
        let report = &mut self.report;
        report.total = self.node_states.len() as u64;
        report.connected = self
            .node_states
            .values()
            .filter(|status| status.connected)
            .count() as u64;

        let counts = self
            .node_states
            .values()
            .filter(|status| status.connected)
            .map(|status| status.slice)
            .counts();
        report.per_slice = [0; 3];
        for slice in SliceType::ALL {
            report.per_slice[slice.index()] = counts.get(&slice).copied().unwrap_or(0) as u64;
        }

        report.exhausted = self
            .node_states
            .iter()
            .filter(|(_, status)| status.exhausted)
            .map(|(node_id, _)| *node_id)
            .collect();
    }
}

impl Bucket for NetworkBucket {
    fn initialize(&mut self, step: Tick) {
        self.step = step;
        info!(
            "Network with {} access points and {} pools",
            self.network.stations.len(),
            self.network.pools.len()
        );
    }

    fn before_agents(&mut self, step: Tick) {
        self.step = step;
        self.report = TickReport::new(step);
    }

    fn after_agents(&mut self) {
        self.summarize();
        let report = std::mem::take(&mut self.report);
        if let Some(writer) = &mut self.results.status {
            writer.add_data(report.tick, report.status_record());
        }
        info!(
            "Tick {}: {}/{} connected ({:.1}%), eMBB {}, URLLC {}, mMTC {}",
            report.tick,
            report.connected,
            report.total,
            report.connection_ratio() * 100.0,
            report.connected_on(SliceType::Embb),
            report.connected_on(SliceType::Urllc),
            report.connected_on(SliceType::Mmtc),
        );
        self.completed = Some(report);
    }

    fn stream_output(&mut self) {
        if let Err(e) = self.results.write_to_file() {
            error!("Failed to write results: {}", e);
        }
    }

    fn terminate(self) {
        if let Err(e) = self.results.close_files() {
            error!("Failed to close result files: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use slicesim_models::net::slice::PoolArena;

    use super::*;

    fn empty_bucket() -> NetworkBucket {
        NetworkBucket::builder()
            .network(
                RadioNetwork::builder()
                    .stations(Vec::new())
                    .pools(PoolArena::new())
                    .build(),
            )
            .rng(Pcg64Mcg::new(1))
            .build()
    }

    fn status(slice: SliceType, connected: bool) -> NodeStatus {
        NodeStatus {
            slice,
            connected,
            exhausted: false,
        }
    }

    #[test]
    fn report_is_built_after_agents() {
        let mut bucket = empty_bucket();
        bucket.initialize(Tick(0));
        bucket.before_agents(Tick(4));
        bucket.update_status_of(AgentId::from(1), status(SliceType::Urllc, true));
        bucket.update_status_of(AgentId::from(2), status(SliceType::Urllc, true));
        bucket.update_status_of(AgentId::from(3), status(SliceType::Embb, false));
        bucket.record_drop(AgentId::from(3));
        bucket.after_agents();

        let report = bucket.take_report().expect("finished tick");
        assert_eq!(report.tick, Tick(4));
        assert_eq!(report.connected, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.per_slice, [0, 2, 0]);
        assert_eq!(report.dropped, vec![AgentId::from(3)]);
        assert!(bucket.take_report().is_none());
    }
}
