use std::fmt::{Display, Formatter};

use typed_builder::TypedBuilder;

use slicesim_core::agent::AgentId;
use slicesim_core::bucket::Tick;
use slicesim_models::device::select::Candidate;
use slicesim_models::net::slice::{Bandwidth, PoolId, SliceType};
use slicesim_output::tables::attempts::AttemptRecord;
use slicesim_output::tables::status::StatusRecord;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttemptOutcome {
    Connected,
    /// A candidate was chosen but its pool granted nothing.
    Rejected,
    NoCandidate,
}

impl Display for AttemptOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptOutcome::Connected => write!(f, "Connected"),
            AttemptOutcome::Rejected => write!(f, "Rejected"),
            AttemptOutcome::NoCandidate => write!(f, "NoCandidate"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// No access point met the signal thresholds of the slice.
    NoViableStation,
    /// Some access point was viable but none of its pools advertised enough bandwidth.
    NoViablePool,
    /// The chosen pool passed admission but granted nothing.
    AllocationStarved,
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NoViableStation => write!(f, "NoViableStation"),
            RejectReason::NoViablePool => write!(f, "NoViablePool"),
            RejectReason::AllocationStarved => write!(f, "AllocationStarved"),
        }
    }
}

/// Structured result of one connection attempt.
#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct AttemptResult {
    pub node_id: AgentId,
    pub tick: Tick,
    pub attempt: u32,
    pub outcome: AttemptOutcome,
    #[builder(default, setter(strip_option))]
    pub reason: Option<RejectReason>,
    #[builder(default, setter(strip_option))]
    pub access_point: Option<AgentId>,
    #[builder(default, setter(strip_option))]
    pub pool: Option<PoolId>,
    #[builder(default, setter(strip_option))]
    pub slice: Option<SliceType>,
    #[builder(default, setter(strip_option))]
    pub granted: Option<Bandwidth>,
    #[builder(default, setter(strip_option))]
    pub sinr: Option<f64>,
    #[builder(default, setter(strip_option))]
    pub rsrp: Option<f64>,
    /// Best pair that passed the signal thresholds but failed admission.
    #[builder(default)]
    pub best_rejected: Option<Candidate>,
}

impl AttemptResult {
    pub fn to_record(&self) -> AttemptRecord {
        let outcome = match self.reason {
            Some(reason) => format!("{}:{}", self.outcome, reason),
            None => self.outcome.to_string(),
        };
        AttemptRecord::builder()
            .node(self.node_id.as_u64())
            .attempt(self.attempt)
            .outcome(outcome)
            .access_point(self.access_point.map(|id| id.as_u64()))
            .slice(self.slice.map(|slice| slice.to_string()))
            .granted(self.granted.map(|bw| bw.as_f64()))
            .sinr(self.sinr)
            .rsrp(self.rsrp)
            .build()
    }
}

/// Summary of one tick: connection counts after every node was stepped, plus what happened
/// on the way.
#[derive(Clone, Debug, Default)]
pub struct TickReport {
    pub tick: Tick,
    pub connected: u64,
    pub total: u64,
    /// Connected nodes per slice, indexed by <code>SliceType::index</code>.
    pub per_slice: [u64; 3],
    pub attempts: Vec<AttemptResult>,
    pub dropped: Vec<AgentId>,
    pub exhausted: Vec<AgentId>,
}

impl TickReport {
    pub fn new(tick: Tick) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }

    pub fn connection_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.connected as f64 / self.total as f64
    }

    pub fn connected_on(&self, slice: SliceType) -> u64 {
        self.per_slice[slice.index()]
    }

    pub fn status_record(&self) -> StatusRecord {
        StatusRecord::builder()
            .connected(self.connected)
            .total(self.total)
            .embb(self.connected_on(SliceType::Embb))
            .urllc(self.connected_on(SliceType::Urllc))
            .mmtc(self.connected_on(SliceType::Mmtc))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_of_empty_report_is_zero() {
        assert_eq!(TickReport::new(Tick(3)).connection_ratio(), 0.0);
    }

    #[test]
    fn status_record_splits_slices() {
        let report = TickReport {
            tick: Tick(1),
            connected: 6,
            total: 10,
            per_slice: [3, 2, 1],
            ..Default::default()
        };
        let record = report.status_record();
        assert_eq!(record.embb, 3);
        assert_eq!(record.urllc, 2);
        assert_eq!(record.mmtc, 1);
        assert!((report.connection_ratio() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn rejection_reason_ends_up_in_record() {
        let result = AttemptResult::builder()
            .node_id(AgentId::from(4))
            .tick(Tick(2))
            .attempt(3)
            .outcome(AttemptOutcome::NoCandidate)
            .reason(RejectReason::NoViableStation)
            .build();
        assert_ne!(result.outcome, AttemptOutcome::Connected);
        assert_eq!(result.to_record().outcome(), "NoCandidate:NoViableStation");
    }
}
