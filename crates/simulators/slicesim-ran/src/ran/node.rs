use log::{debug, error, warn};
use rand::Rng;
use typed_builder::TypedBuilder;

use slicesim_core::agent::{Agent, AgentId, Movable};
use slicesim_core::bucket::Tick;
use slicesim_models::device::mobility::{Point2D, RandomWalk};
use slicesim_models::device::retry::RetryPacer;
use slicesim_models::error::PoolError;
use slicesim_models::net::slice::{Bandwidth, PoolId, SliceType};

use crate::ran::bucket::NetworkBucket;
use crate::ran::network::RadioNetwork;
use crate::ran::report::{AttemptOutcome, AttemptResult, RejectReason};

#[derive(Clone, Copy, Debug, TypedBuilder)]
pub struct NodeInfo {
    pub id: AgentId,
    pub slice: SliceType,
    pub required_bandwidth: Bandwidth,
}

/// A live association. <code>allocated</code> is exactly what was debited from the pool.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub access_point: AgentId,
    pub pool: PoolId,
    pub allocated: Bandwidth,
    pub sinr: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected(Connection),
}

/// What a node tells the bucket about itself at the end of its step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStatus {
    pub slice: SliceType,
    pub connected: bool,
    pub exhausted: bool,
}

#[derive(Clone, Debug, TypedBuilder)]
pub struct MobileNode {
    pub(crate) node_info: NodeInfo,
    pub(crate) position: Point2D,
    pub(crate) walk: RandomWalk,
    #[builder(default)]
    pub(crate) pacer: RetryPacer,
    #[builder(default)]
    pub(crate) state: ConnectionState,
}

impl MobileNode {
    pub fn info(&self) -> &NodeInfo {
        &self.node_info
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    pub fn pacer(&self) -> &RetryPacer {
        &self.pacer
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.state, ConnectionState::Connected(_))
    }

    pub fn connection(&self) -> Option<&Connection> {
        match &self.state {
            ConnectionState::Connected(connection) => Some(connection),
            ConnectionState::Disconnected => None,
        }
    }

    pub fn status(&self) -> NodeStatus {
        NodeStatus {
            slice: self.node_info.slice,
            connected: self.is_connected(),
            exhausted: !self.is_connected() && self.pacer.is_exhausted(),
        }
    }

    pub fn move_by<R: Rng + ?Sized>(&mut self, time_step: f64, rng: &mut R) {
        self.walk.step(&mut self.position, time_step, rng);
    }

    /// Runs one connection attempt against the network. Only meaningful while disconnected;
    /// a connected node is left untouched and <code>None</code> is returned.
    pub fn connect<R: Rng + ?Sized>(
        &mut self,
        now: Tick,
        network: &mut RadioNetwork,
        rng: &mut R,
    ) -> Option<AttemptResult> {
        if self.is_connected() {
            debug!("Node {} is already connected, skipping attempt", self.node_info.id);
            return None;
        }

        let attempt = self.pacer.register_attempt();
        let evaluation = network.selector.evaluate(
            &network.stations,
            &network.pools,
            &network.model,
            &self.position,
            self.node_info.slice,
            self.node_info.required_bandwidth,
            rng,
        );
        let result = AttemptResult::builder()
            .node_id(self.node_info.id)
            .tick(now)
            .attempt(attempt);

        let viable_stations = evaluation.viable_stations;
        let best_rejected = evaluation.best_rejected;
        let best = match network.selector.select(evaluation) {
            Some(best) => best,
            None => {
                let reason = if viable_stations == 0 {
                    RejectReason::NoViableStation
                } else {
                    RejectReason::NoViablePool
                };
                debug!(
                    "Node {} found no candidate on attempt {}: {}",
                    self.node_info.id, attempt, reason
                );
                self.register_failure(now);
                return Some(
                    result
                        .outcome(AttemptOutcome::NoCandidate)
                        .reason(reason)
                        .best_rejected(best_rejected)
                        .build(),
                );
            }
        };

        let granted = match network
            .pools
            .allocate(&best.pool, self.node_info.required_bandwidth)
        {
            Ok(granted) => granted,
            Err(e) => {
                error!("Node {} could not allocate: {}", self.node_info.id, e);
                Bandwidth::default()
            }
        };
        let result = result
            .access_point(best.link.target)
            .pool(best.pool)
            .slice(self.node_info.slice)
            .sinr(best.sinr())
            .rsrp(best.rsrp());

        if granted.is_zero() {
            debug!(
                "Node {} was starved by pool {} on attempt {}",
                self.node_info.id, best.pool, attempt
            );
            self.register_failure(now);
            return Some(
                result
                    .outcome(AttemptOutcome::Rejected)
                    .reason(RejectReason::AllocationStarved)
                    .best_rejected(best_rejected)
                    .build(),
            );
        }

        self.state = ConnectionState::Connected(Connection {
            access_point: best.link.target,
            pool: best.pool,
            allocated: granted,
            sinr: best.sinr(),
        });
        self.pacer.register_success();
        debug!(
            "Node {} connected to {} on pool {} with {} of {}",
            self.node_info.id, best.link.target, best.pool, granted, self.node_info.required_bandwidth
        );
        Some(
            result
                .outcome(AttemptOutcome::Connected)
                .granted(granted)
                .best_rejected(best_rejected)
                .build(),
        )
    }

    /// Returns the allocated bandwidth to the pool it came from. The node ends up
    /// disconnected even when the pool refuses the release.
    pub fn disconnect(&mut self, network: &mut RadioNetwork) -> Result<Option<Connection>, PoolError> {
        let connection = match std::mem::take(&mut self.state) {
            ConnectionState::Connected(connection) => connection,
            ConnectionState::Disconnected => return Ok(None),
        };
        network.pools.release(&connection.pool, connection.allocated)?;
        debug!(
            "Node {} released {} to pool {}",
            self.node_info.id, connection.allocated, connection.pool
        );
        Ok(Some(connection))
    }

    /// Makes an exhausted node try again from the next tick on.
    pub fn reset(&mut self) {
        self.pacer.reset();
    }

    fn register_failure(&mut self, now: Tick) {
        self.pacer.register_failure(now);
        if self.pacer.is_exhausted() {
            warn!(
                "Node {} gave up after {} attempts",
                self.node_info.id,
                self.pacer.attempts()
            );
        }
    }

    fn should_drop<R: Rng + ?Sized>(&self, drop_probability: f64, rng: &mut R) -> bool {
        self.is_connected() && drop_probability > 0.0 && rng.gen_bool(drop_probability)
    }
}

impl Movable<NetworkBucket> for MobileNode {
    type M = Point2D;

    fn mobility(&self) -> &Self::M {
        &self.position
    }

    fn set_mobility(&mut self, bucket: &mut NetworkBucket) {
        let time_step = bucket.behaviour.time_step;
        self.move_by(time_step, &mut bucket.rng);
    }
}

impl Agent<NetworkBucket> for MobileNode {
    fn id(&self) -> AgentId {
        self.node_info.id
    }

    fn stage_one(&mut self, bucket: &mut NetworkBucket) {
        let now = bucket.step;
        self.set_mobility(bucket);

        if self.should_drop(bucket.behaviour.drop_probability, &mut bucket.rng) {
            match self.disconnect(&mut bucket.network) {
                Ok(_) => bucket.record_drop(self.node_info.id),
                Err(e) => error!("Node {} dropped with a broken release: {}", self.node_info.id, e),
            }
        }

        if !self.is_connected() && self.pacer.is_eligible(now) {
            if let Some(result) = self.connect(now, &mut bucket.network, &mut bucket.rng) {
                bucket.record_attempt(result);
            }
        }

        bucket.update_status_of(self.node_info.id, self.status());
    }
}
