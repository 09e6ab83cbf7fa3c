use indexmap::IndexMap;
use log::debug;
use typed_builder::TypedBuilder;

use crate::agent::{Agent, AgentId};
use crate::bucket::{Bucket, Tick};

/// Drives the tick loop. Call <code>initialize</code> once, <code>trigger</code> once per tick
/// and <code>terminate</code> at the end.
pub trait Scheduler<B: Bucket>: Send {
    fn duration(&self) -> Tick;
    fn initialize(&mut self);
    fn trigger(&mut self) -> Tick;
    fn active_agents(&self) -> u64;
    fn terminate(self);
}

/// A scheduler that steps every agent exactly once per tick, strictly sequentially and in
/// the order the agents were added.
#[derive(TypedBuilder)]
pub struct DefaultScheduler<A, B>
where
    A: Agent<B>,
    B: Bucket,
{
    pub bucket: B,
    pub agents: IndexMap<AgentId, A>,
    pub duration: Tick,
    pub output_interval: Tick,
    #[builder(default = Tick::default())]
    pub now: Tick,
    #[builder(default = Tick::default())]
    pub output_step: Tick,
    #[builder(default)]
    pub _marker: std::marker::PhantomData<fn() -> B>,
}

impl<A, B> DefaultScheduler<A, B>
where
    A: Agent<B>,
    B: Bucket,
{
    pub fn agent_of(&self, agent_id: &AgentId) -> Option<&A> {
        self.agents.get(agent_id)
    }

    pub fn agent_mut(&mut self, agent_id: &AgentId) -> Option<&mut A> {
        self.agents.get_mut(agent_id)
    }

    /// Appends an agent at the end of the enumeration order. An agent with an existing ID
    /// replaces the old one in place.
    pub fn add_agent(&mut self, agent: A) {
        self.agents.insert(agent.id(), agent);
    }
}

impl<A, B> Scheduler<B> for DefaultScheduler<A, B>
where
    A: Agent<B>,
    B: Bucket,
{
    fn duration(&self) -> Tick {
        self.duration
    }

    fn initialize(&mut self) {
        debug!("Initializing scheduler with {} agents", self.agents.len());
        self.bucket.initialize(self.now);
    }

    fn trigger(&mut self) -> Tick {
        self.bucket.before_agents(self.now);

        if self.now == self.output_step {
            self.bucket.stream_output();
            self.output_step += Tick(self.output_interval.as_u64().max(1));
        }

        self.agents
            .values_mut()
            .for_each(|agent| agent.stage_one(&mut self.bucket));

        self.bucket.after_agents();

        self.now += Tick(1);
        self.now
    }

    fn active_agents(&self) -> u64 {
        self.agents.len() as u64
    }

    fn terminate(self) {
        self.bucket.terminate();
    }
}
