use std::fmt;
use std::fmt::Debug;
use std::hash::Hash;
use std::str::FromStr;

use serde::Deserialize;

use crate::bucket::Bucket;

/// Identifies a station or a mobile node. Unique across both kinds.
#[derive(Deserialize, Default, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct AgentId(u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.parse::<u64>()?;
        Ok(Self(id))
    }
}

impl From<u64> for AgentId {
    fn from(f: u64) -> Self {
        Self(f)
    }
}

impl AgentId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Positional state an agent exposes to the engine.
pub trait MobilityInfo: Copy + Clone {}

/// Movement goes through the bucket so the agent draws from the shared random generator.
pub trait Movable<B> {
    type M: MobilityInfo;
    fn mobility(&self) -> &Self::M;
    fn set_mobility(&mut self, bucket: &mut B);
}

/// Something the scheduler steps once per tick.
///
/// Agents are stepped one after another in the order they were added to the scheduler. All
/// state shared between agents lives in the bucket, so an agent sees every change made by the
/// agents stepped before it within the same tick.
pub trait Agent<B>: Movable<B> + Clone + Send
where
    B: Bucket,
{
    fn id(&self) -> AgentId;
    fn stage_one(&mut self, bucket: &mut B);
}
