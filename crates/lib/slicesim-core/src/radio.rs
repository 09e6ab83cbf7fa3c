use std::fmt::Debug;

use typed_builder::TypedBuilder;

use crate::agent::AgentId;

/// Measurements attached to a link, e.g. the signal quality seen from a station.
pub trait LinkFeatures: Copy + Clone + Debug {}

/// A directed link from the evaluating agent towards `target`.
#[derive(Debug, Copy, Clone, TypedBuilder)]
pub struct Link<F>
where
    F: LinkFeatures,
{
    pub target: AgentId,
    pub features: F,
}
