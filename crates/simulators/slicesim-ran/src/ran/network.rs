use typed_builder::TypedBuilder;

use slicesim_models::device::select::CandidateSelector;
use slicesim_models::net::signal::SignalModel;
use slicesim_models::net::slice::PoolArena;
use slicesim_models::net::station::AccessPoint;

/// The static side of the radio access network together with the pools it shares. Nodes
/// evaluate it and commit their allocations through it.
#[derive(Clone, Debug, TypedBuilder)]
pub struct RadioNetwork {
    pub stations: Vec<AccessPoint>,
    pub pools: PoolArena,
    #[builder(default)]
    pub model: SignalModel,
    #[builder(default)]
    pub selector: CandidateSelector,
}
