pub mod bucket;
pub mod network;
pub mod node;
pub mod report;
pub mod simulator;
