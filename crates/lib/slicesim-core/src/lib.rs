#![forbid(unsafe_code)]

pub use indexmap;

pub mod agent;
pub mod bucket;
pub mod metrics;
pub mod radio;
pub mod scheduler;
