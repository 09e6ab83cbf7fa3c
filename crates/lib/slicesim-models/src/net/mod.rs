pub mod signal;
pub mod slice;
pub mod station;
