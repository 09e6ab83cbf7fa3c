#![forbid(unsafe_code)]

pub mod device;
pub mod dist;
pub mod error;
pub mod net;

pub use rand;
pub use rand_pcg;
