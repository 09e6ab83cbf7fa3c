#![forbid(unsafe_code)]

pub mod error;
pub mod logger;
pub mod result;
pub mod tables;
pub mod terminal;
pub mod ui;
pub mod writer;

pub use arrow;
pub use parquet;
