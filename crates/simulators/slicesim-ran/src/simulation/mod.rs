pub mod builder;
pub mod config;
pub mod runner;
pub mod ui;
