#![forbid(unsafe_code)]

pub mod ran;
pub mod simulation;
