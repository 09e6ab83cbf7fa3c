pub mod mobility;
pub mod retry;
pub mod select;
