use thiserror::Error;

use crate::net::slice::PoolId;

/// Violations of the pool bookkeeping. Allocation refusals are not errors, they are reported
/// through <code>Feasibility</code>.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PoolError {
    #[error("pool {0} is not part of the arena")]
    UnknownPool(PoolId),
    #[error("pool {0} is registered twice")]
    DuplicatePool(PoolId),
    #[error("pool {pool}: priority {priority} is outside [0, 1]")]
    InvalidPriority { pool: PoolId, priority: f64 },
    #[error("pool {pool}: capacity {capacity} must be a non-negative number")]
    InvalidCapacity { pool: PoolId, capacity: f64 },
    #[error("pool {pool}: cannot release {amount}, amounts must be non-negative")]
    InvalidAmount { pool: PoolId, amount: f64 },
    #[error("pool {pool}: releasing {amount} on top of {remaining} exceeds capacity {capacity}")]
    OverRelease {
        pool: PoolId,
        amount: f64,
        remaining: f64,
        capacity: f64,
    },
}

/// Invalid parameters for one of the configurable models.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("unsupported {model} variant {variant}")]
    UnsupportedVariant { model: &'static str, variant: String },
    #[error("missing parameter {0}")]
    MissingParameter(&'static str),
    #[error("invalid parameters for {model}: {reason}")]
    InvalidParameter { model: &'static str, reason: String },
}
