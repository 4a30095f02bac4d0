#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when an entry point is called with an empty parameter vector.
    #[error("parameter vector must have at least one dimension")]
    EmptyVector,

    /// Returned when the momentum factor is outside `[0.0, 1.0)`.
    #[error("invalid momentum: {0} must be in [0.0, 1.0)")]
    InvalidMomentum(f64),

    /// Returned when the reseed interval is zero.
    #[error("invalid reseed interval: must be at least one draw")]
    InvalidReseedInterval,

    /// Returned when the entropy channel cannot be acquired.
    #[error("unable to acquire entropy channel: {0}")]
    Entropy(#[from] std::io::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
