#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Derivative-free optimization over byte vectors.
//!
//! Given an opaque, deterministic scoring function from a fixed-length
//! `&[u8]` to an `i64`, the optimizer walks toward a nearby local minimum or
//! maximum using finite-difference probes and a step-doubling line search.
//! Every parameter update wraps modulo 256, so the search space is the torus
//! of byte vectors. This makes the crate a reusable primitive for steering
//! byte-level mutation toward extremal outputs of a black-box signal — no
//! analytic gradients required.
//!
//! # Getting Started
//!
//! Find the byte minimizing a squared distance in a handful of epochs:
//!
//! ```
//! use bytegrad::prelude::*;
//!
//! let mut optimizer = Optimizer::new()?;
//! let (x, value) = optimizer.minimize(|x: &[u8]| (i64::from(x[0]) - 137).pow(2), &[0])?;
//!
//! assert_eq!(x, vec![137]);
//! assert_eq!(value, 0);
//! # Ok::<(), bytegrad::Error>(())
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Optimizer`] | The context object: owns the random source and scratch gradient, drives runs. |
//! | [`Objective`] | The black-box scoring function — any `Fn(&[u8]) -> i64` closure works. |
//! | [`Direction`] | Whether a run minimizes or maximizes the score. |
//! | [`Step`] | Result of a single-step call: an improved point, or "already at an extremum". |
//! | [`GradientElement`] | Per-dimension slope, magnitude, and normalized step weight. |
//! | [`Observer`] | Optional event sink for inspecting gradient and epoch state mid-run. |
//!
//! # How a run proceeds
//!
//! Each epoch estimates a discrete gradient by probing every dimension at
//! ±1 (mod 256), normalizes the per-dimension magnitudes into step weights,
//! and line-searches along the result: first jointly across all dimensions
//! with exponentially doubling steps, then dimension by dimension to recover
//! the precision the joint move loses. A run ends when the value stops
//! changing, when the gradient is flat (optionally after a budget of random
//! escape perturbations), or when the epoch budget runs out. The returned
//! value is never worse than the starting one.
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on the public value types | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at key points of a run | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

mod error;
mod gradient;
mod objective;
mod observer;
mod optimizer;
mod random;
mod search;
mod types;

pub use error::{Error, Result};
pub use gradient::{GradientElement, Slope};
pub use objective::Objective;
pub use observer::{NopObserver, Observer};
pub use optimizer::{Optimizer, OptimizerBuilder, Step};
pub use random::{EntropySource, OsEntropy};
pub use types::Direction;

/// Convenient wildcard import for the most common types.
///
/// ```
/// use bytegrad::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::gradient::{GradientElement, Slope};
    pub use crate::objective::Objective;
    pub use crate::observer::{NopObserver, Observer};
    pub use crate::optimizer::{Optimizer, OptimizerBuilder, Step};
    pub use crate::random::{EntropySource, OsEntropy};
    pub use crate::types::Direction;
}
