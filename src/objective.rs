//! The [`Objective`] trait defines what gets optimized.
//!
//! For simple cases, pass a closure directly to the optimizer entry points:
//!
//! ```
//! use bytegrad::Optimizer;
//!
//! let mut optimizer = Optimizer::new().unwrap();
//! let (x, value) = optimizer
//!     .minimize(|x: &[u8]| (i64::from(x[0]) - 137).pow(2), &[0])
//!     .unwrap();
//! assert_eq!(x, vec![137]);
//! assert_eq!(value, 0);
//! ```
//!
//! For objectives that carry state — a corpus, a scoring table, a handle to
//! an external measurement — implement [`Objective`] on a struct:
//!
//! ```
//! use bytegrad::{Objective, Optimizer};
//!
//! struct DistanceTo {
//!     target: Vec<u8>,
//! }
//!
//! impl Objective for DistanceTo {
//!     fn evaluate(&self, x: &[u8]) -> i64 {
//!         x.iter()
//!             .zip(&self.target)
//!             .map(|(&a, &b)| i64::from(a.abs_diff(b)))
//!             .sum()
//!     }
//! }
//!
//! let objective = DistanceTo {
//!     target: vec![10, 200, 5],
//! };
//! let mut optimizer = Optimizer::new().unwrap();
//! let (x, value) = optimizer.minimize(objective, &[0, 0, 0]).unwrap();
//! assert_eq!(x, vec![10, 200, 5]);
//! assert_eq!(value, 0);
//! ```

/// A black-box scoring function over byte vectors.
///
/// The optimizer probes the objective many times per epoch and assumes it is
/// deterministic: identical input must produce an identical score for the
/// whole duration of a run, with no hidden state or noise. A non-deterministic
/// objective breaks the slope-classification contract and aborts the run
/// (see [`Optimizer::minimize`](crate::Optimizer::minimize)).
///
/// Implemented for any `Fn(&[u8]) -> i64` closure, so most callers never name
/// this trait.
pub trait Objective {
    /// Score the given parameter vector.
    fn evaluate(&self, x: &[u8]) -> i64;
}

impl<F> Objective for F
where
    F: Fn(&[u8]) -> i64,
{
    fn evaluate(&self, x: &[u8]) -> i64 {
        self(x)
    }
}
