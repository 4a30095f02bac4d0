//! Injectable hooks for inspecting optimizer state while it runs.

use crate::gradient::GradientElement;

/// Receives structured events at key points of an optimization run.
///
/// Every hook has an empty default body, so implementors override only what
/// they need. Install an observer via
/// [`OptimizerBuilder::observer`](crate::OptimizerBuilder::observer); without
/// one, events go nowhere.
///
/// # Examples
///
/// Record the value reached after every epoch:
///
/// ```
/// use bytegrad::{Observer, Optimizer};
///
/// #[derive(Default)]
/// struct History(Vec<i64>);
///
/// impl Observer for History {
///     fn epoch_completed(&mut self, _epoch: usize, value: i64) {
///         self.0.push(value);
///     }
/// }
///
/// let mut optimizer = Optimizer::builder()
///     .observer(History::default())
///     .build()
///     .unwrap();
/// optimizer
///     .minimize(|x: &[u8]| (i64::from(x[0]) - 137).pow(2), &[0])
///     .unwrap();
/// ```
pub trait Observer {
    /// Called once per epoch after the gradient has been estimated and
    /// normalized (single-step calls report `epoch` 0).
    fn gradient_estimated(&mut self, _epoch: usize, _gradient: &[GradientElement]) {}

    /// Called at the end of each epoch with the value the line search
    /// settled on.
    fn epoch_completed(&mut self, _epoch: usize, _value: i64) {}

    /// Called when the gradient is flat at the current point, after any
    /// escape perturbations have run. `escaped` reports whether one of the
    /// `attempts` perturbations found a non-flat neighbor.
    fn flat_region(&mut self, _epoch: usize, _attempts: usize, _escaped: bool) {}
}

/// An observer that ignores every event. This is the default when no
/// observer is configured.
pub struct NopObserver;

impl Observer for NopObserver {}
