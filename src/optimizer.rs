//! The optimizer context and its entry points.

use crate::error::{Error, Result};
use crate::gradient::Gradient;
use crate::objective::Objective;
use crate::observer::{NopObserver, Observer};
use crate::random::{EntropySource, OsEntropy, RandomSource};
use crate::search;
use crate::types::Direction;

/// Initial scratch-gradient capacity; the buffer grows on demand when a
/// larger vector is optimized.
const INITIAL_GRADIENT_CAPACITY: usize = 10;

const DEFAULT_MAX_EPOCHS: usize = 1000;
const DEFAULT_RESEED_INTERVAL: u64 = 10_000;

/// The result of a single [`step_descend`](Optimizer::step_descend) or
/// [`step_ascend`](Optimizer::step_ascend) call.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// The line search found a strictly better point.
    Improved {
        /// The improved parameter vector.
        point: Vec<u8>,
        /// The objective value at `point`.
        value: i64,
    },
    /// Every dimension classified stationary: the input is already a local
    /// extremum and was left untouched.
    AtExtremum,
}

impl Step {
    /// Returns `true` for [`Step::AtExtremum`].
    #[must_use]
    pub fn at_extremum(&self) -> bool {
        matches!(self, Self::AtExtremum)
    }
}

/// A derivative-free optimizer over byte vectors.
///
/// The optimizer owns the state one run needs between calls: the random
/// source used for flat-region escape (with its entropy channel) and the
/// scratch gradient buffer, sized to the largest vector seen so far. Both
/// are released when the optimizer is dropped.
///
/// One optimizer serves any number of *sequential* runs; concurrent runs
/// each need their own instance (the entry points take `&mut self`, so the
/// borrow checker enforces this).
///
/// # Examples
///
/// ```
/// use bytegrad::Optimizer;
///
/// let mut optimizer = Optimizer::new().unwrap();
/// let (x, value) = optimizer
///     .minimize(|x: &[u8]| (i64::from(x[0]) - 137).pow(2), &[0])
///     .unwrap();
/// assert_eq!(x, vec![137]);
/// assert_eq!(value, 0);
/// ```
pub struct Optimizer {
    momentum: f64,
    max_epochs: usize,
    escape_budget: usize,
    random: RandomSource,
    gradient: Gradient,
    observer: Box<dyn Observer>,
}

impl Optimizer {
    /// Create an optimizer with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] when the entropy channel cannot be
    /// acquired.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Return an [`OptimizerBuilder`] for constructing an optimizer with a
    /// fluent API.
    #[must_use]
    pub fn builder() -> OptimizerBuilder {
        OptimizerBuilder::new()
    }

    /// The momentum factor blending gradient weights across epochs.
    #[must_use]
    pub fn momentum(&self) -> f64 {
        self.momentum
    }

    /// The epoch budget of [`minimize`](Self::minimize) and
    /// [`maximize`](Self::maximize).
    #[must_use]
    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    /// How many random perturbations a flat region may consume before the
    /// run accepts the point as a local extremum.
    #[must_use]
    pub fn escape_budget(&self) -> usize {
        self.escape_budget
    }

    /// Search for a local minimum of `objective` near `x0`.
    ///
    /// Runs gradient-estimate-and-line-search epochs until the value stops
    /// changing, the region is flat beyond the escape budget, or the epoch
    /// budget is exhausted. The returned value is never worse than
    /// `objective` at `x0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVector`] when `x0` is empty.
    ///
    /// # Panics
    ///
    /// Panics when the objective is non-deterministic (the finite-difference
    /// classification becomes inconsistent), or when escape perturbation is
    /// enabled and the entropy channel fails while reseeding.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytegrad::Optimizer;
    ///
    /// // Distance to [10, 200, 5], summed across dimensions.
    /// let objective = |x: &[u8]| {
    ///     i64::from(x[0].abs_diff(10))
    ///         + i64::from(x[1].abs_diff(200))
    ///         + i64::from(x[2].abs_diff(5))
    /// };
    ///
    /// let mut optimizer = Optimizer::new().unwrap();
    /// let (x, value) = optimizer.minimize(objective, &[0, 0, 0]).unwrap();
    /// assert_eq!(x, vec![10, 200, 5]);
    /// assert_eq!(value, 0);
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    pub fn minimize<O: Objective>(&mut self, objective: O, x0: &[u8]) -> Result<(Vec<u8>, i64)> {
        self.run(Direction::Minimize, &objective, x0)
    }

    /// Search for a local maximum of `objective` near `x0`.
    ///
    /// The mirror image of [`minimize`](Self::minimize); the returned value
    /// is never worse (lower) than `objective` at `x0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVector`] when `x0` is empty.
    ///
    /// # Panics
    ///
    /// As for [`minimize`](Self::minimize).
    ///
    /// # Examples
    ///
    /// ```
    /// use bytegrad::Optimizer;
    ///
    /// let mut optimizer = Optimizer::new().unwrap();
    /// let (x, value) = optimizer
    ///     .maximize(|x: &[u8]| -(i64::from(x[0]) - 137).pow(2), &[50])
    ///     .unwrap();
    /// assert_eq!(x, vec![137]);
    /// assert_eq!(value, 0);
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    pub fn maximize<O: Objective>(&mut self, objective: O, x0: &[u8]) -> Result<(Vec<u8>, i64)> {
        self.run(Direction::Maximize, &objective, x0)
    }

    /// Run one gradient-estimate-plus-line-search step toward a minimum.
    ///
    /// For callers driving their own outer iteration: returns
    /// [`Step::AtExtremum`] when every dimension is stationary (leaving `x0`
    /// untouched), and [`Step::Improved`] with a strictly better point
    /// otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVector`] when `x0` is empty.
    ///
    /// # Panics
    ///
    /// Panics when the objective is non-deterministic (the finite-difference
    /// classification becomes inconsistent).
    ///
    /// # Examples
    ///
    /// ```
    /// use bytegrad::{Optimizer, Step};
    ///
    /// let objective = |x: &[u8]| (i64::from(x[0]) - 137).pow(2);
    /// let mut optimizer = Optimizer::new().unwrap();
    ///
    /// // A non-extremal point yields a strict improvement…
    /// match optimizer.step_descend(objective, &[0]).unwrap() {
    ///     Step::Improved { value, .. } => assert!(value < objective(&[0])),
    ///     Step::AtExtremum => unreachable!(),
    /// }
    ///
    /// // …while the minimum itself is reported as an extremum.
    /// assert!(optimizer.step_descend(objective, &[137]).unwrap().at_extremum());
    /// ```
    #[allow(clippy::needless_pass_by_value)]
    pub fn step_descend<O: Objective>(&mut self, objective: O, x0: &[u8]) -> Result<Step> {
        self.step(Direction::Minimize, &objective, x0)
    }

    /// Run one gradient-estimate-plus-line-search step toward a maximum.
    ///
    /// The mirror image of [`step_descend`](Self::step_descend).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyVector`] when `x0` is empty.
    ///
    /// # Panics
    ///
    /// As for [`step_descend`](Self::step_descend).
    #[allow(clippy::needless_pass_by_value)]
    pub fn step_ascend<O: Objective>(&mut self, objective: O, x0: &[u8]) -> Result<Step> {
        self.step(Direction::Maximize, &objective, x0)
    }

    /// The epoch-bounded outer loop shared by both directions.
    #[allow(clippy::cast_possible_truncation)]
    fn run<O: Objective>(
        &mut self,
        direction: Direction,
        objective: &O,
        x0: &[u8],
    ) -> Result<(Vec<u8>, i64)> {
        if x0.is_empty() {
            return Err(Error::EmptyVector);
        }
        let n = x0.len();

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("optimize", n, direction = ?direction).entered();

        self.gradient.reset(n);

        let mut x_prev = vec![0u8; n];
        let mut x_next = x0.to_vec();
        let mut f_next = objective.evaluate(x0);
        let mut f_prev;

        for epoch in 0..self.max_epochs {
            x_prev.copy_from_slice(&x_next);
            f_prev = f_next;

            self.gradient.estimate(objective, f_prev, &mut x_prev);

            if self.gradient.max_magnitude() == 0 {
                let mut attempts = 0;
                while attempts < self.escape_budget && self.gradient.max_magnitude() == 0 {
                    let dim = self.random.below(n as u32) as usize;
                    let offset = self.random.below(256) as u8;
                    x_prev[dim] = x_prev[dim].wrapping_add(offset);
                    f_prev = objective.evaluate(&x_prev);
                    self.gradient.estimate(objective, f_prev, &mut x_prev);
                    attempts += 1;
                }
                let escaped = self.gradient.max_magnitude() != 0;
                self.observer.flat_region(epoch, attempts, escaped);
                if !escaped {
                    trace_debug!(epoch, "flat region, accepting local extremum");
                    break;
                }
            }

            self.gradient.normalize(self.momentum);
            self.observer.gradient_estimated(epoch, self.gradient.elements());

            f_next = search::line_search(
                objective,
                self.gradient.elements(),
                direction,
                &x_prev,
                f_prev,
                &mut x_next,
            );
            self.observer.epoch_completed(epoch, f_next);
            trace_debug!(epoch, value = f_next, "epoch completed");

            if f_next == f_prev {
                break;
            }
        }

        trace_info!(value = f_next, "optimization finished");
        Ok((x_next, f_next))
    }

    /// One gradient estimate plus one line search, shared by both
    /// directions.
    fn step<O: Objective>(&mut self, direction: Direction, objective: &O, x0: &[u8]) -> Result<Step> {
        if x0.is_empty() {
            return Err(Error::EmptyVector);
        }

        self.gradient.reset(x0.len());

        let mut probe = x0.to_vec();
        let f0 = objective.evaluate(&probe);
        self.gradient.estimate(objective, f0, &mut probe);

        if self.gradient.max_magnitude() == 0 {
            self.observer.flat_region(0, 0, false);
            return Ok(Step::AtExtremum);
        }

        self.gradient.normalize(self.momentum);
        self.observer.gradient_estimated(0, self.gradient.elements());

        let mut point = Vec::with_capacity(x0.len());
        let value = search::line_search(
            objective,
            self.gradient.elements(),
            direction,
            &probe,
            f0,
            &mut point,
        );
        Ok(Step::Improved { point, value })
    }
}

/// A builder for constructing [`Optimizer`] instances with a fluent API.
///
/// Created via [`Optimizer::builder()`].
///
/// # Defaults
///
/// - momentum: `0.0` (weights are the pure magnitude ratio)
/// - max epochs: `1000`
/// - escape budget: `0` (flat-region escape disabled)
/// - reseed interval: `10_000` draws
/// - entropy: [`OsEntropy`]
/// - observer: [`NopObserver`]
///
/// # Examples
///
/// ```
/// use bytegrad::Optimizer;
///
/// let optimizer = Optimizer::builder()
///     .momentum(0.25)
///     .max_epochs(200)
///     .escape_budget(8)
///     .build()
///     .unwrap();
/// assert_eq!(optimizer.max_epochs(), 200);
/// assert_eq!(optimizer.escape_budget(), 8);
/// ```
pub struct OptimizerBuilder {
    momentum: f64,
    max_epochs: usize,
    escape_budget: usize,
    reseed_interval: u64,
    entropy: Option<Box<dyn EntropySource>>,
    observer: Option<Box<dyn Observer>>,
}

impl OptimizerBuilder {
    pub(crate) fn new() -> Self {
        Self {
            momentum: 0.0,
            max_epochs: DEFAULT_MAX_EPOCHS,
            escape_budget: 0,
            reseed_interval: DEFAULT_RESEED_INTERVAL,
            entropy: None,
            observer: None,
        }
    }

    /// Set the momentum factor β used when normalizing gradient weights:
    /// `w = β·w_prev + (1−β)·ratio`. Zero (the default) uses the pure
    /// ratio. Must be in `[0.0, 1.0)`.
    #[must_use]
    pub fn momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    /// Set the epoch budget for [`Optimizer::minimize`] and
    /// [`Optimizer::maximize`].
    #[must_use]
    pub fn max_epochs(mut self, max_epochs: usize) -> Self {
        self.max_epochs = max_epochs;
        self
    }

    /// Set how many random perturbations a flat region may consume before
    /// the run accepts the point as a local extremum. Zero (the default)
    /// terminates on the first flat gradient.
    #[must_use]
    pub fn escape_budget(mut self, escape_budget: usize) -> Self {
        self.escape_budget = escape_budget;
        self
    }

    /// Set how many random draws may be served from one seed before the
    /// generator reseeds from the entropy channel. Must be at least 1.
    #[must_use]
    pub fn reseed_interval(mut self, reseed_interval: u64) -> Self {
        self.reseed_interval = reseed_interval;
        self
    }

    /// Supply the entropy channel backing the random source.
    ///
    /// Defaults to [`OsEntropy`] if not specified.
    #[must_use]
    pub fn entropy(mut self, entropy: impl EntropySource + 'static) -> Self {
        self.entropy = Some(Box::new(entropy));
        self
    }

    /// Install an [`Observer`] receiving events during runs.
    ///
    /// Defaults to [`NopObserver`] (no events) if not specified.
    #[must_use]
    pub fn observer(mut self, observer: impl Observer + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Build the [`Optimizer`], acquiring the entropy channel and the
    /// initial scratch gradient buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMomentum`] when momentum is outside
    /// `[0.0, 1.0)`, [`Error::InvalidReseedInterval`] when the reseed
    /// interval is zero, and [`Error::Entropy`] when the default entropy
    /// channel cannot be acquired.
    pub fn build(self) -> Result<Optimizer> {
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(Error::InvalidMomentum(self.momentum));
        }
        if self.reseed_interval == 0 {
            return Err(Error::InvalidReseedInterval);
        }
        let entropy = match self.entropy {
            Some(entropy) => entropy,
            None => Box::new(OsEntropy::acquire()?),
        };
        Ok(Optimizer {
            momentum: self.momentum,
            max_epochs: self.max_epochs,
            escape_budget: self.escape_budget,
            random: RandomSource::new(entropy, self.reseed_interval),
            gradient: Gradient::with_capacity(INITIAL_GRADIENT_CAPACITY),
            observer: self.observer.unwrap_or_else(|| Box::new(NopObserver)),
        })
    }
}
