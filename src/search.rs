//! Step-doubling line search over byte vectors.

use crate::gradient::{GradientElement, Slope};
use crate::objective::Objective;
use crate::types::Direction;

/// Dimensions whose weight falls below this are skipped during
/// per-dimension refinement.
const MIN_SIGNIFICANT_WEIGHT: f64 = 0.01;

/// Search from `x0` (valued `f0`) for a strictly better point along the
/// estimated gradient, doubling the step size while the objective keeps
/// improving.
///
/// Two phases: a joint move over all non-stationary dimensions, which
/// exploits correlated dimensions cheaply, then a per-dimension refinement
/// over every dimension whose weight passes the significance threshold,
/// which recovers the precision the coarse joint step loses on low-weight
/// dimensions. Each phase keeps the last improving point and discards the
/// first step that fails to improve.
///
/// Writes the best point found into `out` and returns its value. If no step
/// improves on `f0`, `out` is left equal to `x0` and `f0` is returned; the
/// result is never worse than `f0`.
pub(crate) fn line_search<O: Objective>(
    objective: &O,
    gradient: &[GradientElement],
    direction: Direction,
    x0: &[u8],
    f0: i64,
    out: &mut Vec<u8>,
) -> i64 {
    out.clear();
    out.extend_from_slice(x0);
    let mut last_good = x0.to_vec();
    let mut f_best = f0;

    // Phase A: move every non-stationary dimension at once.
    let mut step: u64 = 1;
    loop {
        last_good.copy_from_slice(out);
        for (x, el) in out.iter_mut().zip(gradient) {
            *x = displace(*x, el, step, direction);
        }
        let f_next = objective.evaluate(out);
        if !direction.improves(f_next, f_best) {
            break;
        }
        f_best = f_next;
        step = step.saturating_mul(2);
    }
    out.copy_from_slice(&last_good);

    // A single dimension already moved at full weight; nothing to refine.
    if x0.len() == 1 {
        return f_best;
    }

    // Phase B: refine one dimension at a time.
    for (i, el) in gradient.iter().enumerate() {
        if el.weight < MIN_SIGNIFICANT_WEIGHT || el.slope == Slope::Stationary {
            continue;
        }
        step = 1;
        loop {
            last_good.copy_from_slice(out);
            out[i] = displace(out[i], el, step, direction);
            let f_next = objective.evaluate(out);
            if !direction.improves(f_next, f_best) {
                break;
            }
            f_best = f_next;
            step = step.saturating_mul(2);
        }
        out.copy_from_slice(&last_good);
    }

    f_best
}

/// Move `x` by `round(weight · step)` (mod 256) toward improvement for the
/// element's slope. Stationary dimensions do not move.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn displace(x: u8, el: &GradientElement, step: u64, direction: Direction) -> u8 {
    let amount = (el.weight * step as f64).round() as u64 as u8;
    match (direction, el.slope) {
        (_, Slope::Stationary) => x,
        (Direction::Minimize, Slope::Descending) | (Direction::Maximize, Slope::Ascending) => {
            x.wrapping_add(amount)
        }
        (Direction::Minimize, Slope::Ascending) | (Direction::Maximize, Slope::Descending) => {
            x.wrapping_sub(amount)
        }
    }
}
