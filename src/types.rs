//! Core types for the optimizer.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The direction of optimization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Search for a lower objective value.
    Minimize,
    /// Search for a higher objective value.
    Maximize,
}

impl Direction {
    /// Returns `true` if `candidate` is a strict improvement over `incumbent`
    /// in this direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytegrad::Direction;
    ///
    /// assert!(Direction::Minimize.improves(1, 2));
    /// assert!(Direction::Maximize.improves(2, 1));
    /// assert!(!Direction::Minimize.improves(2, 2));
    /// ```
    #[must_use]
    pub fn improves(self, candidate: i64, incumbent: i64) -> bool {
        match self {
            Self::Minimize => candidate < incumbent,
            Self::Maximize => candidate > incumbent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimize_improves_on_strictly_lower() {
        assert!(Direction::Minimize.improves(-1, 0));
        assert!(!Direction::Minimize.improves(0, 0));
        assert!(!Direction::Minimize.improves(1, 0));
    }

    #[test]
    fn maximize_improves_on_strictly_higher() {
        assert!(Direction::Maximize.improves(1, 0));
        assert!(!Direction::Maximize.improves(0, 0));
        assert!(!Direction::Maximize.improves(-1, 0));
    }
}
