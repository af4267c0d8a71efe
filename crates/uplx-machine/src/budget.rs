//! Execution-unit accounting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// The (memory, CPU) execution units consumed by an evaluation.
///
/// Both components use saturating 64-bit arithmetic: real cost tables stay
/// far below `u64::MAX` within any bounded evaluation, and saturation keeps
/// the overflow failure mode deterministic rather than silent. Components
/// are never negative.
///
/// Serializes as a two-field record `{ "mem": .., "cpu": .. }`, the shape
/// an external codec attaches to a transaction redeemer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ExBudget {
    pub mem: u64,
    pub cpu: u64,
}

impl ExBudget {
    pub const ZERO: ExBudget = ExBudget { mem: 0, cpu: 0 };

    pub fn new(mem: u64, cpu: u64) -> Self {
        ExBudget { mem, cpu }
    }

    /// `true` when either component is strictly above the ceiling's.
    pub fn exceeds(&self, ceiling: &ExBudget) -> bool {
        self.mem > ceiling.mem || self.cpu > ceiling.cpu
    }

    /// Componentwise subtraction; `None` if either component would go
    /// negative.
    pub fn checked_sub(&self, other: &ExBudget) -> Option<ExBudget> {
        Some(ExBudget {
            mem: self.mem.checked_sub(other.mem)?,
            cpu: self.cpu.checked_sub(other.cpu)?,
        })
    }
}

impl Add for ExBudget {
    type Output = ExBudget;

    fn add(self, rhs: ExBudget) -> ExBudget {
        ExBudget {
            mem: self.mem.saturating_add(rhs.mem),
            cpu: self.cpu.saturating_add(rhs.cpu),
        }
    }
}

impl AddAssign for ExBudget {
    fn add_assign(&mut self, rhs: ExBudget) {
        *self = *self + rhs;
    }
}

impl fmt::Display for ExBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ mem: {}, cpu: {} }}", self.mem, self.cpu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_saturates() {
        let b = ExBudget::new(u64::MAX, 1) + ExBudget::new(1, 1);
        assert_eq!(b, ExBudget::new(u64::MAX, 2));
    }

    #[test]
    fn exceeds_is_componentwise() {
        let ceiling = ExBudget::new(10, 10);
        assert!(!ExBudget::new(10, 10).exceeds(&ceiling));
        assert!(ExBudget::new(11, 0).exceeds(&ceiling));
        assert!(ExBudget::new(0, 11).exceeds(&ceiling));
    }

    #[test]
    fn checked_sub_underflow() {
        assert_eq!(
            ExBudget::new(5, 5).checked_sub(&ExBudget::new(2, 3)),
            Some(ExBudget::new(3, 2))
        );
        assert_eq!(ExBudget::new(1, 5).checked_sub(&ExBudget::new(2, 3)), None);
    }
}
