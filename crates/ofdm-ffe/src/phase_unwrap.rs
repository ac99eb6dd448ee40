//! Phase Unwrap — detect 2π ambiguity between two phase values
//!
//! Two phases that sit just inside +π and just inside −π are neighbours on
//! the circle but look ~2π apart as plain numbers. Averaging or smoothing
//! them naively lands near zero, which is the wrong answer. [`detect_wrap`]
//! flags such pairs so the caller can move one of them by 2π before
//! combining.
//!
//! ## Example
//!
//! ```rust
//! use ofdm_ffe::phase_unwrap::{detect_wrap, PhaseWrap};
//!
//! // Running average near −π, new value near +π
//! let wrap = detect_wrap(-3.0, 3.0).unwrap();
//! assert_eq!(wrap, PhaseWrap::NegToPos);
//! let aligned = wrap.align_value(3.0);
//! assert!((aligned - (3.0 - 2.0 * std::f64::consts::PI)).abs() < 1e-12);
//! ```

use std::f64::consts::PI;
use std::fmt;

/// Direction of an apparent jump across the ±π boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseWrap {
    /// Reference negative, new value positive.
    NegToPos,
    /// Reference positive, new value negative.
    PosToNeg,
}

impl PhaseWrap {
    /// Shift that moves the new value next to the reference.
    pub fn offset(&self) -> f64 {
        match self {
            PhaseWrap::NegToPos => -2.0 * PI,
            PhaseWrap::PosToNeg => 2.0 * PI,
        }
    }

    /// Move the new value onto the reference's side of the circle.
    pub fn align_value(&self, value: f64) -> f64 {
        value + self.offset()
    }

    /// Move the reference onto the new value's side of the circle.
    pub fn align_reference(&self, reference: f64) -> f64 {
        reference - self.offset()
    }
}

impl fmt::Display for PhaseWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseWrap::NegToPos => write!(f, "neg -> pos"),
            PhaseWrap::PosToNeg => write!(f, "pos -> neg"),
        }
    }
}

/// Check whether `value` and `reference` straddle ±π.
///
/// Fires only when the two have strictly opposite signs and differ by
/// more than π. A zero on either side never fires.
pub fn detect_wrap(reference: f64, value: f64) -> Option<PhaseWrap> {
    if reference < 0.0 && value > 0.0 && value - reference > PI {
        Some(PhaseWrap::NegToPos)
    } else if reference > 0.0 && value < 0.0 && reference - value > PI {
        Some(PhaseWrap::PosToNeg)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_wrap_same_sign() {
        assert_eq!(detect_wrap(3.0, 2.5), None);
        assert_eq!(detect_wrap(-3.0, -2.5), None);
    }

    #[test]
    fn test_no_wrap_small_gap() {
        // Opposite signs but within π of each other
        assert_eq!(detect_wrap(-1.0, 1.0), None);
        assert_eq!(detect_wrap(1.5, -1.5), None);
    }

    #[test]
    fn test_zero_never_wraps() {
        assert_eq!(detect_wrap(0.0, 3.1), None);
        assert_eq!(detect_wrap(-3.1, 0.0), None);
    }

    #[test]
    fn test_neg_to_pos() {
        let wrap = detect_wrap(-3.0, 3.0).unwrap();
        assert_eq!(wrap, PhaseWrap::NegToPos);
        assert_relative_eq!(wrap.align_value(3.0), 3.0 - 2.0 * PI);
        assert_relative_eq!(wrap.align_reference(-3.0), -3.0 + 2.0 * PI);
        assert_eq!(wrap.to_string(), "neg -> pos");
    }

    #[test]
    fn test_pos_to_neg() {
        let wrap = detect_wrap(3.0, -3.0).unwrap();
        assert_eq!(wrap, PhaseWrap::PosToNeg);
        assert_relative_eq!(wrap.align_value(-3.0), 2.0 * PI - 3.0);
        assert_relative_eq!(wrap.align_reference(3.0), 3.0 - 2.0 * PI);
        assert_eq!(wrap.to_string(), "pos -> neg");
    }

    #[test]
    fn test_threshold_is_strict() {
        assert_eq!(detect_wrap(-PI / 2.0, PI / 2.0), None);
    }
}
