//! Fuzzy boolean: a truth weight in 0..1 so that enable/select flags can fade.

use std::ops::{BitAnd, BitOr, Not};

use serde::{Deserialize, Serialize};

use crate::blend::{lerp_f64, Lerp};

#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FuzzyBool(f64);

impl FuzzyBool {
    pub const FALSE: FuzzyBool = FuzzyBool(0.0);
    pub const TRUE: FuzzyBool = FuzzyBool(1.0);

    /// Clamps into 0..1; NaN is treated as false.
    pub fn new(weight: f64) -> Self {
        if weight.is_nan() {
            return Self::FALSE;
        }
        FuzzyBool(weight.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn weight(self) -> f64 {
        self.0
    }

    /// True with any nonzero weight.
    #[inline]
    pub fn any(self) -> bool {
        self.0 > 0.0
    }

    /// True only when fully set.
    #[inline]
    pub fn full(self) -> bool {
        self.0 >= 1.0
    }
}

impl From<bool> for FuzzyBool {
    fn from(b: bool) -> Self {
        if b {
            Self::TRUE
        } else {
            Self::FALSE
        }
    }
}

impl Not for FuzzyBool {
    type Output = FuzzyBool;
    fn not(self) -> FuzzyBool {
        FuzzyBool(1.0 - self.0)
    }
}

impl BitAnd for FuzzyBool {
    type Output = FuzzyBool;
    fn bitand(self, rhs: FuzzyBool) -> FuzzyBool {
        FuzzyBool(self.0.min(rhs.0))
    }
}

impl BitOr for FuzzyBool {
    type Output = FuzzyBool;
    fn bitor(self, rhs: FuzzyBool) -> FuzzyBool {
        FuzzyBool(self.0.max(rhs.0))
    }
}

impl Lerp for FuzzyBool {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        FuzzyBool(lerp_f64(self.0, other.0, t))
    }
}
