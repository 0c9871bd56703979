//! Blending helpers:
//! - `lerp_f64` (endpoint-exact linear interpolation)
//! - `Lerp` for values with a meaningful midpoint
//! - `step` for values without one (choose left or right by t < 0.5)

/// Linear interpolation of scalars.
///
/// Written as a weighted sum so that `t == 0` returns `a` and `t == 1` returns `b`
/// bit-for-bit.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    if t == 0.0 {
        return a;
    }
    if t == 1.0 {
        return b;
    }
    a * (1.0 - t) + b * t
}

/// Values that can be blended linearly.
pub trait Lerp: Sized {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    #[inline]
    fn lerp(&self, other: &Self, t: f64) -> Self {
        lerp_f64(*self, *other, t)
    }
}

impl<const N: usize> Lerp for [f64; N] {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut out = [0.0f64; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = lerp_f64(self[i], other[i], t);
        }
        out
    }
}

/// Step blending for step-only types: choose `a` for t < 0.5, else `b`.
#[inline]
pub fn step<'a, T>(a: &'a T, b: &'a T, t: f64) -> &'a T {
    if t < 0.5 {
        a
    } else {
        b
    }
}
