//! morphchart-anim-core: animatable values (engine-agnostic)
//!
//! Every attribute of a chart marker that can change between two chart states is
//! carried through this crate:
//! - [`Interpolated`] holds one settled value or a small weighted set of transitional states
//! - [`Lerp`] blends values that have a meaningful midpoint (scalars, points, rects, colors)
//! - [`FuzzyBool`] is a boolean that can be partially true while a marker fades in or out

pub mod blend;
pub mod color;
pub mod fuzzy;
pub mod geom;
pub mod interpolated;

pub use blend::{lerp_f64, step, Lerp};
pub use color::Color;
pub use fuzzy::FuzzyBool;
pub use geom::{Point, Rect};
pub use interpolated::{Interpolated, Weighted, MAX_STATES};
