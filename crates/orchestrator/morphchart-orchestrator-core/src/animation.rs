//! Multi-leg animations: one [`Transition`] per keyframe cut of an edit.

use morphchart_chart_core::{Marker, Options, Transition};

/// One animated step: the options reached at its end and the marker pairing
/// that gets there.
#[derive(Clone, Debug)]
pub struct Leg {
    pub options: Options,
    pub transition: Transition,
}

#[derive(Clone, Debug, Default)]
pub struct Animation {
    legs: Vec<Leg>,
}

impl Animation {
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Markers at `progress` in 0..1 over the whole animation. Every leg gets
    /// an equal share of the progress range.
    pub fn sample(&self, progress: f64) -> Vec<Marker> {
        if self.legs.is_empty() {
            return Vec::new();
        }
        let (leg, factor) = self.locate(progress);
        self.legs[leg].transition.at(factor)
    }

    /// Leg index and the factor within that leg for a global progress.
    pub fn locate(&self, progress: f64) -> (usize, f64) {
        let n = self.legs.len().max(1);
        let scaled = progress.clamp(0.0, 1.0) * n as f64;
        let leg = (scaled.floor() as usize).min(n - 1);
        (leg, scaled - leg as f64)
    }

    /// Markers once the animation has finished.
    pub fn final_markers(&self) -> &[Marker] {
        self.legs
            .last()
            .map(|leg| leg.transition.target())
            .unwrap_or_default()
    }
}
