//! `Interpolated<T>`: a settled value, or a small set of weighted states while a
//! transition is in flight.
//!
//! Two-state blends come from a single transition leg (`between`). Composing two
//! already-blended values (`interpolate`) can transiently produce more states; the
//! count is capped at [`MAX_STATES`], keeping the heaviest ones.
//!
//! Values with a meaningful midpoint are evaluated with [`Interpolated::combine`].
//! Step-only values (text, identities, indices) are consumed state by state with
//! [`Interpolated::visit`] or collapsed with [`Interpolated::dominant`].

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use smallvec::SmallVec;

use crate::blend::Lerp;

/// Upper bound on simultaneous contributing states.
pub const MAX_STATES: usize = 4;

/// One contributing state and its weight.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Weighted<T> {
    pub value: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub fn new(value: T, weight: f64) -> Self {
        Self { value, weight }
    }

    pub fn as_ref(&self) -> Weighted<&T> {
        Weighted {
            value: &self.value,
            weight: self.weight,
        }
    }
}

/// Invariant for `Blend`: 2..=MAX_STATES states, pairwise distinct values,
/// positive weights summing to one. Deserialization goes through
/// [`Interpolated::from_states`], so a decoded blend holds it too.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "states", rename_all = "lowercase")]
pub enum Interpolated<T> {
    Single(T),
    Blend(SmallVec<[Weighted<T>; 2]>),
}

#[derive(Deserialize)]
#[serde(tag = "kind", content = "states", rename_all = "lowercase")]
enum Encoded<T> {
    Single(T),
    Blend(Vec<Weighted<T>>),
}

impl<'de, T> Deserialize<'de> for Interpolated<T>
where
    T: Deserialize<'de> + Clone + PartialEq,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Encoded::deserialize(deserializer)? {
            Encoded::Single(value) => Ok(Interpolated::Single(value)),
            Encoded::Blend(states) => Interpolated::from_states(states).ok_or_else(|| {
                D::Error::custom("blend needs at least one positively weighted state")
            }),
        }
    }
}

impl<T: Default> Default for Interpolated<T> {
    fn default() -> Self {
        Interpolated::Single(T::default())
    }
}

impl<T> From<T> for Interpolated<T> {
    fn from(value: T) -> Self {
        Interpolated::Single(value)
    }
}

impl<T> Interpolated<T> {
    /// Degenerate, non-animating value.
    pub fn new(value: T) -> Self {
        Interpolated::Single(value)
    }

    /// Number of contributing states.
    pub fn count(&self) -> usize {
        match self {
            Interpolated::Single(_) => 1,
            Interpolated::Blend(states) => states.len(),
        }
    }

    /// The `i`-th contributing state; a settled value has weight 1.
    pub fn get(&self, i: usize) -> Option<Weighted<&T>> {
        match self {
            Interpolated::Single(v) if i == 0 => Some(Weighted::new(v, 1.0)),
            Interpolated::Single(_) => None,
            Interpolated::Blend(states) => states.get(i).map(Weighted::as_ref),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Weighted<&T>> + '_ {
        (0..self.count()).filter_map(move |i| self.get(i))
    }

    /// Invoke `f(index, state)` once per contributing state.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(usize, Weighted<&T>),
    {
        for (i, state) in self.iter().enumerate() {
            f(i, state);
        }
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Interpolated::Single(_))
    }

    /// The value when settled, `None` mid-transition.
    pub fn settled(&self) -> Option<&T> {
        match self {
            Interpolated::Single(v) => Some(v),
            Interpolated::Blend(_) => None,
        }
    }

    /// The heaviest state; the earliest one wins ties.
    pub fn dominant(&self) -> &T {
        match self {
            Interpolated::Single(v) => v,
            Interpolated::Blend(states) => {
                let mut best = &states[0];
                for s in states.iter().skip(1) {
                    if s.weight > best.weight {
                        best = s;
                    }
                }
                &best.value
            }
        }
    }
}

impl<T: Clone + PartialEq> Interpolated<T> {
    /// Two-state blend at `factor` in 0..1. Factor 0 and 1 settle exactly on
    /// `prev` and `next`.
    pub fn between(prev: T, next: T, factor: f64) -> Self {
        if factor <= 0.0 || prev == next {
            return Interpolated::Single(prev);
        }
        if factor >= 1.0 {
            return Interpolated::Single(next);
        }
        let mut states = SmallVec::new();
        states.push(Weighted::new(prev, 1.0 - factor));
        states.push(Weighted::new(next, factor));
        Interpolated::Blend(states)
    }

    /// Build from arbitrary weighted states: equal values are merged, nonpositive
    /// weights dropped, the heaviest [`MAX_STATES`] kept and weights renormalized.
    /// Returns `None` when no state carries weight.
    pub fn from_states<I>(states: I) -> Option<Self>
    where
        I: IntoIterator<Item = Weighted<T>>,
    {
        let mut merged: SmallVec<[Weighted<T>; 4]> = SmallVec::new();
        for s in states {
            if s.weight.is_nan() || s.weight <= 0.0 {
                continue;
            }
            match merged.iter_mut().find(|m| m.value == s.value) {
                Some(existing) => existing.weight += s.weight,
                None => merged.push(s),
            }
        }

        if merged.len() > MAX_STATES {
            let mut order: Vec<usize> = (0..merged.len()).collect();
            order.sort_by(|&a, &b| merged[b].weight.total_cmp(&merged[a].weight));
            let mut keep = vec![false; merged.len()];
            for &i in order.iter().take(MAX_STATES) {
                keep[i] = true;
            }
            let mut i = 0;
            merged.retain(|_| {
                let k = keep[i];
                i += 1;
                k
            });
        }

        let total: f64 = merged.iter().map(|s| s.weight).sum();
        if merged.is_empty() || total.is_nan() || total <= 0.0 {
            return None;
        }
        if merged.len() == 1 {
            return merged.pop().map(|s| Interpolated::Single(s.value));
        }
        let states = merged
            .into_iter()
            .map(|s| Weighted::new(s.value, s.weight / total))
            .collect();
        Some(Interpolated::Blend(states))
    }

    /// Compose two interpolated values: the states of `a` weighted by `1 - factor`
    /// and the states of `b` weighted by `factor`.
    pub fn interpolate(a: &Self, b: &Self, factor: f64) -> Self {
        if factor <= 0.0 {
            return a.clone();
        }
        if factor >= 1.0 {
            return b.clone();
        }
        let states = a
            .iter()
            .map(|s| Weighted::new(s.value.clone(), s.weight * (1.0 - factor)))
            .chain(
                b.iter()
                    .map(|s| Weighted::new(s.value.clone(), s.weight * factor)),
            );
        Self::from_states(states).unwrap_or_else(|| b.clone())
    }

    /// Map every state; states that map to equal values are merged.
    pub fn map<U, F>(&self, mut f: F) -> Interpolated<U>
    where
        U: Clone + PartialEq,
        F: FnMut(&T) -> U,
    {
        match self {
            Interpolated::Single(v) => Interpolated::Single(f(v)),
            Interpolated::Blend(states) => {
                let first = f(&states[0].value);
                let mapped = std::iter::once(Weighted::new(first.clone(), states[0].weight)).chain(
                    states
                        .iter()
                        .skip(1)
                        .map(|s| Weighted::new(f(&s.value), s.weight)),
                );
                Interpolated::from_states(mapped).unwrap_or(Interpolated::Single(first))
            }
        }
    }

    /// Total weight of the states equal to `value`.
    pub fn weight_of(&self, value: &T) -> f64 {
        self.iter()
            .filter(|s| s.value == value)
            .map(|s| s.weight)
            .sum()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|s| s.value == value)
    }
}

impl<T: Lerp + Clone> Interpolated<T> {
    /// Blend all states into one value.
    pub fn combine(&self) -> T {
        match self {
            Interpolated::Single(v) => v.clone(),
            Interpolated::Blend(states) => {
                let mut acc = states[0].value.clone();
                let mut acc_w = states[0].weight;
                for s in states.iter().skip(1) {
                    acc_w += s.weight;
                    if acc_w > 0.0 {
                        acc = acc.lerp(&s.value, s.weight / acc_w);
                    }
                }
                acc
            }
        }
    }
}
