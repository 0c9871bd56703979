//! Pairing two marker sequences for an animated transition.
//!
//! Markers are matched on `main_id` first. Markers left over on both sides
//! are then matched on `sub_id`, `stack_id` and `size_id` in that order,
//! where a key pairs a group only when one side of it holds a single marker
//! (one marker splitting into many, or many merging into one). What is still
//! unmatched vanishes (old side) or materializes (new side).

use hashbrown::{HashMap, HashSet};
use log::debug;
use morphchart_anim_core::{FuzzyBool, Lerp};

use crate::error::ChartError;
use crate::marker::{Id, Marker};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchKey {
    Main,
    Sub,
    Stack,
    Size,
}

impl MatchKey {
    const FALLBACK: [MatchKey; 3] = [MatchKey::Sub, MatchKey::Stack, MatchKey::Size];

    fn of(self, marker: &Marker) -> &Id {
        match self {
            MatchKey::Main => marker.main_id.dominant(),
            MatchKey::Sub => &marker.sub_id,
            MatchKey::Stack => &marker.stack_id,
            MatchKey::Size => &marker.size_id,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pairing {
    Morph { from: usize, to: usize, via: MatchKey },
    Vanish { from: usize },
    Materialize { to: usize },
}

#[derive(Clone, Debug)]
pub struct Transition {
    source: Vec<Marker>,
    target: Vec<Marker>,
    pairs: Vec<Pairing>,
}

impl Transition {
    pub fn new(source: Vec<Marker>, target: Vec<Marker>) -> Result<Self, ChartError> {
        check_unique(&source, "transition source")?;
        check_unique(&target, "transition target")?;

        let pairs = pair(&source, &target);
        debug!(
            "transition {} -> {} marker(s): {} pairing(s)",
            source.len(),
            target.len(),
            pairs.len()
        );
        Ok(Self {
            source,
            target,
            pairs,
        })
    }

    pub fn pairs(&self) -> &[Pairing] {
        &self.pairs
    }

    pub fn source(&self) -> &[Marker] {
        &self.source
    }

    /// The finished sequence; vanished markers are gone.
    pub fn target(&self) -> &[Marker] {
        &self.target
    }

    pub fn into_target(self) -> Vec<Marker> {
        self.target
    }

    /// The blended sequence at `factor` in 0..1, one marker per pairing.
    /// Marker `idx` and neighbour references are rewritten to positions in
    /// the returned sequence.
    pub fn at(&self, factor: f64) -> Vec<Marker> {
        let factor = factor.clamp(0.0, 1.0);
        let from_pos = first_positions(&self.source, &self.pairs, |p| match *p {
            Pairing::Morph { from, .. } | Pairing::Vanish { from } => Some(from),
            Pairing::Materialize { .. } => None,
        });
        let to_pos = first_positions(&self.target, &self.pairs, |p| match *p {
            Pairing::Morph { to, .. } | Pairing::Materialize { to } => Some(to),
            Pairing::Vanish { .. } => None,
        });

        self.pairs
            .iter()
            .enumerate()
            .map(|(pos, pairing)| {
                let mut marker = match *pairing {
                    Pairing::Morph { from, to, .. } => Marker::interpolate(
                        &remapped(&self.source[from], &from_pos),
                        &remapped(&self.target[to], &to_pos),
                        factor,
                    ),
                    Pairing::Vanish { from } => {
                        let mut m = remapped(&self.source[from], &from_pos);
                        m.enabled = m.enabled.lerp(&FuzzyBool::FALSE, factor);
                        m
                    }
                    Pairing::Materialize { to } => {
                        let mut m = remapped(&self.target[to], &to_pos);
                        m.enabled = FuzzyBool::FALSE.lerp(&m.enabled, factor);
                        m
                    }
                };
                marker.idx = pos;
                marker
            })
            .collect()
    }
}

/// Pairings in output order: for each target position its materialization
/// or its morphs, then every vanished source marker.
fn pair(source: &[Marker], target: &[Marker]) -> Vec<Pairing> {
    let mut from_used = vec![false; source.len()];
    let mut to_used = vec![false; target.len()];
    let mut morphs: Vec<(usize, usize, MatchKey)> = Vec::new();

    let by_main: HashMap<&Id, usize> = source
        .iter()
        .enumerate()
        .map(|(i, m)| (MatchKey::Main.of(m), i))
        .collect();
    for (to, marker) in target.iter().enumerate() {
        if let Some(&from) = by_main.get(MatchKey::Main.of(marker)) {
            morphs.push((from, to, MatchKey::Main));
            from_used[from] = true;
            to_used[to] = true;
        }
    }

    for key in MatchKey::FALLBACK {
        let sources = group(source, &from_used, key);
        let targets = group(target, &to_used, key);
        let mut handled: HashSet<&Id> = HashSet::new();
        for (to, marker) in target.iter().enumerate() {
            let id = key.of(marker);
            if to_used[to] || !handled.insert(id) {
                continue;
            }
            let (Some(froms), Some(tos)) = (sources.get(id), targets.get(id)) else {
                continue;
            };
            if froms.len() != 1 && tos.len() != 1 {
                continue;
            }
            for &from in froms {
                for &to in tos {
                    morphs.push((from, to, key));
                }
            }
            froms.iter().for_each(|&i| from_used[i] = true);
            tos.iter().for_each(|&i| to_used[i] = true);
        }
    }

    morphs.sort_by_key(|&(from, to, _)| (to, from));
    let mut pairs = Vec::with_capacity(morphs.len() + source.len() + target.len());
    let mut next = morphs.iter().peekable();
    for to in 0..target.len() {
        if !to_used[to] {
            pairs.push(Pairing::Materialize { to });
        }
        while let Some(&&(from, _, via)) = next.peek().filter(|m| m.1 == to) {
            pairs.push(Pairing::Morph { from, to, via });
            next.next();
        }
    }
    pairs.extend(
        from_used
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(from, _)| Pairing::Vanish { from }),
    );
    pairs
}

fn check_unique(markers: &[Marker], context: &'static str) -> Result<(), ChartError> {
    let mut seen = HashSet::with_capacity(markers.len());
    for marker in markers {
        let id = marker.main_id.dominant();
        if !seen.insert(id) {
            return Err(ChartError::IdentityCollision {
                context,
                id: format!("{id:?}"),
            });
        }
    }
    Ok(())
}

fn group<'a>(markers: &'a [Marker], used: &[bool], key: MatchKey) -> HashMap<&'a Id, Vec<usize>> {
    let mut groups: HashMap<&Id, Vec<usize>> = HashMap::new();
    for (i, marker) in markers.iter().enumerate() {
        if !used[i] {
            groups.entry(key.of(marker)).or_default().push(i);
        }
    }
    groups
}

/// Marker `idx` -> first output position carrying that marker.
fn first_positions<F>(markers: &[Marker], pairs: &[Pairing], side: F) -> HashMap<usize, usize>
where
    F: Fn(&Pairing) -> Option<usize>,
{
    let mut positions = HashMap::with_capacity(markers.len());
    for (pos, pairing) in pairs.iter().enumerate() {
        if let Some(i) = side(pairing) {
            positions.entry(markers[i].idx).or_insert(pos);
        }
    }
    positions
}

fn remapped(marker: &Marker, positions: &HashMap<usize, usize>) -> Marker {
    let mut m = marker.clone();
    let remap = |i: &Option<usize>| i.and_then(|i| positions.get(&i).copied());
    m.prev_main_marker_idx = m.prev_main_marker_idx.map(remap);
    m.next_main_marker_idx = m.next_main_marker_idx.map(remap);
    m.next_sub_marker_idx = m.next_sub_marker_idx.map(remap);
    m
}
