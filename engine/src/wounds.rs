//! Wound tracks: box counts per body location banded by Physique + Strength,
//! and normalization of the stored boolean tracks to those counts.

use serde::{Deserialize, Serialize};

use crate::hit_location::HitLocation;

/// One band of the combat-box table. `min`/`max` are inclusive; `None` is
/// unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WoundCapacityRow {
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub head: usize,
    pub torso: usize,
    pub right_arm: usize,
    pub left_arm: usize,
    pub right_leg: usize,
    pub left_leg: usize,
    pub serious: usize,
    pub critical: usize,
}

const fn row(
    min: Option<i32>,
    max: Option<i32>,
    [head, torso, right_arm, left_arm, right_leg, left_leg, serious, critical]: [usize; 8],
) -> WoundCapacityRow {
    WoundCapacityRow {
        min,
        max,
        head,
        torso,
        right_arm,
        left_arm,
        right_leg,
        left_leg,
        serious,
        critical,
    }
}

// The 28-29 band gives the left leg one more box than the right. That is how
// the table reads in the source data; confirm against the rulebook before
// changing it.
pub const WOUND_TABLE: [WoundCapacityRow; 12] = [
    row(None, Some(9), [2, 5, 2, 2, 3, 3, 4, 2]),
    row(Some(10), Some(11), [2, 6, 2, 2, 4, 4, 4, 2]),
    row(Some(12), Some(13), [2, 6, 3, 3, 4, 4, 5, 3]),
    row(Some(14), Some(15), [3, 7, 3, 3, 5, 5, 5, 3]),
    row(Some(16), Some(17), [3, 7, 4, 4, 5, 5, 6, 3]),
    row(Some(18), Some(19), [3, 8, 4, 4, 6, 6, 6, 4]),
    row(Some(20), Some(21), [4, 8, 5, 5, 6, 6, 7, 4]),
    row(Some(22), Some(23), [4, 9, 5, 5, 7, 7, 7, 4]),
    row(Some(24), Some(25), [4, 9, 6, 6, 7, 7, 8, 5]),
    row(Some(26), Some(27), [5, 10, 6, 6, 8, 8, 8, 5]),
    row(Some(28), Some(29), [5, 10, 7, 7, 8, 9, 9, 5]),
    row(Some(30), None, [5, 11, 7, 7, 9, 9, 9, 6]),
];

impl WoundCapacityRow {
    pub fn contains(&self, total: i32) -> bool {
        self.min.is_none_or(|min| total >= min) && self.max.is_none_or(|max| total <= max)
    }

    pub fn location(&self, loc: HitLocation) -> usize {
        match loc {
            HitLocation::Head => self.head,
            HitLocation::Torso => self.torso,
            HitLocation::RightArm => self.right_arm,
            HitLocation::LeftArm => self.left_arm,
            HitLocation::RightLeg => self.right_leg,
            HitLocation::LeftLeg => self.left_leg,
        }
    }

    pub fn capacity(&self, track: TrackKind) -> usize {
        match track {
            TrackKind::Location(loc) => self.location(loc),
            TrackKind::Serious => self.serious,
            TrackKind::Critical => self.critical,
            // Mental capacity comes from Mental Strength, not this table.
            TrackKind::Mental => 0,
        }
    }
}

/// Row for a Physique + Strength total. The bands cover every integer, so the
/// fallback to the first row is never taken for a well-formed table.
pub fn capacity_row(attribute_sum: i32) -> &'static WoundCapacityRow {
    WOUND_TABLE
        .iter()
        .find(|r| r.contains(attribute_sum))
        .unwrap_or(&WOUND_TABLE[0])
}

pub fn mental_capacity(mental_strength: i32) -> usize {
    mental_strength.max(0) as usize
}

/// Which stored wound track a box belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Location(HitLocation),
    Serious,
    Critical,
    Mental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackBox {
    pub index: usize,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WoundTrack {
    pub capacity: usize,
    pub filled: Vec<bool>,
}

impl WoundTrack {
    pub fn normalized(stored: &[bool], capacity: usize) -> Self {
        Self {
            capacity,
            filled: normalize_track(stored, capacity),
        }
    }

    pub fn boxes(&self) -> Vec<TrackBox> {
        box_view(&self.filled)
    }

    pub fn marked(&self) -> usize {
        self.filled.iter().filter(|&&b| b).count()
    }
}

/// Truncate or pad with `false` to exactly `len` entries.
pub fn normalize_track(stored: &[bool], len: usize) -> Vec<bool> {
    let mut out: Vec<bool> = stored.iter().copied().take(len).collect();
    out.resize(len, false);
    out
}

pub fn box_view(filled: &[bool]) -> Vec<TrackBox> {
    filled
        .iter()
        .enumerate()
        .map(|(index, &checked)| TrackBox { index, checked })
        .collect()
}

/// Normalize, then flip one box. Out-of-range indices leave the track as-is.
pub fn toggle_box(stored: &[bool], capacity: usize, index: usize) -> Vec<bool> {
    let mut track = normalize_track(stored, capacity);
    if let Some(b) = track.get_mut(index) {
        *b = !*b;
    }
    track
}

/// Click semantics shared by the Dread boxes, reload dots and vehicle tracks:
/// clicking box `i` sets the value to `i + 1`, unless it already is, in which
/// case it steps back to `i`.
pub fn ladder_toggle(current: u32, clicked_index: u32, max: Option<u32>) -> u32 {
    let target = clicked_index.saturating_add(1);
    let next = if current == target { target - 1 } else { target };
    match max {
        Some(max) => next.min(max),
        None => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges() {
        assert_eq!(capacity_row(i32::MIN).torso, 5);
        assert_eq!(capacity_row(9).torso, 5);
        assert_eq!(capacity_row(10).torso, 6);
        assert_eq!(capacity_row(29).left_leg, 9);
        assert_eq!(capacity_row(29).right_leg, 8);
        assert_eq!(capacity_row(30).critical, 6);
        assert_eq!(capacity_row(i32::MAX).torso, 11);
    }

    #[test]
    fn ladder_toggle_steps_back_on_same_box() {
        assert_eq!(ladder_toggle(0, 2, None), 3);
        assert_eq!(ladder_toggle(3, 2, None), 2);
        assert_eq!(ladder_toggle(1, 0, None), 0);
        assert_eq!(ladder_toggle(0, 9, Some(5)), 5);
    }
}
