//! The Dread ladder: five tiers of growing complication pressure.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DreadTier {
    pub label: &'static str,
    pub code: &'static str,
    pub boxes: u32,
    pub threshold: u32,
    pub value: u32,
}

pub const DREAD_TIERS: [DreadTier; 5] = [
    DreadTier { label: "20", code: "", boxes: 1, threshold: 1, value: 0 },
    DreadTier { label: "19-20", code: "D1", boxes: 2, threshold: 3, value: 1 },
    DreadTier { label: "18-20", code: "D2", boxes: 3, threshold: 6, value: 2 },
    DreadTier { label: "17-20", code: "D3", boxes: 4, threshold: 10, value: 3 },
    DreadTier { label: "16-20", code: "D4", boxes: 5, threshold: 15, value: 4 },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreadBox {
    /// 1-based, numbered across all tiers.
    pub global_index: u32,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreadTierView {
    pub label: String,
    pub code: String,
    pub threshold: u32,
    pub value: u32,
    pub complete: bool,
    pub boxes: Vec<DreadBox>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DreadLadder {
    pub total: u32,
    pub active_effect: u32,
    pub tiers: Vec<DreadTierView>,
}

impl DreadLadder {
    pub fn compute(total: u32) -> Self {
        let mut active_effect = 0;
        let mut previous_threshold = 0;
        let tiers = DREAD_TIERS
            .iter()
            .map(|tier| {
                let complete = total >= tier.threshold;
                if complete {
                    active_effect = tier.value;
                }
                let boxes = (1..=tier.boxes)
                    .map(|i| {
                        let global_index = previous_threshold + i;
                        DreadBox {
                            global_index,
                            checked: total >= global_index,
                        }
                    })
                    .collect();
                previous_threshold = tier.threshold;
                DreadTierView {
                    label: tier.label.to_string(),
                    code: tier.code.to_string(),
                    threshold: tier.threshold,
                    value: tier.value,
                    complete,
                    boxes,
                }
            })
            .collect();

        Self {
            total,
            active_effect,
            tiers,
        }
    }

    pub fn complication_threshold(&self) -> i32 {
        crate::skill::BASE_COMPLICATION_THRESHOLD - self.active_effect as i32
    }
}

/// Effect level only, for callers that do not need the box view.
pub fn active_effect(total: u32) -> u32 {
    DREAD_TIERS
        .iter()
        .filter(|t| total >= t.threshold)
        .map(|t| t.value)
        .last()
        .unwrap_or(0)
}
