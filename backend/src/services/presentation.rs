//! Score and heatmap cell to visual tier/size mapping.

use serde::{Deserialize, Serialize};

use crate::api::{DemandMarker, DemandScore, DemandTier, HeatmapCell};

/// Marker size bounds in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualScale {
    pub min_size: f64,
    pub max_size: f64,
}

impl Default for VisualScale {
    fn default() -> Self {
        Self {
            min_size: 8.0,
            max_size: 20.0,
        }
    }
}

impl VisualScale {
    pub fn new(min_size: f64, max_size: f64) -> Self {
        Self { min_size, max_size }
    }

    pub fn size_for(&self, score: f64, max_score: f64) -> f64 {
        self.min_size + normalized(score, max_score) * (self.max_size - self.min_size)
    }
}

/// `score / max_score` clamped to [0, 1]; 0 when `max_score` is not positive.
fn normalized(score: f64, max_score: f64) -> f64 {
    if max_score <= 0.0 || !score.is_finite() {
        return 0.0;
    }
    (score / max_score).clamp(0.0, 1.0)
}

pub fn tier(score: f64, max_score: f64) -> DemandTier {
    let n = normalized(score, max_score);
    if n > 2.0 / 3.0 {
        DemandTier::High
    } else if n > 1.0 / 3.0 {
        DemandTier::Medium
    } else {
        DemandTier::Low
    }
}

/// Marker size on the default 8..20 scale.
pub fn intensity_size(score: f64, max_score: f64) -> f64 {
    VisualScale::default().size_for(score, max_score)
}

/// Dense 24×7 grid indexed `[hour][day]`; cells without data read as 0.
pub fn heatmap_grid(cells: &[HeatmapCell]) -> [[f64; 7]; 24] {
    let mut grid = [[0.0; 7]; 24];
    for cell in cells {
        if let Some(row) = grid.get_mut(cell.hour as usize) {
            if let Some(slot) = row.get_mut(cell.day as usize) {
                *slot = cell.value;
            }
        }
    }
    grid
}

/// Tier of one heatmap cell against the grid maximum, floored at 1.
pub fn cell_tier(cell: &HeatmapCell, grid: &[[f64; 7]; 24]) -> DemandTier {
    let max = grid
        .iter()
        .flat_map(|row| row.iter().copied())
        .fold(1.0, f64::max);
    tier(cell.value, max)
}

/// One marker per ranked locality, sized against the top score.
pub fn demand_markers(ranked: &[DemandScore], scale: VisualScale) -> Vec<DemandMarker> {
    let max_score = ranked
        .iter()
        .map(|d| d.score)
        .fold(f64::NEG_INFINITY, f64::max);

    ranked
        .iter()
        .map(|d| DemandMarker {
            locality: d.locality.clone(),
            coordinates: d.coordinates,
            tier: tier(d.score, max_score),
            size: scale.size_for(d.score, max_score),
        })
        .collect()
}
