use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::math::StatsHelper;
use crate::processing::rdm::RangeDopplerMap;

/// One RDM cell with its physical coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub doppler_bin: usize,
    pub range_bin: usize,
    pub range_m: f64,
    pub velocity_mps: f64,
    pub magnitude: f64,
}

impl RangeDopplerMap {
    fn cell(&self, doppler_bin: usize, range_bin: usize) -> Peak {
        Peak {
            doppler_bin,
            range_bin,
            range_m: self.range_axis[range_bin],
            velocity_mps: self.velocity_axis[doppler_bin],
            magnitude: self.magnitude[[doppler_bin, range_bin]],
        }
    }

    /// Strongest cell, `None` for an empty map.
    pub fn peak(&self) -> Option<Peak> {
        self.magnitude
            .indexed_iter()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|((d, r), _)| self.cell(d, r))
    }

    /// Up to `count` strongest cells, each at least `guard + 1` bins away
    /// (on either axis) from every stronger pick.
    pub fn peaks(&self, count: usize, guard: usize) -> Vec<Peak> {
        let mut cells: Vec<((usize, usize), f64)> = self
            .magnitude
            .indexed_iter()
            .map(|(idx, &m)| (idx, m))
            .collect();
        cells.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut picked: Vec<Peak> = Vec::with_capacity(count);
        for ((d, r), _) in cells {
            if picked.len() == count {
                break;
            }
            let suppressed = picked
                .iter()
                .any(|p| p.doppler_bin.abs_diff(d) <= guard && p.range_bin.abs_diff(r) <= guard);
            if !suppressed {
                picked.push(self.cell(d, r));
            }
        }
        picked
    }

    /// Max-hold over Doppler for every range bin.
    pub fn range_profile(&self) -> Vec<f64> {
        self.magnitude
            .map_axis(Axis(0), |lane| lane.fold(0.0_f64, |acc, &m| acc.max(m)))
            .to_vec()
    }

    /// Max-hold over range for every Doppler bin.
    pub fn doppler_profile(&self) -> Vec<f64> {
        self.magnitude
            .map_axis(Axis(1), |lane| lane.fold(0.0_f64, |acc, &m| acc.max(m)))
            .to_vec()
    }

    pub fn to_db(&self) -> Array2<f64> {
        self.magnitude.mapv(StatsHelper::magnitude_to_db)
    }
}
