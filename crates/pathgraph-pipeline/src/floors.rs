//! FloorSeparator and PassageFloorAssigner (§4.3, §4.4): partitions
//! non-vertical points into Z-histogram peak clusters, then attaches
//! `from_floor`/`to_floor` to each vertical passage by nearest centroid.
//!
//! Peak-based clustering (not k-means) because the floor count is
//! unknown ahead of time and real indoor Z histograms are strongly
//! multimodal with flat plateaus.

use pathgraph_core::constants::{
    FLOOR_HEIGHT, FLOOR_HIST_BIN_WIDTH, FLOOR_HIST_MIN_BINS, FLOOR_HIST_REGION_GAP,
    FLOOR_HIST_SIGMA_BINS, FLOOR_HIST_SIGNIFICANT_FRACTION, FLOOR_PEAK_SEPARATION_FRACTION,
    MIN_POINTS_PER_FLOOR,
};
use pathgraph_core::{Floor, Position, VerticalPassage, UNKNOWN_FLOOR};

/// Z-histogram peak-based floor separator.
#[derive(Debug, Clone, Copy)]
pub struct FloorSeparator {
    floor_height: f64,
    bin_width: f64,
    min_bins: usize,
    sigma_bins: f64,
    significant_fraction: f64,
    region_gap: usize,
    peak_separation_fraction: f64,
    min_points_per_floor: usize,
}

impl Default for FloorSeparator {
    fn default() -> Self {
        Self {
            floor_height: FLOOR_HEIGHT,
            bin_width: FLOOR_HIST_BIN_WIDTH,
            min_bins: FLOOR_HIST_MIN_BINS,
            sigma_bins: FLOOR_HIST_SIGMA_BINS,
            significant_fraction: FLOOR_HIST_SIGNIFICANT_FRACTION,
            region_gap: FLOOR_HIST_REGION_GAP,
            peak_separation_fraction: FLOOR_PEAK_SEPARATION_FRACTION,
            min_points_per_floor: MIN_POINTS_PER_FLOOR,
        }
    }
}

impl FloorSeparator {
    /// Partition `points` (with their `original_indices`, in ascending
    /// order and of equal length) into floor clusters, relabeled `1..K`
    /// in ascending `z_mean` order.
    #[must_use]
    pub fn separate(&self, points: &[Position], original_indices: &[usize]) -> Vec<Floor> {
        debug_assert_eq!(points.len(), original_indices.len());
        if points.is_empty() {
            return Vec::new();
        }

        let z_min = points.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
        let z_max = points.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max);

        let peak_zs: Vec<f64> = if z_max - z_min < self.floor_height {
            vec![(z_min + z_max) / 2.0]
        } else {
            let peaks = self.histogram_peaks(points, z_min, z_max);
            if peaks.is_empty() {
                self.uniform_slabs(z_min, z_max)
            } else {
                peaks
            }
        };

        self.assign_and_relabel(points, original_indices, &peak_zs)
    }

    fn histogram_peaks(&self, points: &[Position], z_min: f64, z_max: f64) -> Vec<f64> {
        let range = z_max - z_min;
        let bins_by_width = (range / self.bin_width).ceil() as usize;
        let num_bins = bins_by_width.max(self.min_bins).max(1);
        let bin_width = range / num_bins as f64;

        let mut counts = vec![0.0_f64; num_bins];
        for p in points {
            let mut idx = ((p.z - z_min) / bin_width).floor() as isize;
            if idx < 0 {
                idx = 0;
            }
            let idx = (idx as usize).min(num_bins - 1);
            counts[idx] += 1.0;
        }

        let smoothed = gaussian_smooth(&counts, self.sigma_bins);
        let total: f64 = counts.iter().sum();
        let threshold = self.significant_fraction * total;

        let significant: Vec<bool> = smoothed.iter().map(|&c| c >= threshold).collect();
        let regions = group_regions(&significant, self.region_gap);

        let mut candidates: Vec<(f64, f64)> = regions
            .into_iter()
            .map(|(lo, hi)| {
                let mut weight_sum = 0.0;
                let mut weighted_z = 0.0;
                for bin in lo..hi {
                    let center = z_min + (bin as f64 + 0.5) * bin_width;
                    weight_sum += smoothed[bin];
                    weighted_z += smoothed[bin] * center;
                }
                let peak_z = if weight_sum > 0.0 { weighted_z / weight_sum } else { 0.0 };
                (weight_sum, peak_z)
            })
            .collect();

        candidates.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut accepted: Vec<f64> = Vec::new();
        let min_separation = self.peak_separation_fraction * self.floor_height;
        for (_, z) in candidates {
            if accepted.iter().all(|&a: &f64| (a - z).abs() >= min_separation) {
                accepted.push(z);
            }
        }
        accepted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        accepted
    }

    fn uniform_slabs(&self, z_min: f64, z_max: f64) -> Vec<f64> {
        let k = ((z_max - z_min) / self.floor_height).ceil().max(1.0) as usize;
        (0..k)
            .map(|i| z_min + self.floor_height * (i as f64 + 0.5))
            .collect()
    }

    fn assign_and_relabel(
        &self,
        points: &[Position],
        original_indices: &[usize],
        peak_zs: &[f64],
    ) -> Vec<Floor> {
        let mut clusters: Vec<(Vec<usize>, Vec<Position>)> =
            vec![(Vec::new(), Vec::new()); peak_zs.len()];

        for (i, p) in points.iter().enumerate() {
            let (nearest, _) = peak_zs
                .iter()
                .enumerate()
                .map(|(k, &z)| (k, (p.z - z).abs()))
                .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .expect("peak_zs is non-empty");
            clusters[nearest].0.push(original_indices[i]);
            clusters[nearest].1.push(*p);
        }

        let mut floors: Vec<Floor> = clusters
            .into_iter()
            .filter(|(indices, _)| indices.len() >= self.min_points_per_floor)
            .map(|(original_indices, points)| {
                let z_mean = points.iter().map(|p| p.z).sum::<f64>() / points.len() as f64;
                let z_min = points.iter().map(|p| p.z).fold(f64::INFINITY, f64::min);
                let z_max = points.iter().map(|p| p.z).fold(f64::NEG_INFINITY, f64::max);
                Floor {
                    level: 0,
                    original_indices,
                    points,
                    z_mean,
                    z_min,
                    z_max,
                }
            })
            .collect();

        floors.sort_by(|a, b| a.z_mean.partial_cmp(&b.z_mean).unwrap_or(std::cmp::Ordering::Equal));
        for (i, floor) in floors.iter_mut().enumerate() {
            floor.level = (i + 1) as u32;
        }
        floors
    }
}

/// 1-D discrete Gaussian smoothing, truncated at ±3σ, with the kernel
/// renormalized at the array edges (no implicit zero-padding bias).
fn gaussian_smooth(values: &[f64], sigma_bins: f64) -> Vec<f64> {
    let radius = (3.0 * sigma_bins).ceil() as isize;
    let kernel: Vec<f64> = (-radius..=radius)
        .map(|k| (-0.5 * (k as f64 / sigma_bins).powi(2)).exp())
        .collect();

    let n = values.len() as isize;
    let mut out = vec![0.0; values.len()];
    for i in 0..n {
        let mut acc = 0.0;
        let mut weight = 0.0;
        for (ki, k) in (-radius..=radius).enumerate() {
            let j = i + k;
            if j >= 0 && j < n {
                acc += values[j as usize] * kernel[ki];
                weight += kernel[ki];
            }
        }
        out[i as usize] = if weight > 0.0 { acc / weight } else { 0.0 };
    }
    out
}

/// Group indices where `mask[i]` is true into `[lo, hi)` regions,
/// merging across gaps of up to `max_gap` false entries.
fn group_regions(mask: &[bool], max_gap: usize) -> Vec<(usize, usize)> {
    let mut regions: Vec<(usize, usize)> = Vec::new();
    let mut cur: Option<(usize, usize)> = None;
    let mut gap = 0usize;

    for (i, &m) in mask.iter().enumerate() {
        if m {
            match cur {
                Some((_, ref mut hi)) => {
                    *hi = i + 1;
                    gap = 0;
                }
                None => cur = Some((i, i + 1)),
            }
        } else if let Some((lo, hi)) = cur {
            gap += 1;
            if gap > max_gap {
                regions.push((lo, hi));
                cur = None;
                gap = 0;
            }
        }
    }
    if let Some(region) = cur {
        regions.push(region);
    }
    regions
}

/// PassageFloorAssigner (§4.4): attach nearest-centroid `from_floor`/
/// `to_floor` to a vertical passage.
pub struct PassageFloorAssigner;

impl PassageFloorAssigner {
    /// Assign `from_floor`/`to_floor` on every passage in place.
    pub fn assign(floors: &[Floor], passages: &mut [VerticalPassage]) {
        for passage in passages.iter_mut() {
            passage.from_floor = Self::nearest_floor_level(floors, passage.z_start);
            passage.to_floor = Self::nearest_floor_level(floors, passage.z_end);
        }
    }

    fn nearest_floor_level(floors: &[Floor], z: f64) -> i32 {
        floors
            .iter()
            .min_by(|a, b| {
                (a.z_mean - z)
                    .abs()
                    .partial_cmp(&(b.z_mean - z).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map_or(UNKNOWN_FLOOR, |f| f.level as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_cluster(z: f64, n: usize, offset: f64) -> Vec<Position> {
        (0..n)
            .map(|i| Position::new(offset + i as f64 * 0.1, 0.0, z))
            .collect()
    }

    #[test]
    fn single_floor_when_z_range_is_small() {
        let points = flat_cluster(0.0, 30, 0.0);
        let indices: Vec<usize> = (0..30).collect();
        let floors = FloorSeparator::default().separate(&points, &indices);
        assert_eq!(floors.len(), 1);
        assert_eq!(floors[0].level, 1);
        assert_eq!(floors[0].point_count(), 30);
    }

    #[test]
    fn two_well_separated_clusters_become_two_floors() {
        let mut points = flat_cluster(0.0, 60, 0.0);
        points.extend(flat_cluster(3.2, 60, 0.0));
        let indices: Vec<usize> = (0..points.len()).collect();
        let floors = FloorSeparator::default().separate(&points, &indices);
        assert_eq!(floors.len(), 2);
        assert_eq!(floors[0].level, 1);
        assert_eq!(floors[1].level, 2);
        assert!(floors[0].z_mean < floors[1].z_mean);
    }

    #[test]
    fn floors_are_disjoint_in_original_index() {
        let mut points = flat_cluster(0.0, 60, 0.0);
        points.extend(flat_cluster(4.0, 60, 0.0));
        let indices: Vec<usize> = (0..points.len()).collect();
        let floors = FloorSeparator::default().separate(&points, &indices);
        let mut all_indices: Vec<usize> = floors.iter().flat_map(|f| f.original_indices.clone()).collect();
        all_indices.sort_unstable();
        let mut dedup = all_indices.clone();
        dedup.dedup();
        assert_eq!(all_indices.len(), dedup.len(), "no original index appears in two floors");
    }

    #[test]
    fn tiny_cluster_is_dropped_for_min_points() {
        // Only 3 points near a far-away z shouldn't survive MIN_POINTS_PER_FLOOR,
        // even though it is its own histogram peak.
        let mut points = flat_cluster(0.0, 60, 0.0);
        points.extend(flat_cluster(10.0, 3, 0.0));
        let indices: Vec<usize> = (0..points.len()).collect();
        let floors = FloorSeparator::default().separate(&points, &indices);
        assert_eq!(floors.len(), 1);
    }

    #[test]
    fn passage_assigner_picks_nearest_floor_by_z_mean() {
        let floors = vec![
            Floor {
                level: 1,
                original_indices: vec![],
                points: vec![],
                z_mean: 0.0,
                z_min: 0.0,
                z_max: 0.0,
            },
            Floor {
                level: 2,
                original_indices: vec![],
                points: vec![],
                z_mean: 3.0,
                z_min: 3.0,
                z_max: 3.0,
            },
        ];
        let mut passages = vec![VerticalPassage {
            start: 0,
            end: 10,
            classification: pathgraph_core::VerticalClass::Staircase,
            z_start: 0.1,
            z_end: 2.9,
            xy_length: 1.0,
            direction: pathgraph_core::VerticalDirection::Up,
            from_floor: UNKNOWN_FLOOR,
            to_floor: UNKNOWN_FLOOR,
        }];
        PassageFloorAssigner::assign(&floors, &mut passages);
        assert_eq!(passages[0].from_floor, 1);
        assert_eq!(passages[0].to_floor, 2);
    }

    #[test]
    fn passage_assigner_with_no_floors_uses_unknown_sentinel() {
        let mut passages = vec![VerticalPassage {
            start: 0,
            end: 10,
            classification: pathgraph_core::VerticalClass::Staircase,
            z_start: 0.1,
            z_end: 2.9,
            xy_length: 1.0,
            direction: pathgraph_core::VerticalDirection::Up,
            from_floor: UNKNOWN_FLOOR,
            to_floor: UNKNOWN_FLOOR,
        }];
        PassageFloorAssigner::assign(&[], &mut passages);
        assert_eq!(passages[0].from_floor, UNKNOWN_FLOOR);
        assert_eq!(passages[0].to_floor, UNKNOWN_FLOOR);
    }
}
