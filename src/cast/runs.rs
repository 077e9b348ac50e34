//! Threshold flags and consecutive-run detection over flagged positions.

use log::debug;

use crate::cast::{CastDirection, IndexRange, Observation};

/// Mark each sample whose smoothed speed exceeds the threshold magnitude.
/// For a non-negative threshold a sample can satisfy at most one flag;
/// NaN speeds satisfy neither and classify as neutral.
pub fn apply_threshold_flags(data: &mut [Observation], threshold: f64) {
    for point in data.iter_mut() {
        point.threshold_exceeded_down = point.speed_down_av > threshold;
        point.threshold_exceeded_up = point.speed_down_av < -threshold;
    }
}

/// Positions whose flag for `direction` is set, in series order.
pub fn flagged_indices(data: &[Observation], direction: CastDirection) -> Vec<usize> {
    data.iter()
        .enumerate()
        .filter(|(_, point)| match direction {
            CastDirection::Down => point.threshold_exceeded_down,
            CastDirection::Up => point.threshold_exceeded_up,
        })
        .map(|(index, _)| index)
        .collect()
}

/// Every maximal run of pairwise-consecutive positions in `flagged`.
///
/// The longest-run selection reads from this list, so the two views of
/// the same input can never disagree about run boundaries.
pub fn consecutive_runs(flagged: &[usize]) -> Vec<IndexRange> {
    let mut runs = Vec::new();
    let Some(&first) = flagged.first() else {
        return runs;
    };
    let mut start = first;
    let mut previous = first;
    for &index in &flagged[1..] {
        if index != previous + 1 {
            runs.push(IndexRange::new(start, previous));
            start = index;
        }
        previous = index;
    }
    runs.push(IndexRange::new(start, previous));
    runs
}

/// Boundaries of the longest run, the earliest run winning ties. An empty
/// run list yields `(0, 0)`.
pub fn longest_run(runs: &[IndexRange]) -> (usize, usize) {
    let mut best_length = 0u64;
    let mut bounds = (0, 0);
    for run in runs {
        if run.length > best_length {
            best_length = run.length;
            bounds = (run.start as usize, run.end as usize);
        }
    }
    bounds
}

/// Final boundaries reported for a segmentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastBoundaries {
    pub down_start: usize,
    pub down_end: usize,
    pub up_start: usize,
    pub up_end: usize,
}

/// Pick the reported boundaries: the longest run per direction, or the
/// fixed half-split of the series when that direction never exceeded the
/// threshold. Fallback bounds are clamped into the series so short
/// profiles still report valid positions. A fallback boundary means "no
/// cast detected", not a verified cast.
pub fn determine_boundaries(
    len: usize,
    downcast_runs: &[IndexRange],
    upcast_runs: &[IndexRange],
    down_longest: (usize, usize),
    up_longest: (usize, usize),
) -> CastBoundaries {
    if len == 0 {
        return CastBoundaries::default();
    }
    let half = (len as f64 / 2.0).round() as usize;
    let last = len - 1;

    let (down_start, down_end) = if downcast_runs.is_empty() {
        debug!("no downcast exceeded the threshold, using half-split boundaries");
        (0, half.min(last))
    } else {
        down_longest
    };

    let (up_start, up_end) = if upcast_runs.is_empty() {
        debug!("no upcast exceeded the threshold, using half-split boundaries");
        ((half + 1).min(last), last)
    } else {
        up_longest
    };

    CastBoundaries {
        down_start,
        down_end,
        up_start,
        up_end,
    }
}
