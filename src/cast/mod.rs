//! Cast segmentation over a deployment's pressure profile.
//!
//! A profile recorded during one instrument deployment divides into three
//! phases: the descent of the instrument (downcast), the bottom phase, and
//! the ascent (upcast). The engine classifies every sample by thresholding
//! a window-smoothed vertical speed, extracts the maximal consecutive runs
//! per direction, and reports the longest run per direction as the cast
//! boundaries, falling back to a fixed half-split of the series when no
//! sample ever exceeds the threshold.
//!
//! The transformation is pure and stateless per invocation. The caller
//! owns the two tuning parameters and may re-run a previously fetched
//! series with new values without re-fetching.
//!
//! # Example
//!
//! ```
//! use castlog_compute::cast::{segment_casts, CastConfig, Observation};
//!
//! let series: Vec<Observation> = (0..6i64)
//!     .map(|i| {
//!         let pressure = 1013.0 + 500.0 * (3 - (i - 3).abs()) as f64;
//!         Observation::new(pressure, i * 1000, "8.4")
//!     })
//!     .collect();
//!
//! let result = segment_casts(
//!     series,
//!     CastConfig {
//!         threshold: 0.5,
//!         window_half_size: 1,
//!     },
//! );
//! assert!(result.down_start_index <= result.down_end_index);
//! assert_eq!(result.up_end_index, 5);
//! ```

use serde::{Deserialize, Serialize};

pub mod runs;
pub mod speed;

pub use speed::depth_from_pressure;

/// One measured sample of a deployment profile, plus the derived fields
/// the segmentation fills in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Raw pressure reading (millibar).
    pub pressure: f64,
    /// Sample timestamp, Unix milliseconds.
    pub measuring_time_ms: i64,
    /// Measured parameter value as delivered upstream (numeric or text).
    pub value: String,
    /// Depth in meters, derived from `pressure`.
    pub depth: f64,
    /// Window-smoothed vertical speed.
    pub speed_down_av: f64,
    /// Pointwise vertical speed between consecutive samples.
    pub speed_down: f64,
    /// Smoothed speed exceeded `+threshold` (actively descending).
    pub threshold_exceeded_down: bool,
    /// Smoothed speed exceeded `-threshold` (actively ascending).
    pub threshold_exceeded_up: bool,
}

impl Observation {
    /// A raw sample with all derived fields zeroed; the engine fills them.
    pub fn new(pressure: f64, measuring_time_ms: i64, value: impl Into<String>) -> Self {
        Self {
            pressure,
            measuring_time_ms,
            value: value.into(),
            depth: 0.0,
            speed_down_av: 0.0,
            speed_down: 0.0,
            threshold_exceeded_down: false,
            threshold_exceeded_up: false,
        }
    }

    /// The measured value as a number, when it parses as one.
    pub fn value_scalar(&self) -> Option<f64> {
        crate::quantity::parse_scalar(&self.value).ok()
    }
}

/// Direction of travel a threshold flag refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastDirection {
    Down,
    Up,
}

/// Caller-owned tuning for the segmentation, passed into every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CastConfig {
    /// Minimum smoothed-speed magnitude (m/s) for a sample to count as
    /// actively descending or ascending.
    pub threshold: f64,
    /// Number of samples on each side of the center used for smoothing.
    pub window_half_size: u32,
}

/// A maximal run of consecutive series positions satisfying one
/// direction's threshold flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: u64,
    pub end: u64,
    pub length: u64,
}

impl IndexRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u64,
            end: end as u64,
            length: (end - start + 1) as u64,
        }
    }
}

/// Output of [`segment_casts`]: the mutated series plus the detected cast
/// boundaries and the full run lists per direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastResult {
    /// The input series with every derived field assigned.
    pub data: Vec<Observation>,
    pub down_start_index: u64,
    pub down_end_index: u64,
    pub up_start_index: u64,
    pub up_end_index: u64,
    /// Every downcast run, surfaced for multi-cast indication.
    pub downcast_runs: Vec<IndexRange>,
    /// Every upcast run, surfaced for multi-cast indication.
    pub upcast_runs: Vec<IndexRange>,
}

/// Segment a deployment profile into downcast, bottom phase and upcast.
///
/// Takes the series by value, fills every derived field in place and
/// returns the buffer inside the result. Runs to completion for any
/// input: degenerate series (empty, single point, flat, malformed fields)
/// produce the documented trivial boundaries instead of errors.
///
/// After the call `speed_down_av` holds the pressure-scaled values of the
/// second smoothing pass, which the chart layer expects; the depth-based
/// values of the first pass only drive the threshold classification.
pub fn segment_casts(mut data: Vec<Observation>, config: CastConfig) -> CastResult {
    let half_size = config.window_half_size as usize;

    speed::assign_depth_and_averaged_speed(&mut data, half_size);
    runs::apply_threshold_flags(&mut data, config.threshold);

    let down_hits = runs::flagged_indices(&data, CastDirection::Down);
    let up_hits = runs::flagged_indices(&data, CastDirection::Up);
    let downcast_runs = runs::consecutive_runs(&down_hits);
    let upcast_runs = runs::consecutive_runs(&up_hits);
    let down_longest = runs::longest_run(&downcast_runs);
    let up_longest = runs::longest_run(&upcast_runs);
    let bounds = runs::determine_boundaries(
        data.len(),
        &downcast_runs,
        &upcast_runs,
        down_longest,
        up_longest,
    );

    speed::assign_pressure_averaged_speed(&mut data, half_size);
    speed::assign_pointwise_speed(&mut data);

    CastResult {
        data,
        down_start_index: bounds.down_start as u64,
        down_end_index: bounds.down_end as u64,
        up_start_index: bounds.up_start as u64,
        up_end_index: bounds.up_end as u64,
        downcast_runs,
        upcast_runs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pressures at one-second intervals starting at t = 0.
    fn series(pressures: &[f64]) -> Vec<Observation> {
        pressures
            .iter()
            .enumerate()
            .map(|(i, &p)| Observation::new(p, i as i64 * 1000, "8.4"))
            .collect()
    }

    fn config(threshold: f64, window_half_size: u32) -> CastConfig {
        CastConfig {
            threshold,
            window_half_size,
        }
    }

    #[test]
    fn test_triangular_profile() {
        let data = series(&[1013.0, 1113.0, 1213.0, 1113.0, 1013.0]);
        let result = segment_casts(data, config(0.3, 1));

        let depths: Vec<f64> = result.data.iter().map(|o| o.depth).collect();
        assert_eq!(depths, vec![0.0, 1.0, 2.0, 1.0, 0.0]);

        let down: Vec<bool> = result
            .data
            .iter()
            .map(|o| o.threshold_exceeded_down)
            .collect();
        let up: Vec<bool> = result
            .data
            .iter()
            .map(|o| o.threshold_exceeded_up)
            .collect();
        assert_eq!(down, vec![true, true, false, false, false]);
        assert_eq!(up, vec![false, false, true, true, true]);

        // Longest runs cover the monotonic flanks of the profile.
        assert_eq!(
            (result.down_start_index, result.down_end_index),
            (0, 1),
            "downcast should cover the increasing flank"
        );
        assert_eq!(
            (result.up_start_index, result.up_end_index),
            (2, 4),
            "upcast should cover the decreasing flank"
        );

        assert_eq!(result.downcast_runs, vec![IndexRange::new(0, 1)]);
        assert_eq!(result.upcast_runs, vec![IndexRange::new(2, 4)]);
    }

    #[test]
    fn test_plotting_pass_overwrites_smoothed_speed() {
        // The second smoothing pass uses raw pressure differences, so the
        // returned values are 100x the depth-based ones used for
        // classification. Pinned so nobody deduplicates the passes.
        let data = series(&[1013.0, 1113.0, 1213.0, 1113.0, 1013.0]);
        let result = segment_casts(data, config(0.3, 1));

        assert_eq!(result.data[0].speed_down_av, 100.0);
        assert_eq!(result.data[1].speed_down_av, 100.0);
        assert_eq!(result.data[4].speed_down_av, -100.0);
    }

    #[test]
    fn test_pointwise_speed_final_point_copies_previous() {
        let data = series(&[1013.0, 1113.0, 1213.0, 1113.0, 1013.0]);
        let result = segment_casts(data, config(0.3, 1));

        let speeds: Vec<f64> = result.data.iter().map(|o| o.speed_down).collect();
        assert_eq!(speeds, vec![100.0, 100.0, -100.0, -100.0, -100.0]);
    }

    #[test]
    fn test_flat_profile_falls_back_to_half_split() {
        let data = series(&[1500.0; 10]);
        let result = segment_casts(data, config(0.1, 2));

        assert!(result.downcast_runs.is_empty());
        assert!(result.upcast_runs.is_empty());
        assert_eq!((result.down_start_index, result.down_end_index), (0, 5));
        assert_eq!((result.up_start_index, result.up_end_index), (6, 9));
    }

    #[test]
    fn test_threshold_too_high_triggers_fallback() {
        // Real motion, but nothing exceeds an absurd threshold: the
        // half-split applies and the run lists stay empty.
        let data = series(&[1013.0, 1113.0, 1213.0, 1113.0, 1013.0]);
        let result = segment_casts(data, config(50.0, 1));

        assert!(result.downcast_runs.is_empty());
        assert_eq!((result.down_start_index, result.down_end_index), (0, 3));
        assert_eq!((result.up_start_index, result.up_end_index), (4, 4));
    }

    #[test]
    fn test_single_point_series() {
        let result = segment_casts(vec![Observation::new(1713.0, 0, "3")], config(0.2, 5));

        assert_eq!(result.data.len(), 1);
        assert_eq!(result.down_start_index, 0);
        assert_eq!(result.down_end_index, 0);
        assert_eq!(result.up_start_index, 0);
        assert_eq!(result.up_end_index, 0);
        assert_eq!(result.data[0].depth, 7.0);
        assert_eq!(result.data[0].speed_down, 0.0);
    }

    #[test]
    fn test_empty_series() {
        let result = segment_casts(Vec::new(), config(0.2, 5));

        assert!(result.data.is_empty());
        assert_eq!(result.down_start_index, 0);
        assert_eq!(result.up_end_index, 0);
        assert!(result.downcast_runs.is_empty());
        assert!(result.upcast_runs.is_empty());
    }

    #[test]
    fn test_boundary_indices_stay_in_range() {
        // A noisy profile with several direction changes must still report
        // indices inside the series for both directions.
        let pressures = [
            1013.0, 1413.0, 1313.0, 1813.0, 2213.0, 2213.0, 2213.0, 1913.0, 2013.0, 1513.0, 1013.0,
        ];
        for window in [0u32, 1, 3, 20] {
            for threshold in [0.0, 0.5, 2.0, 10.0] {
                let result = segment_casts(series(&pressures), config(threshold, window));
                let len = result.data.len() as u64;
                assert!(result.down_start_index <= result.down_end_index);
                assert!(result.down_end_index < len);
                assert!(result.up_start_index <= result.up_end_index);
                assert!(result.up_end_index < len, "window={window} threshold={threshold}");
            }
        }
    }

    #[test]
    fn test_reapplying_config_to_same_series() {
        // The caller keeps the raw series and re-runs with new tuning;
        // both invocations see identical input and stay independent.
        let raw = series(&[1013.0, 1113.0, 1213.0, 1113.0, 1013.0]);

        let sensitive = segment_casts(raw.clone(), config(0.3, 1));
        let insensitive = segment_casts(raw, config(50.0, 1));

        assert!(!sensitive.downcast_runs.is_empty());
        assert!(insensitive.downcast_runs.is_empty());
        assert_eq!(
            (sensitive.down_start_index, sensitive.down_end_index),
            (0, 1)
        );
        assert_eq!(
            (insensitive.down_start_index, insensitive.down_end_index),
            (0, 3)
        );
    }
}
