//! Depth conversion and the vertical speed passes.
//!
//! Three speed series are written into the derived observation fields:
//! the depth-based smoothed speed that drives classification, the
//! pressure-based smoothed speed the chart layer plots, and the
//! unwindowed pointwise speed. The engine decides the order they run in.

use crate::cast::Observation;

/// Atmospheric offset subtracted from raw pressure (millibar).
const ATMOSPHERIC_PRESSURE_MBAR: f64 = 1013.0;

/// Millibar of pressure per meter of depth.
const MBAR_PER_METER: f64 = 100.0;

/// Convert a raw pressure reading to depth in meters.
///
/// `p = 1013` maps to the surface, `p = 2013` to ten meters below it.
pub fn depth_from_pressure(pressure: f64) -> f64 {
    (pressure - ATMOSPHERIC_PRESSURE_MBAR) / MBAR_PER_METER
}

/// Elapsed seconds between two sample timestamps.
fn elapsed_sec(begin_ms: i64, end_ms: i64) -> f64 {
    end_ms.saturating_sub(begin_ms) as f64 / 1000.0
}

/// Centered window `[i - half_size, i + half_size]` clamped to the series.
/// A half size at or beyond the series length collapses every window to
/// the whole series, repeating the single global slope at each index.
fn window_bounds(i: usize, half_size: usize, len: usize) -> (usize, usize) {
    (i.saturating_sub(half_size), (i + half_size).min(len - 1))
}

/// Classification pass: assign `depth` for every point and the smoothed
/// vertical speed from depth-converted window endpoints.
pub fn assign_depth_and_averaged_speed(data: &mut [Observation], half_size: usize) {
    let len = data.len();
    for i in 0..len {
        let (begin, end) = window_bounds(i, half_size, len);
        let d_depth =
            depth_from_pressure(data[end].pressure) - depth_from_pressure(data[begin].pressure);
        let dt = elapsed_sec(data[begin].measuring_time_ms, data[end].measuring_time_ms);
        // Avoid division by zero at series boundaries or duplicate timestamps.
        data[i].speed_down_av = if dt > 0.0 { d_depth / dt } else { 0.0 };
        data[i].depth = depth_from_pressure(data[i].pressure);
    }
}

/// Plotting pass: recompute the smoothed speed from raw pressure
/// differences, overwriting `speed_down_av`. The chart layer expects the
/// pressure-scaled values, so this pass stays separate from the
/// depth-based one.
pub fn assign_pressure_averaged_speed(data: &mut [Observation], half_size: usize) {
    let len = data.len();
    for i in 0..len {
        let (begin, end) = window_bounds(i, half_size, len);
        let d_pressure = data[end].pressure - data[begin].pressure;
        let dt = elapsed_sec(data[begin].measuring_time_ms, data[end].measuring_time_ms);
        data[i].speed_down_av = if dt > 0.0 { d_pressure / dt } else { 0.0 };
    }
}

/// Unwindowed forward-difference speed between consecutive samples. The
/// final sample has no successor and copies the previous value, so
/// callers never see an unset trailing entry.
pub fn assign_pointwise_speed(data: &mut [Observation]) {
    let len = data.len();
    for i in 0..len.saturating_sub(1) {
        let d_pressure = data[i + 1].pressure - data[i].pressure;
        let dt = elapsed_sec(data[i].measuring_time_ms, data[i + 1].measuring_time_ms);
        data[i].speed_down = if dt > 0.0 { d_pressure / dt } else { 0.0 };
    }
    if len > 0 {
        data[len - 1].speed_down = if len > 1 { data[len - 2].speed_down } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(pressure: f64, measuring_time_ms: i64) -> Observation {
        Observation::new(pressure, measuring_time_ms, "")
    }

    #[test]
    fn test_depth_from_pressure_anchor_points() {
        assert_eq!(depth_from_pressure(1013.0), 0.0);
        assert_eq!(depth_from_pressure(2013.0), 10.0);
        assert_eq!(depth_from_pressure(513.0), -5.0);
    }

    #[test]
    fn test_averaged_speed_assigns_depth_everywhere() {
        let mut data = vec![obs(1013.0, 0), obs(1513.0, 1000), obs(2013.0, 2000)];
        assign_depth_and_averaged_speed(&mut data, 1);

        assert_eq!(data[0].depth, 0.0);
        assert_eq!(data[1].depth, 5.0);
        assert_eq!(data[2].depth, 10.0);
        assert_eq!(data[0].speed_down_av, 5.0);
        assert_eq!(data[1].speed_down_av, 5.0);
        assert_eq!(data[2].speed_down_av, 5.0);
    }

    #[test]
    fn test_oversized_window_repeats_global_slope() {
        let mut data = vec![
            obs(1013.0, 0),
            obs(1513.0, 1000),
            obs(2013.0, 2000),
            obs(2513.0, 3000),
        ];
        assign_depth_and_averaged_speed(&mut data, 10);

        // Every window clamps to the full series: (15 m - 0 m) / 3 s.
        for point in &data {
            assert_eq!(point.speed_down_av, 5.0);
        }
    }

    #[test]
    fn test_duplicate_timestamps_force_zero_speed() {
        let mut data = vec![obs(1013.0, 5000), obs(2013.0, 5000)];
        assign_depth_and_averaged_speed(&mut data, 1);

        for point in &data {
            assert_eq!(
                point.speed_down_av, 0.0,
                "zero elapsed time must not produce NaN or infinity"
            );
        }
    }

    #[test]
    fn test_out_of_order_timestamps_force_zero_speed() {
        let mut data = vec![obs(1013.0, 9000), obs(2013.0, 3000)];
        assign_depth_and_averaged_speed(&mut data, 1);
        assert_eq!(data[0].speed_down_av, 0.0);

        assign_pointwise_speed(&mut data);
        assert_eq!(data[0].speed_down, 0.0);
    }

    #[test]
    fn test_nan_pressure_stays_local() {
        let mut data = vec![
            obs(1013.0, 0),
            obs(f64::NAN, 1000),
            obs(1213.0, 2000),
            obs(1313.0, 3000),
            obs(1413.0, 4000),
        ];
        assign_depth_and_averaged_speed(&mut data, 1);

        // Windows touching the malformed point produce NaN speeds, which
        // later classify as neutral; windows past it stay numeric.
        assert!(data[1].depth.is_nan());
        assert!(data[3].speed_down_av.is_finite());
        assert_eq!(data[3].speed_down_av, 1.0);
    }

    #[test]
    fn test_pointwise_speed_uses_raw_pressure() {
        let mut data = vec![obs(1013.0, 0), obs(1113.0, 1000), obs(1013.0, 3000)];
        assign_pointwise_speed(&mut data);

        assert_eq!(data[0].speed_down, 100.0);
        assert_eq!(data[1].speed_down, -50.0);
        // Final point copies its predecessor.
        assert_eq!(data[2].speed_down, -50.0);
    }

    #[test]
    fn test_pointwise_speed_single_point_is_zero() {
        let mut data = vec![obs(1713.0, 0)];
        assign_pointwise_speed(&mut data);
        assert_eq!(data[0].speed_down, 0.0);
    }

    #[test]
    fn test_empty_series_is_a_no_op() {
        let mut data: Vec<Observation> = Vec::new();
        assign_depth_and_averaged_speed(&mut data, 3);
        assign_pressure_averaged_speed(&mut data, 3);
        assign_pointwise_speed(&mut data);
        assert!(data.is_empty());
    }
}
