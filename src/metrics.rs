//! Metrics computation for deployment profiles.
//!
//! This module provides pure functions to compute statistics from a
//! segmented profile. All inputs are plain data structures - no database
//! or transport dependencies.

use serde::{Deserialize, Serialize};

use crate::cast::CastResult;
use crate::models::Deployment;

/// Computed statistics for one deployment profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileStats {
    /// Number of samples in the series.
    pub sample_count: u64,
    /// Total deployment time in seconds.
    pub total_time_sec: i64,
    /// Time spent in the detected downcast.
    pub descent_time_sec: i64,
    /// Time between the end of the downcast and the start of the upcast.
    pub bottom_time_sec: i64,
    /// Time spent in the detected upcast.
    pub ascent_time_sec: i64,
    /// Maximum depth reached.
    pub max_depth_m: f64,
    /// Average depth across all samples.
    pub avg_depth_m: f64,
    /// Time-weighted average depth.
    pub weighted_avg_depth_m: f64,
    /// Descent rate over the detected downcast (m/s).
    pub descent_rate_m_s: f64,
    /// Ascent rate over the detected upcast (m/s).
    pub ascent_rate_m_s: f64,
    /// Minimum parsable parameter value.
    pub min_value: f64,
    /// Maximum parsable parameter value.
    pub max_value: f64,
    /// Average of the parsable parameter values.
    pub avg_value: f64,
}

impl ProfileStats {
    /// Compute statistics from a deployment and its segmented profile.
    pub fn compute(deployment: &Deployment, cast: &CastResult) -> Self {
        let samples = &cast.data;
        if samples.is_empty() {
            return Self::from_deployment_only(deployment);
        }

        let total_time_sec =
            (deployment.time_end_ms.saturating_sub(deployment.time_start_ms)) / 1000;

        let mut max_depth_m: f64 = 0.0;
        let mut depth_sum = 0.0;
        let mut depth_count = 0u64;
        let mut weighted_depth_sum = 0.0;
        let mut weight_sum = 0.0;

        let mut min_value = f64::MAX;
        let mut max_value = f64::MIN;
        let mut value_sum = 0.0;
        let mut value_count = 0u64;

        for (i, sample) in samples.iter().enumerate() {
            if sample.depth.is_finite() {
                if sample.depth > max_depth_m {
                    max_depth_m = sample.depth;
                }
                depth_sum += sample.depth;
                depth_count += 1;

                // Weight by the interval to the neighboring sample.
                let dt_ms = if i + 1 < samples.len() {
                    samples[i + 1].measuring_time_ms - sample.measuring_time_ms
                } else if i > 0 {
                    sample.measuring_time_ms - samples[i - 1].measuring_time_ms
                } else {
                    1_000
                };
                if dt_ms > 0 {
                    let dt = dt_ms as f64 / 1000.0;
                    weighted_depth_sum += sample.depth * dt;
                    weight_sum += dt;
                }
            }

            if let Some(value) = sample.value_scalar() {
                if value.is_finite() {
                    if value < min_value {
                        min_value = value;
                    }
                    if value > max_value {
                        max_value = value;
                    }
                    value_sum += value;
                    value_count += 1;
                }
            }
        }

        let avg_depth_m = if depth_count > 0 {
            depth_sum / depth_count as f64
        } else {
            0.0
        };
        let weighted_avg_depth_m = if weight_sum > 0.0 {
            weighted_depth_sum / weight_sum
        } else {
            avg_depth_m
        };

        let time_at = |index: u64| {
            samples
                .get(index as usize)
                .map(|s| s.measuring_time_ms)
                .unwrap_or(0)
        };
        let depth_at = |index: u64| samples.get(index as usize).map(|s| s.depth).unwrap_or(0.0);

        let descent_time_sec =
            (time_at(cast.down_end_index).saturating_sub(time_at(cast.down_start_index))).max(0)
                / 1000;
        let bottom_time_sec =
            (time_at(cast.up_start_index).saturating_sub(time_at(cast.down_end_index))).max(0)
                / 1000;
        let ascent_time_sec =
            (time_at(cast.up_end_index).saturating_sub(time_at(cast.up_start_index))).max(0) / 1000;

        let descent_rate_m_s = {
            let d_depth = depth_at(cast.down_end_index) - depth_at(cast.down_start_index);
            if descent_time_sec > 0 && d_depth.is_finite() {
                d_depth / descent_time_sec as f64
            } else {
                0.0
            }
        };
        let ascent_rate_m_s = {
            let d_depth = depth_at(cast.up_start_index) - depth_at(cast.up_end_index);
            if ascent_time_sec > 0 && d_depth.is_finite() {
                d_depth / ascent_time_sec as f64
            } else {
                0.0
            }
        };

        // Handle edge cases for values.
        if min_value == f64::MAX {
            min_value = 0.0;
        }
        if max_value == f64::MIN {
            max_value = 0.0;
        }
        let avg_value = if value_count > 0 {
            value_sum / value_count as f64
        } else {
            0.0
        };

        ProfileStats {
            sample_count: samples.len() as u64,
            total_time_sec,
            descent_time_sec,
            bottom_time_sec,
            ascent_time_sec,
            max_depth_m,
            avg_depth_m,
            weighted_avg_depth_m,
            descent_rate_m_s,
            ascent_rate_m_s,
            min_value,
            max_value,
            avg_value,
        }
    }

    fn from_deployment_only(deployment: &Deployment) -> Self {
        ProfileStats {
            sample_count: 0,
            total_time_sec: (deployment.time_end_ms.saturating_sub(deployment.time_start_ms))
                / 1000,
            descent_time_sec: 0,
            bottom_time_sec: 0,
            ascent_time_sec: 0,
            max_depth_m: 0.0,
            avg_depth_m: 0.0,
            weighted_avg_depth_m: 0.0,
            descent_rate_m_s: 0.0,
            ascent_rate_m_s: 0.0,
            min_value: 0.0,
            max_value: 0.0,
            avg_value: 0.0,
        }
    }
}
