//! Adaptation of upstream query rows into engine observations.
//!
//! The data-access layer ships rows as JSON: numbers arrive as numbers or
//! as text (decimal comma included), timestamps as Unix milliseconds or
//! as strings. A malformed field degrades locally instead of failing the
//! batch: bad pressure becomes NaN, so every speed window reading that
//! endpoint classifies as neutral, and a bad timestamp collapses the
//! windows touching it to the zero-speed default.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::cast::{segment_casts, CastConfig, CastResult, Observation};
use crate::error::SourceError;
use crate::quantity;
use crate::source::{ObservationQuery, ObservationSource};

/// Timestamp assigned to rows whose `measuring_time` does not parse.
/// Saturating window arithmetic turns any window touching it into the
/// zero-speed default.
const UNPARSED_TIME_MS: i64 = i64::MIN;

/// A field that may arrive as a JSON number or as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => quantity::parse_scalar(s).ok(),
        }
    }

    fn as_text(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// One observation row as the query layer delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub pressure: Scalar,
    pub measuring_time: Scalar,
    pub value: Scalar,
}

/// Convert upstream rows into engine observations, degrading malformed
/// fields per the recovery policy instead of erroring.
pub fn observations_from_rows(rows: &[RawObservation]) -> Vec<Observation> {
    rows.iter()
        .map(|row| {
            let pressure = row.pressure.as_f64().unwrap_or_else(|| {
                warn!(
                    "non-numeric pressure {:?}, sample will classify as neutral",
                    row.pressure
                );
                f64::NAN
            });
            let measuring_time_ms = parse_measuring_time(&row.measuring_time).unwrap_or_else(|| {
                warn!("unparsable measuring_time {:?}", row.measuring_time);
                UNPARSED_TIME_MS
            });
            Observation::new(pressure, measuring_time_ms, row.value.as_text())
        })
        .collect()
}

/// Unix milliseconds from a numeric field, an RFC 3339 string, or the
/// `YYYY-MM-DD HH:MM:SS` form the upstream database emits.
pub(crate) fn parse_measuring_time(field: &Scalar) -> Option<i64> {
    match field {
        Scalar::Number(ms) if ms.is_finite() => Some(*ms as i64),
        Scalar::Number(_) => None,
        Scalar::Text(s) => {
            let s = s.trim();
            if let Ok(t) = DateTime::parse_from_rfc3339(s) {
                return Some(t.timestamp_millis());
            }
            for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(t) = NaiveDateTime::parse_from_str(s, format) {
                    return Some(t.and_utc().timestamp_millis());
                }
            }
            None
        }
    }
}

/// Run the segmentation once per parameter series of a deployment, keyed
/// the way the chart layer addresses them (`"{parameter}-{sensor_id}"`).
pub fn segment_by_parameter<S: ObservationSource>(
    source: &S,
    query: &ObservationQuery,
    config: CastConfig,
) -> Result<BTreeMap<String, CastResult>, SourceError> {
    let mut results = BTreeMap::new();
    for info in source.list_parameters(query)? {
        let mut parameter_query = query.clone();
        parameter_query.sensor_id = Some(info.sensor_id);
        let rows = source.load_observations(&parameter_query)?;
        let series = observations_from_rows(&rows);
        results.insert(info.series_key(), segment_casts(series, config));
    }
    Ok(results)
}
