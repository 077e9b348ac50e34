use crate::error::SourceError;
use crate::ingest::{parse_measuring_time, RawObservation, Scalar};
use crate::models::{
    Deployment, DeploymentId, Logger, LoggerId, ParameterInfo, Platform, PlatformId, SensorId,
    Vessel, VesselId,
};
use crate::source::{ObservationQuery, ObservationSource};

/// One stored observation row with the columns the queries filter on.
#[derive(Clone, Debug)]
pub struct StoredRow {
    pub deployment_id: DeploymentId,
    pub sensor_id: SensorId,
    pub valid: bool,
    pub row: RawObservation,
}

/// In-memory observation source for tests and embedding consumers.
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    pub vessels: Vec<Vessel>,
    pub platforms: Vec<Platform>,
    pub loggers: Vec<Logger>,
    pub deployments: Vec<Deployment>,
    pub parameters: Vec<(DeploymentId, ParameterInfo)>,
    pub rows: Vec<StoredRow>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single deployment with a triangular nine-sample pressure profile
    /// (descent, turning point, ascent) for one temperature sensor.
    pub fn with_sample_data() -> Self {
        let start_ms: i64 = 1_705_000_000_000;
        let deployment_id = DeploymentId(42);
        let sensor_id = SensorId(3);

        let pressures = [
            1013.0, 1763.0, 2513.0, 3263.0, 4013.0, 3263.0, 2513.0, 1763.0, 1013.0,
        ];
        let rows = pressures
            .iter()
            .enumerate()
            .map(|(i, &pressure)| StoredRow {
                deployment_id,
                sensor_id,
                valid: true,
                row: RawObservation {
                    pressure: Scalar::Number(pressure),
                    measuring_time: Scalar::Number((start_ms + i as i64 * 1000) as f64),
                    value: Scalar::Text("8,4".to_string()),
                },
            })
            .collect();

        Self {
            vessels: vec![Vessel {
                id: VesselId(1),
                name: "RV Aurora".to_string(),
            }],
            platforms: vec![Platform {
                id: PlatformId(1),
                name: "CTD frame 2".to_string(),
                vessel_id: Some(VesselId(1)),
            }],
            loggers: vec![Logger {
                id: LoggerId(7),
                model: "CTD-48M".to_string(),
                serial_number: Some("0423".to_string()),
                platform_id: Some(PlatformId(1)),
            }],
            deployments: vec![Deployment {
                id: deployment_id,
                logger_id: LoggerId(7),
                time_start_ms: start_ms,
                time_end_ms: start_ms + 900_000,
                lat: Some(54.32),
                lon: Some(10.14),
                notes: None,
            }],
            parameters: vec![(
                deployment_id,
                ParameterInfo {
                    sensor_id,
                    parameter: "temperature".to_string(),
                    unit: Some("C".to_string()),
                },
            )],
            rows,
        }
    }

    fn non_empty<T>(items: Vec<T>) -> Result<Vec<T>, SourceError> {
        if items.is_empty() {
            Err(SourceError::EmptyResult)
        } else {
            Ok(items)
        }
    }
}

impl ObservationSource for MemorySource {
    fn list_vessels(&self) -> Result<Vec<Vessel>, SourceError> {
        Self::non_empty(self.vessels.clone())
    }

    fn list_platforms(&self) -> Result<Vec<Platform>, SourceError> {
        Self::non_empty(self.platforms.clone())
    }

    fn list_loggers_with_deployments(&self) -> Result<Vec<Logger>, SourceError> {
        let loggers = self
            .loggers
            .iter()
            .filter(|logger| self.deployments.iter().any(|d| d.logger_id == logger.id))
            .cloned()
            .collect();
        Self::non_empty(loggers)
    }

    fn list_deployments(&self, logger_id: LoggerId) -> Result<Vec<Deployment>, SourceError> {
        let deployments = self
            .deployments
            .iter()
            .filter(|d| d.logger_id == logger_id)
            .cloned()
            .collect();
        Self::non_empty(deployments)
    }

    fn list_parameters(&self, query: &ObservationQuery) -> Result<Vec<ParameterInfo>, SourceError> {
        let parameters = self
            .parameters
            .iter()
            .filter(|(deployment_id, _)| *deployment_id == query.deployment_id)
            .map(|(_, info)| info.clone())
            .collect();
        Self::non_empty(parameters)
    }

    fn load_observations(
        &self,
        query: &ObservationQuery,
    ) -> Result<Vec<RawObservation>, SourceError> {
        let rows = self
            .rows
            .iter()
            .filter(|stored| stored.deployment_id == query.deployment_id)
            .filter(|stored| query.sensor_id.is_none_or(|id| id == stored.sensor_id))
            .filter(|stored| stored.valid || !query.valid_only)
            .filter(|stored| {
                let t = parse_measuring_time(&stored.row.measuring_time);
                match t {
                    Some(t) => {
                        query.time_min_ms.is_none_or(|min| t >= min)
                            && query.time_max_ms.is_none_or(|max| t <= max)
                    }
                    // Rows without a parseable timestamp only survive an
                    // unrestricted query.
                    None => query.time_min_ms.is_none() && query.time_max_ms.is_none(),
                }
            })
            .map(|stored| stored.row.clone())
            .collect();
        Self::non_empty(rows)
    }
}
