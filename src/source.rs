use crate::error::SourceError;
use crate::ingest::RawObservation;
use crate::models::{Deployment, DeploymentId, Logger, LoggerId, ParameterInfo, Platform, SensorId, Vessel};

/// Selection of one deployment's observation rows.
#[derive(Clone, Debug, PartialEq)]
pub struct ObservationQuery {
    pub deployment_id: DeploymentId,
    pub logger_id: LoggerId,
    /// Restrict to one parameter's sensor; `None` selects all.
    pub sensor_id: Option<SensorId>,
    /// Companion time-brush restriction (Unix ms, inclusive).
    pub time_min_ms: Option<i64>,
    pub time_max_ms: Option<i64>,
    /// Only rows the upstream validation marked good.
    pub valid_only: bool,
}

impl ObservationQuery {
    pub fn new(deployment_id: DeploymentId, logger_id: LoggerId) -> Self {
        Self {
            deployment_id,
            logger_id,
            sensor_id: None,
            time_min_ms: None,
            time_max_ms: None,
            valid_only: true,
        }
    }
}

/// Read-only contract over the excluded query layer. Implementations
/// report [`SourceError::EmptyResult`] when a selection matches nothing,
/// so callers can distinguish an empty state from a backend failure.
pub trait ObservationSource {
    fn list_vessels(&self) -> Result<Vec<Vessel>, SourceError>;
    fn list_platforms(&self) -> Result<Vec<Platform>, SourceError>;

    /// Loggers that have at least one deployment with observation rows.
    fn list_loggers_with_deployments(&self) -> Result<Vec<Logger>, SourceError>;
    fn list_deployments(&self, logger_id: LoggerId) -> Result<Vec<Deployment>, SourceError>;

    /// Parameter descriptors available for the queried deployment.
    fn list_parameters(&self, query: &ObservationQuery) -> Result<Vec<ParameterInfo>, SourceError>;
    fn load_observations(&self, query: &ObservationQuery)
        -> Result<Vec<RawObservation>, SourceError>;
}
