pub mod cast;
pub mod error;
pub mod ingest;
pub mod metrics;
pub mod models;
pub mod quantity;
pub mod source;
pub mod source_mock;

uniffi::include_scaffolding!("castlog");

pub use cast::{
    depth_from_pressure, segment_casts, CastConfig, CastDirection, CastResult, IndexRange,
    Observation,
};
pub use error::{ParseError, SourceError};
pub use ingest::{observations_from_rows, segment_by_parameter, RawObservation, Scalar};
pub use metrics::ProfileStats;
pub use models::{
    Deployment, DeploymentId, Logger, LoggerId, ParameterInfo, Platform, PlatformId, SensorId,
    Vessel, VesselId,
};
pub use quantity::{duration_to_seconds, parse_quantity, parse_scalar, Quantity};
pub use source::{ObservationQuery, ObservationSource};
pub use source_mock::{MemorySource, StoredRow};
