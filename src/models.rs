use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VesselId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoggerId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeploymentId(pub i64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SensorId(pub i64);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub name: String,
    pub vessel_id: Option<VesselId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Logger {
    pub id: LoggerId,
    pub model: String,
    pub serial_number: Option<String>,
    pub platform_id: Option<PlatformId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub logger_id: LoggerId,
    pub time_start_ms: i64,
    pub time_end_ms: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub notes: Option<String>,
}

/// One measured parameter of a deployment, as the sensor metadata
/// describes it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub sensor_id: SensorId,
    pub parameter: String,
    pub unit: Option<String>,
}

impl ParameterInfo {
    /// Key under which the chart layer addresses this parameter's series.
    pub fn series_key(&self) -> String {
        format!("{}-{}", self.parameter, self.sensor_id.0)
    }
}
