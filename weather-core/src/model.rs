use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Unit group understood by the provider. Controls displayed units too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Us,
    Uk,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Us => "us",
            UnitSystem::Uk => "uk",
        }
    }

    pub const fn all() -> &'static [UnitSystem] {
        &[UnitSystem::Metric, UnitSystem::Us, UnitSystem::Uk]
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "us" => Ok(UnitSystem::Us),
            "uk" => Ok(UnitSystem::Uk),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported unit systems: metric, us, uk."
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where to fetch weather for: typed text or a coordinate fix.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Text(String),
    Coordinates(Coordinates),
}

/// One observation or forecast hour. Every field except the timestamp is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub epoch_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_time: Option<String>,
    pub temperature: Option<f64>,
    pub wind_speed: Option<f64>,
    pub precip_probability: Option<f64>,
    pub conditions_text: Option<String>,
    pub icon_code: Option<String>,
}

impl Sample {
    pub fn at(epoch_seconds: i64) -> Self {
        Self {
            epoch_seconds,
            local_time: None,
            temperature: None,
            wind_speed: None,
            precip_probability: None,
            conditions_text: None,
            icon_code: None,
        }
    }
}

/// Flattened provider response. `samples` is always sorted by epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub timezone_name: String,
    pub display_address: String,
    pub anchor: Option<Sample>,
    pub samples: Vec<Sample>,
}

/// Fully determines one outbound request. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    endpoint: String,
    parameters: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub(crate) fn new(endpoint: String, parameters: BTreeMap<String, String>) -> Self {
        Self {
            endpoint,
            parameters,
        }
    }

    /// Absolute URL with the location already percent-encoded into the path.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}
