use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::{
    config::ProviderSettings,
    error::WeatherError,
    model::{Coordinates, LocationQuery, RequestDescriptor},
};

/// Same unreserved set as a URI-component encoder.
const LOCATION_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const INCLUDE: &str = "days,hours,current";
pub const ELEMENTS: &str = "datetime,datetimeEpoch,temp,windspeed,precipprob,conditions,icon";

/// Builds provider requests covering yesterday through tomorrow.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    settings: ProviderSettings,
}

impl QueryBuilder {
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn build(&self, query: &LocationQuery) -> Result<RequestDescriptor, WeatherError> {
        let location = match query {
            LocationQuery::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(WeatherError::InvalidInput("location is empty".to_string()));
                }
                trimmed.to_string()
            }
            LocationQuery::Coordinates(coords) => coordinate_label(coords)?,
        };

        Ok(self.descriptor_for(&location))
    }

    pub fn for_text(&self, text: &str) -> Result<RequestDescriptor, WeatherError> {
        self.build(&LocationQuery::Text(text.to_string()))
    }

    pub fn for_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<RequestDescriptor, WeatherError> {
        self.build(&LocationQuery::Coordinates(Coordinates {
            latitude,
            longitude,
        }))
    }

    fn descriptor_for(&self, location: &str) -> RequestDescriptor {
        let encoded = utf8_percent_encode(location, LOCATION_SEGMENT);
        let endpoint = format!("{}{}/yesterday/tomorrow", self.settings.base_url, encoded);

        let parameters = BTreeMap::from([
            ("key".to_string(), self.settings.credential.clone()),
            ("unitGroup".to_string(), self.settings.unit_system.as_str().to_string()),
            ("include".to_string(), INCLUDE.to_string()),
            ("elements".to_string(), ELEMENTS.to_string()),
            ("contentType".to_string(), "json".to_string()),
            ("options".to_string(), "nonulls".to_string()),
        ]);

        RequestDescriptor::new(endpoint, parameters)
    }
}

fn coordinate_label(coords: &Coordinates) -> Result<String, WeatherError> {
    if !coords.latitude.is_finite() || !coords.longitude.is_finite() {
        return Err(WeatherError::InvalidInput(format!(
            "coordinates must be finite, got ({}, {})",
            coords.latitude, coords.longitude
        )));
    }

    Ok(format!("{},{}", coords.latitude, coords.longitude))
}
