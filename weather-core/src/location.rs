//! Device-style location lookup used for the initial, silent load.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LocationFailure, WeatherError},
    model::{Coordinates, LocationQuery},
};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(8);
pub const IP_API_URL: &str = "http://ip-api.com/json/?fields=status,message,lat,lon";

/// Anything that can report where the host currently is.
#[async_trait]
pub trait PositionSource: Send + Sync + Debug {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure>;
}

/// Resolves at most one position fix at a time, bounded by a timeout.
#[derive(Debug)]
pub struct LocationResolver {
    source: Option<Box<dyn PositionSource>>,
    timeout: Duration,
}

impl LocationResolver {
    /// `None` models a host without any location capability.
    pub fn new(source: Option<Box<dyn PositionSource>>) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Taking `&mut self` keeps a single request outstanding per resolver.
    /// Once dispatched the request runs until it answers or the timeout fires.
    pub async fn resolve(&mut self) -> Result<LocationQuery, WeatherError> {
        let source = self
            .source
            .as_deref()
            .ok_or(WeatherError::LocationUnavailable(LocationFailure::Unsupported))?;

        let outcome = tokio::time::timeout(self.timeout, source.current_position())
            .await
            .unwrap_or(Err(LocationFailure::TimedOut));

        match outcome {
            Ok(coords) => {
                tracing::info!(
                    lat = coords.latitude,
                    lon = coords.longitude,
                    "resolved device location"
                );
                Ok(LocationQuery::Coordinates(coords))
            }
            Err(reason) => {
                tracing::info!(%reason, "device location unavailable");
                Err(WeatherError::LocationUnavailable(reason))
            }
        }
    }
}

/// A position that never changes, e.g. configured home coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl PositionSource for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
        Ok(self.0)
    }
}

/// Approximates the host position from its public IP address.
#[derive(Debug, Clone)]
pub struct IpPositionSource {
    http: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl IpPositionSource {
    pub fn new() -> Self {
        Self::with_url(IP_API_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            url: url.into(),
        }
    }
}

impl Default for IpPositionSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PositionSource for IpPositionSource {
    async fn current_position(&self) -> Result<Coordinates, LocationFailure> {
        let res = self.http.get(&self.url).send().await.map_err(|e| {
            tracing::debug!("IP location request failed: {}", e);
            LocationFailure::Unsupported
        })?;

        if !res.status().is_success() {
            tracing::debug!("IP location lookup returned status {}", res.status());
            return Err(LocationFailure::Unsupported);
        }

        let body: IpApiResponse = res.json().await.map_err(|e| {
            tracing::debug!("IP location parse error: {}", e);
            LocationFailure::Unsupported
        })?;

        if body.status != "success" {
            tracing::debug!(message = ?body.message, "IP location lookup refused");
            return Err(LocationFailure::Denied);
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates {
                latitude,
                longitude,
            }),
            _ => Err(LocationFailure::Unsupported),
        }
    }
}
