use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::{error::WeatherError, model::RequestDescriptor};

pub mod visualcrossing;

pub use visualcrossing::VisualCrossingProvider;

/// Transport seam: turns a request descriptor into a decoded JSON tree.
///
/// Implementations make exactly one attempt. Non-success statuses and network
/// failures are `Transport` errors; an undecodable body is `MalformedResponse`.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<Value, WeatherError>;
}
