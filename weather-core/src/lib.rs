//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Request building and the HTTP transport for the timeline API
//! - Normalization of the nested day/hour response into sorted samples
//! - The 24-hour windows before and after the current observation
//! - Unit-aware formatting and condition icons
//! - Device location lookup and the view-state machine
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod format;
pub mod icon;
pub mod location;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod query;
pub mod service;
pub mod state;
pub mod window;

pub use config::{Config, ProviderSettings};
pub use error::{ErrorKind, LocationFailure, WeatherError};
pub use format::UnitFormatter;
pub use location::{LocationResolver, PositionSource};
pub use model::{
    Coordinates, LocationQuery, NormalizedResponse, RequestDescriptor, Sample, UnitSystem,
};
pub use provider::{VisualCrossingProvider, WeatherProvider};
pub use query::QueryBuilder;
pub use service::WeatherService;
pub use state::{Session, ViewState};
pub use window::{Window, Windows};
