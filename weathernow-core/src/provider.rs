use crate::{
    error::FetchError,
    model::{GeoResult, PlaceQuery, WeatherPayload},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openmeteo;

pub use openmeteo::OpenMeteoClient;

/// Resolves free-text place names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Returns the best match, or `None` when the service knows no such place.
    async fn resolve(&self, query: &PlaceQuery) -> Result<Option<GeoResult>, FetchError>;
}

/// Fetches current conditions and the hourly forecast for a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherPayload, FetchError>;
}
