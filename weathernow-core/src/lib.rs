//! Core library for the `weathernow` app.
//!
//! This crate defines:
//! - Geocoding and forecast clients for the Open-Meteo APIs
//! - The pure transform from hourly data to the 24-hour chart series
//! - A bounded, persisted list of recent searches
//! - The search pipeline that sequences all of the above into a `SearchState`
//! - Configuration handling
//!
//! It is used by `weathernow-cli`, but can also be driven by other front ends.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod recent;

pub use config::Config;
pub use error::{FetchError, SearchError};
pub use forecast::{FORECAST_HOURS, to_forecast_series};
pub use model::{
    CurrentConditions, CurrentWeather, ForecastPoint, ForecastSeries, GeoResult, HourlySeries,
    PlaceQuery, SearchState, WeatherCondition, WeatherPayload,
};
pub use pipeline::SearchPipeline;
pub use provider::{Geocoder, OpenMeteoClient, WeatherProvider};
pub use recent::{
    JsonFileStore, MAX_RECENT_SEARCHES, MemoryStore, RecentSearchStore, RecentSearches,
};
