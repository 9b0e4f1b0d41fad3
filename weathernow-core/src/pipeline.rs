//! Search pipeline: geocode, fetch, transform, remember, publish.
//!
//! The pipeline owns the [`SearchState`] and the in-memory [`RecentSearches`].
//! Both are published through `tokio::sync::watch` channels so a presentation
//! layer can render the latest value at any time.

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use tokio::sync::watch;

use crate::{
    config::Config,
    error::SearchError,
    model::{CurrentConditions, ForecastSeries, PlaceQuery, SearchState},
    provider::{Geocoder, OpenMeteoClient, WeatherProvider},
    recent::{JsonFileStore, RecentSearchStore, RecentSearches},
};

pub struct SearchPipeline {
    geocoder: Box<dyn Geocoder>,
    provider: Box<dyn WeatherProvider>,
    store: Box<dyn RecentSearchStore>,
    state: watch::Sender<SearchState>,
    recent: watch::Sender<RecentSearches>,
    // Sequence number of the most recently submitted search.
    latest: AtomicU64,
}

impl SearchPipeline {
    /// Loads recent searches from `store` once; the pipeline starts `Idle`.
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        provider: Box<dyn WeatherProvider>,
        store: Box<dyn RecentSearchStore>,
    ) -> Self {
        let recent = store.load();
        tracing::debug!(count = recent.len(), "loaded recent searches");

        Self {
            geocoder,
            provider,
            store,
            state: watch::Sender::new(SearchState::Idle),
            recent: watch::Sender::new(recent),
            latest: AtomicU64::new(0),
        }
    }

    /// Wires Open-Meteo and the JSON history file as described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = OpenMeteoClient::from_config(config)?;
        let store = JsonFileStore::new(config.history_file_path()?);
        tracing::debug!(path = %store.path().display(), "using recent searches file");

        Ok(Self::new(Box::new(client.clone()), Box::new(client), Box::new(store)))
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn recent(&self) -> RecentSearches {
        self.recent.borrow().clone()
    }

    /// Restores the last view: searches the most recent entry, if any.
    ///
    /// Returns `None` and stays `Idle` when there is no history.
    pub async fn start(&self) -> Option<SearchState> {
        let latest = self.recent.borrow().latest().and_then(PlaceQuery::new)?;
        tracing::info!(query = %latest, "restoring last search");
        Some(self.search(&latest).await)
    }

    /// Runs one search and returns its outcome.
    ///
    /// The outcome is published and, on success, remembered only if no newer
    /// search was submitted in the meantime.
    pub async fn search(&self, query: &PlaceQuery) -> SearchState {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_replace(SearchState::Loading);

        let outcome = self.lookup(query).await;

        let state = match outcome {
            Ok((current, forecast)) => SearchState::Success { current, forecast },
            Err(err) => {
                tracing::error!(query = %query, error = ?err, "search failed");
                SearchState::Error(err.user_message())
            }
        };

        if self.latest.load(Ordering::SeqCst) != ticket {
            tracing::debug!(query = %query, "discarding superseded search result");
            return state;
        }

        if matches!(state, SearchState::Success { .. }) {
            self.remember(query.as_str());
        }
        self.state.send_replace(state.clone());

        state
    }

    async fn lookup(
        &self,
        query: &PlaceQuery,
    ) -> Result<(CurrentConditions, ForecastSeries), SearchError> {
        let place = self.geocoder.resolve(query).await?.ok_or(SearchError::NotFound)?;
        tracing::debug!(
            name = %place.name,
            country = %place.country,
            latitude = place.latitude,
            longitude = place.longitude,
            "resolved place"
        );

        let payload = self.provider.fetch_weather(place.latitude, place.longitude).await?;

        let current = CurrentConditions::new(&place, &payload.current);
        let forecast = payload.hourly.to_forecast_series();
        Ok((current, forecast))
    }

    fn remember(&self, name: &str) {
        self.recent.send_if_modified(|recent| match self.store.record(name, recent) {
            Ok(updated) => {
                let changed = *recent != updated;
                *recent = updated;
                changed
            }
            Err(err) => {
                tracing::warn!(
                    name,
                    error = %format!("{err:#}"),
                    "failed to persist recent search"
                );
                false
            }
        });
    }
}
