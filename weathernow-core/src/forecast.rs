//! Shaping of the raw hourly series into the 24-point chart series.

use chrono::{NaiveDateTime, Timelike};

use crate::model::{ForecastPoint, ForecastSeries, HourlySeries};

/// Number of hourly points shown in the forecast chart.
pub const FORECAST_HOURS: usize = 24;

/// Pairs the first 24 entries of the three parallel arrays positionally.
///
/// Stops early when any array is shorter.
pub fn to_forecast_series(
    times: &[NaiveDateTime],
    temperatures_c: &[f64],
    rain_probability_pct: &[Option<f64>],
) -> ForecastSeries {
    times
        .iter()
        .zip(temperatures_c)
        .zip(rain_probability_pct)
        .take(FORECAST_HOURS)
        .map(|((time, &temperature_c), &rain)| ForecastPoint {
            hour_label: hour_label(time),
            temperature_c,
            rain_probability_pct: rain,
        })
        .collect()
}

impl HourlySeries {
    pub fn to_forecast_series(&self) -> ForecastSeries {
        to_forecast_series(&self.times, &self.temperatures_c, &self.rain_probability_pct)
    }
}

fn hour_label(time: &NaiveDateTime) -> String {
    format!("{}:00", time.hour())
}
