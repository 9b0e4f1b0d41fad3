//! Plain-text rendering of pipeline state.

use std::fmt::Write;

use weathernow_core::{CurrentConditions, ForecastPoint, RecentSearches, SearchState};

const BAR_WIDTH: usize = 30;

pub fn state(state: &SearchState) -> String {
    match state {
        SearchState::Idle => "Search for a city to see its weather.\n".to_string(),
        SearchState::Loading => "Loading...\n".to_string(),
        SearchState::Error(message) => format!("Error: {message}\n"),
        SearchState::Success { current, forecast } => {
            let mut out = conditions(current);
            if !forecast.is_empty() {
                out.push('\n');
                out.push_str(&chart(forecast));
            }
            out
        }
    }
}

pub fn conditions(current: &CurrentConditions) -> String {
    format!(
        "{}\n{}°C\nWind: {} km/h\nCondition code: {} ({})\n",
        current.display_name(),
        current.temperature_c,
        current.wind_kph,
        current.condition_code,
        current.condition().description(),
    )
}

/// One bar per hour, scaled between the coldest and warmest point.
pub fn chart(points: &[ForecastPoint]) -> String {
    let min = points.iter().map(|p| p.temperature_c).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.temperature_c).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    let mut out = String::from("Next 24 Hours\n");
    for point in points {
        let width = if span > 0.0 {
            1 + ((point.temperature_c - min) / span * (BAR_WIDTH - 1) as f64).round() as usize
        } else {
            BAR_WIDTH / 2
        };
        let rain = point
            .rain_probability_pct
            .map(|pct| format!("  rain {pct}%"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>5} {:<bar$} {}°C{}",
            point.hour_label,
            "#".repeat(width),
            point.temperature_c,
            rain,
            bar = BAR_WIDTH,
        );
    }
    out
}

pub fn recent(recent: &RecentSearches) -> String {
    if recent.is_empty() {
        return "No recent searches.\n".to_string();
    }
    recent.iter().enumerate().map(|(i, name)| format!("{}. {name}\n", i + 1)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paris() -> CurrentConditions {
        CurrentConditions {
            name: "Paris".into(),
            country: "France".into(),
            temperature_c: 18.2,
            wind_kph: 10.0,
            condition_code: 3,
        }
    }

    fn point(hour: u32, temperature_c: f64, rain: Option<f64>) -> ForecastPoint {
        ForecastPoint {
            hour_label: format!("{hour}:00"),
            temperature_c,
            rain_probability_pct: rain,
        }
    }

    #[test]
    fn conditions_panel() {
        let text = conditions(&paris());
        assert_eq!(text, "Paris, France\n18.2°C\nWind: 10 km/h\nCondition code: 3 (Cloudy)\n");
    }

    #[test]
    fn chart_scales_bars_between_extremes() {
        let text = chart(&[
            point(0, 10.0, Some(5.0)),
            point(1, 20.0, None),
            point(2, 15.0, Some(50.0)),
        ]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Next 24 Hours");
        assert_eq!(lines[1].matches('#').count(), 1);
        assert_eq!(lines[2].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[3].matches('#').count(), 16);
        assert!(lines[1].ends_with("10°C  rain 5%"));
        assert!(lines[2].ends_with("20°C"));
    }

    #[test]
    fn flat_chart_uses_half_width() {
        let text = chart(&[point(4, 7.0, None), point(5, 7.0, None)]);
        assert!(text.lines().skip(1).all(|l| l.matches('#').count() == BAR_WIDTH / 2));
    }

    #[test]
    fn success_state_includes_panel_and_chart() {
        let text = state(&SearchState::Success {
            current: paris(),
            forecast: vec![point(0, 1.0, None)],
        });
        assert!(text.starts_with("Paris, France\n18.2°C"));
        assert!(text.contains("Next 24 Hours"));
    }

    #[test]
    fn error_state_shows_banner() {
        assert_eq!(state(&SearchState::Error("City not found".into())), "Error: City not found\n");
    }

    #[test]
    fn recent_list_is_numbered_newest_first() {
        let list = RecentSearches::from_entries(["Paris", "Tokyo"]);
        assert_eq!(recent(&list), "1. Paris\n2. Tokyo\n");
        assert_eq!(recent(&RecentSearches::default()), "No recent searches.\n");
    }
}
