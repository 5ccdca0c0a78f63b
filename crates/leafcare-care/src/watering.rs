//! Watering recommendation.
//!
//! Pure function of the plant's interval, its last watering, the current
//! temperature and the forecast. Rain in the forecast window always
//! suppresses the need to water.

use chrono::{DateTime, Utc};
use leafcare_weather::ForecastEntry;
use serde::Serialize;

/// Above this temperature (°C) plants are watered a day sooner.
pub const HOT_THRESHOLD: f64 = 35.0;

/// Below this temperature (°C) plants are watered a day later.
pub const COLD_THRESHOLD: f64 = 15.0;

/// Forecast steps scanned for recent rain (~24h).
pub const RECENT_RAIN_STEPS: usize = 8;

/// Forecast steps scanned for upcoming rain (~12h).
pub const RAIN_EXPECTED_STEPS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Urgency::Low => write!(f, "low"),
            Urgency::Medium => write!(f, "medium"),
            Urgency::High => write!(f, "high"),
        }
    }
}

/// Why the recommendation came out the way it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WateringReason {
    /// Never watered
    NewPlant,
    RecentRain,
    RainExpected,
    /// At least a day past the adjusted interval
    Overdue,
    /// Exactly at the adjusted interval
    Due,
    NotYet,
}

#[derive(Debug, Clone, Copy)]
pub struct WateringInput<'a> {
    pub interval_days: u32,
    pub last_watered: Option<DateTime<Utc>>,
    /// Current temperature, °C
    pub temperature: f64,
    /// Ordered by time, 3-hour steps
    pub forecast: &'a [ForecastEntry],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WateringStatus {
    pub needs_water: bool,
    pub urgency: Urgency,
    pub days_since_watered: i64,
    pub adjusted_interval: u32,
    /// Days until the next watering, when not yet due
    pub days_remaining: Option<i64>,
    pub recent_rain: bool,
    pub rain_expected: bool,
    pub reason: WateringReason,
    pub message: String,
}

impl WateringStatus {
    /// Short badge for plant cards
    pub fn label(&self) -> &'static str {
        match (self.needs_water, self.urgency) {
            (true, Urgency::High) => "Needs Water Today",
            (true, _) => "Water Soon",
            (false, _) => "Well Watered",
        }
    }
}

/// Interval after temperature adjustment; never below one day.
pub fn adjusted_interval(base_days: u32, temperature: f64) -> u32 {
    let base = base_days.max(1);
    if temperature > HOT_THRESHOLD {
        base.saturating_sub(1).max(1)
    } else if temperature < COLD_THRESHOLD {
        base.saturating_add(1)
    } else {
        base
    }
}

/// Whole days between `last_watered` and `now`; a future time counts as 0.
pub fn days_elapsed(last_watered: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last_watered).num_days().max(0)
}

fn any_rain(forecast: &[ForecastEntry], steps: usize) -> bool {
    forecast.iter().take(steps).any(|entry| entry.precipitation > 0.0)
}

fn message(reason: WateringReason, days: i64, interval: u32, remaining: Option<i64>) -> String {
    match reason {
        WateringReason::NewPlant => "New plant! Water it now to get started.".to_string(),
        WateringReason::RecentRain => "Recent rain detected. No need to water yet.".to_string(),
        WateringReason::RainExpected => "Rain expected soon. Hold off on watering.".to_string(),
        WateringReason::Overdue => format!(
            "Needs water! It's been {} days (recommended: every {} days).",
            days, interval
        ),
        WateringReason::Due => format!("Time to water! It's been {} days.", days),
        WateringReason::NotYet => format!(
            "Happy! Next watering in {} day(s).",
            remaining.unwrap_or_default()
        ),
    }
}

/// Decide whether the plant needs water at `now`.
pub fn assess_watering(input: &WateringInput<'_>, now: DateTime<Utc>) -> WateringStatus {
    let interval = adjusted_interval(input.interval_days, input.temperature);
    let recent_rain = any_rain(input.forecast, RECENT_RAIN_STEPS);
    let rain_expected = any_rain(input.forecast, RAIN_EXPECTED_STEPS);

    let Some(last_watered) = input.last_watered else {
        return WateringStatus {
            needs_water: true,
            urgency: Urgency::High,
            days_since_watered: 0,
            adjusted_interval: interval,
            days_remaining: None,
            recent_rain,
            rain_expected,
            reason: WateringReason::NewPlant,
            message: message(WateringReason::NewPlant, 0, interval, None),
        };
    };

    let days = days_elapsed(last_watered, now);
    let due_at = i64::from(interval);

    let (needs_water, urgency, reason, days_remaining) = if recent_rain {
        (false, Urgency::Low, WateringReason::RecentRain, None)
    } else if rain_expected {
        (false, Urgency::Low, WateringReason::RainExpected, None)
    } else if days >= due_at + 1 {
        (true, Urgency::High, WateringReason::Overdue, None)
    } else if days >= due_at {
        (true, Urgency::Medium, WateringReason::Due, None)
    } else {
        (false, Urgency::Low, WateringReason::NotYet, Some(due_at - days))
    };

    tracing::trace!(days, interval, ?reason, "Assessed watering");

    WateringStatus {
        needs_water,
        urgency,
        days_since_watered: days,
        adjusted_interval: interval,
        days_remaining,
        recent_rain,
        rain_expected,
        reason,
        message: message(reason, days, interval, days_remaining),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn step(hours: i64, precipitation: f64) -> ForecastEntry {
        ForecastEntry {
            time: now() + Duration::hours(hours),
            temperature: 25.0,
            precipitation,
            cloud_cover: 20,
            condition: "Clear".into(),
            description: "clear sky".into(),
            humidity: 50,
        }
    }

    fn dry_forecast() -> Vec<ForecastEntry> {
        (0..8).map(|i| step(i * 3, 0.0)).collect()
    }

    fn assess(interval: u32, days_ago: Option<i64>, temp: f64, forecast: &[ForecastEntry]) -> WateringStatus {
        let input = WateringInput {
            interval_days: interval,
            last_watered: days_ago.map(|d| now() - Duration::days(d)),
            temperature: temp,
            forecast,
        };
        assess_watering(&input, now())
    }

    #[test]
    fn test_new_plant_needs_water_now() {
        let status = assess(3, None, 25.0, &dry_forecast());
        assert!(status.needs_water);
        assert_eq!(status.urgency, Urgency::High);
        assert_eq!(status.reason, WateringReason::NewPlant);
        assert_eq!(status.label(), "Needs Water Today");
    }

    #[test]
    fn test_overdue_is_high() {
        let status = assess(3, Some(4), 25.0, &dry_forecast());
        assert!(status.needs_water);
        assert_eq!(status.urgency, Urgency::High);
    }

    #[test]
    fn test_due_today_is_medium() {
        let status = assess(3, Some(3), 25.0, &dry_forecast());
        assert!(status.needs_water);
        assert_eq!(status.urgency, Urgency::Medium);
        assert_eq!(status.message, "Time to water! It's been 3 days.");
    }

    #[test]
    fn test_heat_shortens_interval() {
        let status = assess(3, Some(5), 36.0, &dry_forecast());
        assert_eq!(status.adjusted_interval, 2);
        assert!(status.needs_water);
        assert_eq!(status.urgency, Urgency::High);
        assert_eq!(
            status.message,
            "Needs water! It's been 5 days (recommended: every 2 days)."
        );
    }

    #[test]
    fn test_not_yet_reports_days_remaining() {
        let status = assess(3, Some(1), 25.0, &dry_forecast());
        assert!(!status.needs_water);
        assert_eq!(status.urgency, Urgency::Low);
        assert_eq!(status.days_remaining, Some(2));
        assert_eq!(status.message, "Happy! Next watering in 2 day(s).");
        assert_eq!(status.label(), "Well Watered");
    }

    #[test]
    fn test_rain_in_first_day_suppresses_watering() {
        let mut forecast = dry_forecast();
        forecast[6].precipitation = 0.4;
        let status = assess(3, Some(10), 25.0, &forecast);
        assert!(!status.needs_water);
        assert!(status.recent_rain);
        assert!(!status.rain_expected);
        assert_eq!(status.reason, WateringReason::RecentRain);
    }

    #[test]
    fn test_rain_beyond_window_ignored() {
        let mut forecast = dry_forecast();
        forecast.push(step(24, 5.0));
        let status = assess(3, Some(10), 25.0, &forecast);
        assert!(status.needs_water);
    }

    #[test]
    fn test_cold_lengthens_interval() {
        assert_eq!(adjusted_interval(3, 10.0), 4);
        assert_eq!(adjusted_interval(1, 40.0), 1);
        assert_eq!(adjusted_interval(0, 25.0), 1);
    }

    #[test]
    fn test_future_last_watered_counts_as_zero_days() {
        let input = WateringInput {
            interval_days: 3,
            last_watered: Some(now() + Duration::days(2)),
            temperature: 25.0,
            forecast: &[],
        };
        let status = assess_watering(&input, now());
        assert_eq!(status.days_since_watered, 0);
        assert_eq!(status.days_remaining, Some(3));
    }

    #[test]
    fn test_partial_days_are_floored() {
        let input = WateringInput {
            interval_days: 3,
            last_watered: Some(now() - Duration::hours(71)),
            temperature: 25.0,
            forecast: &[],
        };
        assert_eq!(assess_watering(&input, now()).days_since_watered, 2);
    }
}
