//! Baked-in weather used whenever the provider is unavailable.

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveTime, Offset, TimeZone, Utc};

use crate::types::{ForecastEntry, WeatherSnapshot};

/// Number of 3-hour steps in the default forecast (one day).
pub const DEFAULT_FORECAST_STEPS: usize = 8;

/// Default snapshot with sunrise/sunset at 06:00/18:00 in the machine's local time.
pub fn default_snapshot(city: &str, country: &str, now: DateTime<Utc>) -> WeatherSnapshot {
    let offset = Local.offset_from_utc_datetime(&now.naive_utc()).fix();
    default_snapshot_at(city, country, now, offset)
}

/// Default snapshot with sunrise/sunset at 06:00/18:00 on `now`'s date in `offset`.
pub fn default_snapshot_at(
    city: &str,
    country: &str,
    now: DateTime<Utc>,
    offset: FixedOffset,
) -> WeatherSnapshot {
    let local_date = now.with_timezone(&offset).date_naive();
    let at = |hour: u32| -> DateTime<Utc> {
        let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
        let naive = local_date.and_time(time) - Duration::seconds(i64::from(offset.local_minus_utc()));
        Utc.from_utc_datetime(&naive)
    };

    WeatherSnapshot {
        temperature: 32.0,
        feels_like: 35.0,
        humidity: 60,
        cloud_cover: 10,
        wind_speed: 5.0,
        condition: "Clear".to_string(),
        description: "clear sky".to_string(),
        sunrise: at(6),
        sunset: at(18),
        city: city.to_string(),
        country: country.to_string(),
        fetched_at: now,
    }
}

/// Default forecast: four clear steps, then four rainy steps of 2.5mm.
pub fn default_forecast(now: DateTime<Utc>) -> Vec<ForecastEntry> {
    (0..DEFAULT_FORECAST_STEPS)
        .map(|i| {
            let clear = i < 4;
            ForecastEntry {
                time: now + Duration::hours(3 * i as i64),
                temperature: 30.0 + (i % 3) as f64,
                precipitation: if clear { 0.0 } else { 2.5 },
                cloud_cover: if clear { 10 } else { 80 },
                condition: if clear { "Clear" } else { "Rain" }.to_string(),
                description: if clear { "clear sky" } else { "light rain" }.to_string(),
                humidity: 60,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_default_snapshot_values() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let utc = FixedOffset::east_opt(0).unwrap();
        let weather = default_snapshot_at("Sialkot", "PK", now, utc);

        assert_eq!(weather.temperature, 32.0);
        assert_eq!(weather.feels_like, 35.0);
        assert_eq!(weather.cloud_cover, 10);
        assert_eq!(weather.sunrise, Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).unwrap());
        assert_eq!(weather.sunset, Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap());
        assert_eq!(weather.city, "Sialkot");
    }

    #[test]
    fn test_default_snapshot_uses_local_date() {
        // 20:00 UTC on the 1st is 01:00 on the 2nd in UTC+5
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        let pkt = FixedOffset::east_opt(5 * 3600).unwrap();
        let weather = default_snapshot_at("Sialkot", "PK", now, pkt);

        assert_eq!(weather.sunrise, Utc.with_ymd_and_hms(2024, 6, 2, 1, 0, 0).unwrap());
        assert_eq!(weather.sunset, Utc.with_ymd_and_hms(2024, 6, 2, 13, 0, 0).unwrap());
    }

    #[test]
    fn test_default_forecast_shape() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let forecast = default_forecast(now);

        assert_eq!(forecast.len(), 8);
        assert!(forecast[..4].iter().all(|e| e.precipitation == 0.0));
        assert!(forecast[4..].iter().all(|e| e.precipitation == 2.5));
        assert_eq!(forecast[1].time - forecast[0].time, Duration::hours(3));
        assert_eq!(forecast[2].temperature, 32.0);
    }
}
