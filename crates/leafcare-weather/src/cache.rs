use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::types::WeatherReport;

#[derive(Debug, Clone)]
struct CachedReport {
    report: WeatherReport,
    stored_at: DateTime<Utc>,
}

/// Per-session weather cache keyed by (city, country).
///
/// Entries older than the TTL are treated as missing. A zero TTL disables
/// caching entirely.
#[derive(Debug)]
pub struct WeatherCache {
    ttl: Duration,
    entries: Mutex<HashMap<(String, String), CachedReport>>,
}

fn key(city: &str, country: &str) -> (String, String) {
    (city.trim().to_lowercase(), country.trim().to_lowercase())
}

impl WeatherCache {
    pub fn new(ttl_minutes: u32) -> Self {
        Self {
            ttl: Duration::minutes(i64::from(ttl_minutes)),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl > Duration::zero()
    }

    /// Return the cached report if it is younger than the TTL at `now`.
    pub fn get(&self, city: &str, country: &str, now: DateTime<Utc>) -> Option<WeatherReport> {
        if !self.is_enabled() {
            return None;
        }

        let mut entries = self.entries.lock();
        let k = key(city, country);
        let fresh = entries
            .get(&k)
            .map(|cached| now >= cached.stored_at && now - cached.stored_at < self.ttl);
        match fresh {
            Some(true) => {
                tracing::debug!("Weather cache hit for {}, {}", city, country);
                entries.get(&k).map(|cached| cached.report.clone())
            }
            Some(false) => {
                tracing::debug!("Weather cache expired for {}, {}", city, country);
                entries.remove(&k);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, city: &str, country: &str, report: WeatherReport, now: DateTime<Utc>) {
        if !self.is_enabled() {
            return;
        }
        self.entries.lock().insert(
            key(city, country),
            CachedReport {
                report,
                stored_at: now,
            },
        );
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use crate::defaults::{default_forecast, default_snapshot};
    use chrono::TimeZone;
    use leafcare_core::Source;

    fn report(now: DateTime<Utc>) -> WeatherReport {
        WeatherReport {
            current: default_snapshot("Sialkot", "PK", now),
            current_source: Source::Fallback,
            forecast: default_forecast(now),
            forecast_source: Source::Fallback,
        }
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = WeatherCache::new(15);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        cache.put("Sialkot", "PK", report(now), now);

        assert!(cache.get("sialkot", "pk", now + Duration::minutes(14)).is_some());
    }

    #[test]
    fn test_expired_entry_evicted() {
        let cache = WeatherCache::new(15);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        cache.put("Sialkot", "PK", report(now), now);

        assert!(cache.get("Sialkot", "PK", now + Duration::minutes(15)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = WeatherCache::new(0);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        cache.put("Sialkot", "PK", report(now), now);
        assert_eq!(cache.len(), 0);
        assert!(cache.get("Sialkot", "PK", now).is_none());
    }

    #[test]
    fn test_keys_are_per_city() {
        let cache = WeatherCache::new(15);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        cache.put("Sialkot", "PK", report(now), now);
        assert!(cache.get("Lahore", "PK", now).is_none());
        cache.clear();
        assert!(cache.get("Sialkot", "PK", now).is_none());
    }
}
