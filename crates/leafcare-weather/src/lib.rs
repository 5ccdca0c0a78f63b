//! Weather lookup for LeafCare
//!
//! Current conditions and 3-hour forecasts from OpenWeatherMap, with baked-in
//! defaults whenever the provider is unavailable, rain/storm alerts, a
//! per-session cache and IP geolocation.

pub mod alerts;
pub mod cache;
pub mod defaults;
pub mod location;
pub mod provider;
pub mod service;
pub mod types;

pub use alerts::{rain_alert, storm_alert, RainAlert, RainEvent, RainIntensity, StormAlert, StormEvent, DEFAULT_ALERT_HOURS};
pub use cache::WeatherCache;
pub use defaults::{default_forecast, default_snapshot, default_snapshot_at};
pub use location::LocationService;
pub use provider::OpenWeatherProvider;
pub use service::WeatherService;
pub use types::*;
