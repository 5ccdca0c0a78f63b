//! The main dashboard: weather, alerts and one card per plant.

use chrono::{DateTime, Utc};
use leafcare_care::alerts::HEAT_ALERT_THRESHOLD;
use leafcare_care::{
    assess_watering, estimate_sun_exposure, plant_weather_alert, temperature_status, AlertKind,
    CategoryTable, SunInput, WateringInput,
};
use leafcare_services::Plant;
use leafcare_weather::{RainAlert, StormAlert, WeatherReport};
use tracing::instrument;

use crate::context::DashboardContext;
use crate::error::AppError;
use crate::view::{DashboardView, GardenAlert, GardenSummary, PlantCard};

/// Weather inputs shared by every card
#[derive(Debug, Clone, Copy)]
pub struct CardWeather<'a> {
    pub report: &'a WeatherReport,
    pub rain: &'a RainAlert,
    pub storm: &'a StormAlert,
}

/// Build the card for one plant. Pure; `now` is the only clock.
pub fn build_card(
    plant: Plant,
    weather: CardWeather<'_>,
    categories: &CategoryTable,
    now: DateTime<Utc>,
) -> PlantCard {
    let current = &weather.report.current;

    let watering = assess_watering(
        &WateringInput {
            interval_days: plant.watering_interval_days,
            last_watered: plant.last_watered,
            temperature: current.temperature,
            forecast: &weather.report.forecast,
        },
        now,
    );
    let sun = estimate_sun_exposure(
        &SunInput {
            placement: plant.placement,
            sun_preference: plant.sun_preference,
            weather: current,
        },
        now,
    );
    let alert = plant_weather_alert(plant.placement, weather.rain, weather.storm, current.temperature);

    PlantCard {
        category: categories.classify(&plant.name),
        temperature: temperature_status(current.temperature),
        watering,
        sun,
        alert,
        plant,
    }
}

/// Garden alerts are generated once per kind, most severe first.
const ALERT_ORDER: [AlertKind; 3] = [AlertKind::Storm, AlertKind::Rain, AlertKind::Heat];

/// What an alert text talks about: the plant itself, or how many are affected.
fn alert_subject(cards: &[&PlantCard]) -> String {
    match cards {
        [card] => card.plant.name.clone(),
        _ => format!("{} outdoor plants", cards.len()),
    }
}

fn summarize(cards: &[PlantCard]) -> GardenSummary {
    GardenSummary {
        total: cards.len(),
        needs_water: cards.iter().filter(|card| card.watering.needs_water).count(),
        outdoor: cards
            .iter()
            .filter(|card| card.plant.placement.is_outdoor())
            .count(),
        alerts: cards.iter().filter(|card| card.alert.is_some()).count(),
    }
}

/// Resolve the location, fetch the weather and assess every plant.
#[instrument(skip(ctx), level = "info")]
pub async fn build_dashboard(ctx: &DashboardContext, now: DateTime<Utc>) -> Result<DashboardView, AppError> {
    let garden = ctx.garden_weather(now).await?;
    if garden.report.uses_fallback() {
        tracing::warn!("Dashboard for {} uses default weather data", garden.city);
    }

    let weather = CardWeather {
        report: &garden.report,
        rain: &garden.rain,
        storm: &garden.storm,
    };
    let cards: Vec<PlantCard> = ctx
        .plants
        .list()?
        .into_iter()
        .map(|plant| build_card(plant, weather, &ctx.categories, now))
        .collect();

    let mut alerts = Vec::new();
    for kind in ALERT_ORDER {
        let affected: Vec<&PlantCard> = cards
            .iter()
            .filter(|card| card.alert.as_ref().is_some_and(|alert| alert.kind == kind))
            .collect();
        if affected.is_empty() {
            continue;
        }
        let text = ctx
            .chat
            .alert_message(kind, &alert_subject(&affected), &garden.report.current)
            .await;
        alerts.push(GardenAlert {
            kind,
            plant_ids: affected.iter().map(|card| card.plant.id).collect(),
            plants: affected.iter().map(|card| card.plant.name.clone()).collect(),
            text,
        });
    }

    let temperature = garden.report.current.temperature;
    let summary = summarize(&cards);
    tracing::info!(
        "Dashboard: {} plant(s), {} need water, {} alert(s)",
        summary.total,
        summary.needs_water,
        summary.alerts
    );

    Ok(DashboardView {
        generated_at: now,
        temperature: temperature_status(temperature),
        heat: temperature > HEAT_ALERT_THRESHOLD,
        city: garden.city,
        country: garden.country,
        weather: garden.report,
        rain: garden.rain,
        storm: garden.storm,
        alerts,
        plants: cards,
        summary,
    })
}
