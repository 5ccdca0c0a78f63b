//! One function per user action.
//!
//! Each handler takes the context explicitly. User mistakes come back as
//! [`Outcome::Rejected`] and leave every store untouched; only real failures
//! (unreadable data files and the like) are returned as `Err`.

use chrono::{DateTime, Utc};
use leafcare_ai::classify_health;
use leafcare_care::care_tips as tips_for;
use leafcare_services::{NewPlant, Plant, ProfileInput};
use leafcare_weather::WeatherSnapshot;
use tracing::instrument;

use crate::context::DashboardContext;
use crate::dashboard::{build_card, CardWeather};
use crate::error::AppError;
use crate::outcome::Outcome;
use crate::view::{
    ChatHistoryView, ChatReply, HealthView, IdentificationView, LocationView, NurseryView, PlantDetail,
    PlantListView, ProfileView, RemovedPlant, SpeciesView, TipsView,
};

pub type HandlerResult<T> = Result<Outcome<T>, AppError>;

/// Bytes above which an uploaded image is refused.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub fn list_plants(ctx: &DashboardContext) -> Result<PlantListView, AppError> {
    Ok(PlantListView {
        plants: ctx.plants.list()?,
    })
}

pub fn add_plant(ctx: &DashboardContext, plant: NewPlant) -> HandlerResult<Plant> {
    Outcome::from_store(ctx.plants.add(plant))
}

pub fn water_plant(ctx: &DashboardContext, id: u64, now: DateTime<Utc>) -> HandlerResult<Plant> {
    Outcome::from_store(ctx.plants.mark_watered(id, now))
}

pub fn remove_plant(ctx: &DashboardContext, id: u64) -> HandlerResult<RemovedPlant> {
    let Some(plant) = ctx.plants.get(id)? else {
        return Ok(Outcome::rejected(format!("No plant with id {}.", id)));
    };
    Ok(Outcome::from_store(ctx.plants.delete(id))?.map(|()| RemovedPlant {
        id,
        name: plant.name,
    }))
}

/// Card and care tips for a single plant.
pub async fn show_plant(ctx: &DashboardContext, id: u64, now: DateTime<Utc>) -> HandlerResult<PlantDetail> {
    let Some(plant) = ctx.plants.get(id)? else {
        return Ok(Outcome::rejected(format!("No plant with id {}.", id)));
    };

    let garden = ctx.garden_weather(now).await?;
    let weather = CardWeather {
        report: &garden.report,
        rain: &garden.rain,
        storm: &garden.storm,
    };
    let tips = tips_for(&plant.name);
    let card = build_card(plant, weather, &ctx.categories, now);
    Ok(Outcome::Done(PlantDetail { card, tips }))
}

/// Names of all plants, as stored with each chat exchange.
pub fn plants_context(plants: &[Plant]) -> Option<String> {
    if plants.is_empty() {
        return None;
    }
    let names: Vec<&str> = plants.iter().map(|p| p.name.as_str()).collect();
    Some(format!("User's plants: {}", names.join(", ")))
}

/// Context handed to the botanist: weather, the garden and the plant asked about.
pub fn chat_context(weather: &WeatherSnapshot, plants: &[Plant], selected: Option<&Plant>) -> String {
    let mut context = format!(
        "Current weather in {}, {}: {}°C, {}",
        weather.city, weather.country, weather.temperature, weather.description
    );
    if let Some(garden) = plants_context(plants) {
        context.push_str(". ");
        context.push_str(&garden);
    }
    if let Some(plant) = selected {
        let last_watered = plant
            .last_watered
            .map_or_else(|| "Not recorded".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        context.push_str(&format!(
            "\n\nIMPORTANT: The user is specifically asking about their '{}' plant. \
             Focus your answer on this plant.\n\n\
             Plant Details:\n- Name: {}\n- Placement: {}\n- Sun Preference: {}\n\
             - Watering Interval: Every {} days\n- Last Watered: {}",
            plant.name,
            plant.name,
            plant.placement,
            plant.sun_preference,
            plant.watering_interval_days,
            last_watered
        ));
    }
    context
}

/// Ask the botanist and record the exchange.
#[instrument(skip(ctx, message), level = "info")]
pub async fn chat(
    ctx: &DashboardContext,
    message: &str,
    plant_id: Option<u64>,
    now: DateTime<Utc>,
) -> HandlerResult<ChatReply> {
    let message = message.trim();
    if message.is_empty() {
        return Ok(Outcome::rejected("Please type a question first."));
    }

    let plants = ctx.plants.list()?;
    let selected = match plant_id {
        Some(id) => match plants.iter().find(|p| p.id == id) {
            Some(plant) => Some(plant),
            None => return Ok(Outcome::rejected(format!("No plant with id {}.", id))),
        },
        None => None,
    };

    let garden = ctx.garden_weather(now).await?;
    let context = chat_context(&garden.report.current, &plants, selected);
    let reply = ctx.chat.ask(message, Some(&context)).await;

    let stored = ctx
        .chat_log
        .append(message, &reply, plants_context(&plants).as_deref(), now)?;
    Ok(Outcome::Done(ChatReply {
        message: stored,
        plant: selected.map(|p| p.name.clone()),
    }))
}

pub fn chat_history(ctx: &DashboardContext, limit: usize) -> Result<ChatHistoryView, AppError> {
    Ok(ChatHistoryView {
        messages: ctx.chat_log.recent(limit)?,
    })
}

pub(crate) fn image_too_large(bytes: u64) -> String {
    format!(
        "The image is too large ({} MB). Please use one under {} MB.",
        bytes / (1024 * 1024),
        MAX_IMAGE_BYTES / (1024 * 1024)
    )
}

fn check_image(image: &[u8]) -> Option<String> {
    if image.is_empty() {
        Some("Please choose an image first.".to_string())
    } else if image.len() > MAX_IMAGE_BYTES {
        Some(image_too_large(image.len() as u64))
    } else {
        None
    }
}

pub async fn identify(ctx: &DashboardContext, image: &[u8]) -> HandlerResult<IdentificationView> {
    if let Some(reason) = check_image(image) {
        return Ok(Outcome::Rejected(reason));
    }
    let identification = ctx.vision.identify(image).await;
    Ok(Outcome::Done(IdentificationView { identification }))
}

pub async fn assess_health(
    ctx: &DashboardContext,
    image: &[u8],
    question: Option<&str>,
) -> HandlerResult<HealthView> {
    if let Some(reason) = check_image(image) {
        return Ok(Outcome::Rejected(reason));
    }
    let view = match ctx.vision.assess_health(image, question).await {
        Ok(assessment) => HealthView {
            assessment,
            notice: None,
        },
        Err(e) => {
            tracing::warn!("Health assessment failed: {}", e);
            HealthView {
                assessment: classify_health("").with_question(question),
                notice: Some(e.user_message()),
            }
        }
    };
    Ok(Outcome::Done(view))
}

pub fn save_profile(ctx: &DashboardContext, input: ProfileInput, now: DateTime<Utc>) -> HandlerResult<ProfileView> {
    Ok(Outcome::from_store(ctx.profile.save(input, now))?.map(|profile| ProfileView {
        profile: Some(profile),
    }))
}

pub fn show_profile(ctx: &DashboardContext) -> Result<ProfileView, AppError> {
    Ok(ProfileView {
        profile: ctx.profile.load()?,
    })
}

pub async fn detect_location(ctx: &DashboardContext) -> LocationView {
    let resolved = ctx.location.detect().await;
    LocationView {
        location: resolved.value,
        source: resolved.source,
    }
}

/// Nurseries around the detected location.
pub async fn nearby_nurseries(ctx: &DashboardContext, radius_km: Option<f64>) -> HandlerResult<NurseryView> {
    if let Some(radius) = radius_km {
        if !radius.is_finite() || radius <= 0.0 {
            return Ok(Outcome::rejected("The search radius must be a positive number of kilometres."));
        }
    }

    let location = ctx.location.detect().await.value;
    let radius_km = radius_km.unwrap_or_else(|| ctx.nurseries.default_radius_km());
    let found = ctx
        .nurseries
        .nearby(location.coordinates(), Some(radius_km), &location.city)
        .await;

    Ok(Outcome::Done(NurseryView {
        city: location.city,
        radius_km,
        source: found.source,
        nurseries: found.value,
    }))
}

pub async fn search_species(ctx: &DashboardContext, query: &str) -> HandlerResult<SpeciesView> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Outcome::rejected("Please enter a plant name to search for."));
    }
    let found = ctx.species.search(query).await;
    Ok(Outcome::Done(SpeciesView {
        query: query.to_string(),
        source: found.source,
        results: found.value,
    }))
}

pub fn care_tips(name: &str) -> Outcome<TipsView> {
    let name = name.trim();
    if name.is_empty() {
        return Outcome::rejected("Please enter a plant name.");
    }
    Outcome::Done(TipsView {
        name: name.to_string(),
        tips: tips_for(name),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::{Duration, FixedOffset, TimeZone};
    use leafcare_services::{Placement, SunPreference};
    use leafcare_weather::default_snapshot_at;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap()
    }

    fn plant(id: u64, name: &str) -> Plant {
        Plant {
            id,
            name: name.to_string(),
            scientific_name: None,
            description: String::new(),
            care_level: "Moderate".to_string(),
            location: "Garden".to_string(),
            placement: Placement::Balcony,
            sun_preference: SunPreference::FullSun,
            watering_interval_days: 4,
            last_watered: Some(now() - Duration::days(1)),
            image_path: None,
            added_at: now(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_chat_context() {
        let weather = default_snapshot_at("Lahore", "PK", now(), FixedOffset::east_opt(0).unwrap());
        let plants = vec![plant(1, "Rose"), plant(2, "Mint")];

        let general = chat_context(&weather, &plants, None);
        assert_eq!(
            general,
            "Current weather in Lahore, PK: 32°C, clear sky. User's plants: Rose, Mint"
        );

        let focused = chat_context(&weather, &plants, Some(&plants[1]));
        assert!(focused.contains("asking about their 'Mint' plant"));
        assert!(focused.contains("- Placement: Balcony"));
        assert!(focused.contains("- Sun Preference: Full Sun"));
        assert!(focused.contains("Every 4 days"));
        assert!(focused.contains("- Last Watered: 2024-06-09 09:00"));
    }

    #[test]
    fn test_plants_context_empty_garden() {
        assert_eq!(plants_context(&[]), None);
    }

    #[test]
    fn test_image_checks() {
        assert!(check_image(b"").is_some());
        assert!(check_image(b"jpeg").is_none());
        assert!(check_image(&vec![0u8; MAX_IMAGE_BYTES + 1]).unwrap().contains("too large"));
    }

    #[test]
    fn test_care_tips() {
        assert!(care_tips("  ").is_rejected());
        let tips = care_tips("Rose").done().unwrap();
        assert_eq!(tips.name, "Rose");
    }
}
