//! Plain-text rendering of the view models.

use std::fmt::{self, Display, Formatter};

use leafcare_ai::{HealthStatus, Identification};
use leafcare_care::{CareTips, Urgency, WateringStatus};
use leafcare_core::Source;

use crate::view::{
    ChatHistoryView, ChatReply, DashboardView, HealthView, IdentificationView, LocationView, NurseryView,
    PlantCard, PlantDetail, PlantListView, ProfileView, RemovedPlant, SpeciesView, TipsView,
};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

fn source_note(source: &Source) -> &'static str {
    match source {
        Source::Fallback => " (default data)",
        Source::Provider(_) => "",
    }
}

fn urgency_marker(status: &WateringStatus) -> &'static str {
    match (status.needs_water, status.urgency) {
        (false, _) => "ok",
        (true, Urgency::High) => "!!",
        (true, _) => "! ",
    }
}

impl Display for PlantCard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let plant = &self.plant;
        writeln!(
            f,
            "[{}] #{} {} ({}) - {}, {}",
            urgency_marker(&self.watering),
            plant.id,
            plant.name,
            self.category,
            plant.placement,
            plant.location
        )?;
        writeln!(
            f,
            "     Water: {} - {} (every {} day(s) adjusted from {})",
            self.watering.label(),
            self.watering.message,
            self.watering.adjusted_interval,
            plant.watering_interval_days
        )?;
        writeln!(
            f,
            "     Sun:   {:.1}h ({}%) {} intensity, {} - {}",
            self.sun.sun_hours,
            self.sun.percentage(),
            self.sun.intensity.label(),
            self.sun.category.label(),
            self.sun.recommendation
        )?;
        if let Some(alert) = &self.alert {
            writeln!(f, "     {}", alert.message)?;
        }
        Ok(())
    }
}

impl Display for DashboardView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let current = &self.weather.current;
        writeln!(f, "LeafCare - {}, {}", self.city, self.country)?;
        writeln!(
            f,
            "Weather: {:.1}°C (feels {:.1}°C), {}, humidity {}%, clouds {}%{}",
            current.temperature,
            current.feels_like,
            current.description,
            current.humidity,
            current.cloud_cover,
            source_note(&self.weather.current_source)
        )?;
        writeln!(
            f,
            "Sunrise {} / sunset {} UTC | Temperature: {}",
            current.sunrise.format("%H:%M"),
            current.sunset.format("%H:%M"),
            self.temperature
        )?;

        if let Some(storm) = self.storm.next() {
            writeln!(
                f,
                "Storm warning: {} in {:.1}h",
                storm.description, storm.hours_from_now
            )?;
        }
        if let Some(rain) = self.rain.next() {
            writeln!(
                f,
                "Rain expected: {} ({}) in {:.1}h",
                rain.description, rain.intensity, rain.hours_from_now
            )?;
        }
        if self.heat {
            writeln!(f, "Heat warning: outdoor plants may need extra water or shade")?;
        }
        if self.weather.forecast_source == Source::Fallback {
            writeln!(f, "Forecast unavailable; showing default forecast")?;
        }

        writeln!(f)?;
        if self.plants.is_empty() {
            writeln!(f, "No plants yet. Add one with `leafcare add <name>`.")?;
        } else {
            writeln!(
                f,
                "{} plant(s), {} outdoor, {} need water",
                self.summary.total, self.summary.outdoor, self.summary.needs_water
            )?;
            for card in &self.plants {
                write!(f, "{}", card)?;
            }
        }

        if !self.alerts.is_empty() {
            writeln!(f)?;
            writeln!(f, "Alerts:")?;
            for alert in &self.alerts {
                writeln!(f, "  - {}", alert.text)?;
            }
        }
        Ok(())
    }
}

impl Display for PlantListView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.plants.is_empty() {
            return writeln!(f, "No plants yet.");
        }
        for plant in &self.plants {
            let watered = plant
                .last_watered
                .map_or_else(|| "never".to_string(), |at| at.format(TIME_FORMAT).to_string());
            writeln!(
                f,
                "#{:<3} {:<20} {:<14} every {}d, last watered {}",
                plant.id, plant.name, plant.placement.label(), plant.watering_interval_days, watered
            )?;
        }
        Ok(())
    }
}

impl Display for PlantDetail {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let plant = &self.card.plant;
        write!(f, "{}", self.card)?;
        if let Some(scientific) = &plant.scientific_name {
            writeln!(f, "     Scientific name: {}", scientific)?;
        }
        if !plant.description.is_empty() {
            writeln!(f, "     {}", plant.description)?;
        }
        writeln!(
            f,
            "     Care level: {} | Prefers: {} | Temperature: {}",
            plant.care_level, plant.sun_preference, self.card.temperature
        )?;
        if !plant.notes.is_empty() {
            writeln!(f, "     Notes: {}", plant.notes)?;
        }
        writeln!(f)?;
        write!(f, "{}", TipsLines(&self.tips))
    }
}

impl Display for RemovedPlant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Removed #{} {}", self.id, self.name)
    }
}

impl Display for ChatReply {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(plant) = &self.plant {
            writeln!(f, "About your {}:", plant)?;
        }
        writeln!(f, "{}", self.message.bot_response)
    }
}

impl Display for ChatHistoryView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.messages.is_empty() {
            return writeln!(f, "No conversations yet.");
        }
        for message in &self.messages {
            writeln!(f, "[{}] You: {}", message.timestamp.format(TIME_FORMAT), message.user_message)?;
            writeln!(f, "Botanist: {}", message.bot_response)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Display for IdentificationView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.identification {
            Identification::Recognized(plant) => {
                writeln!(f, "{} ({})", plant.common_name, plant.scientific_name)?;
                writeln!(f, "{}", plant.description)?;
                writeln!(f, "Care level: {} | Confidence: {:?}", plant.care_level, plant.confidence)
            }
            Identification::Unrecognized { raw } if raw.is_empty() => {
                writeln!(f, "Could not identify the plant. Try a clearer photo.")
            }
            Identification::Unrecognized { raw } => {
                writeln!(f, "Could not identify the plant. The model said: {}", raw)
            }
        }
    }
}

impl Display for HealthView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let assessment = &self.assessment;
        writeln!(f, "Health: {}", assessment.status)?;
        if let Some(notice) = &self.notice {
            writeln!(f, "{}", notice)?;
        } else {
            writeln!(f, "Observed: {}", assessment.caption)?;
        }
        if let Some(question) = &assessment.question {
            writeln!(f, "Your question: {}", question)?;
        }
        for finding in &assessment.findings {
            writeln!(f)?;
            writeln!(f, "{}", finding.symptom)?;
            writeln!(f, "  Possible causes: {}", finding.causes.join(", "))?;
            for recommendation in &finding.recommendations {
                writeln!(f, "  - {}", recommendation)?;
            }
        }
        if !assessment.maintenance_tips.is_empty() {
            writeln!(f)?;
            writeln!(f, "Keep it up:")?;
            for tip in &assessment.maintenance_tips {
                writeln!(f, "  - {}", tip)?;
            }
        }
        if assessment.status == HealthStatus::Unassessed && self.notice.is_none() {
            writeln!(f, "Could not judge health from this photo; try one closer to the leaves.")?;
        }
        Ok(())
    }
}

impl Display for ProfileView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Some(profile) = &self.profile else {
            return writeln!(f, "No profile saved. Create one with `leafcare profile set`.");
        };
        writeln!(f, "{} <{}>", profile.name, profile.email)?;
        for (label, value) in [
            ("Phone", &profile.phone),
            ("Profession", &profile.profession),
            ("Location", &profile.location),
        ] {
            if !value.is_empty() {
                writeln!(f, "{}: {}", label, value)?;
            }
        }
        writeln!(f, "Member since {}", profile.created_at.format("%Y-%m-%d"))
    }
}

impl Display for LocationView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{}", self.location.label(), source_note(&self.source))?;
        if let Some((lat, lon)) = self.location.coordinates() {
            writeln!(f, "Coordinates: {:.4}, {:.4}", lat, lon)?;
        }
        writeln!(f, "Detected via: {}", self.source)
    }
}

impl Display for NurseryView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Nurseries within {:.0} km of {}{}",
            self.radius_km,
            self.city,
            source_note(&self.source)
        )?;
        if self.nurseries.is_empty() {
            return writeln!(f, "None found.");
        }
        for nursery in &self.nurseries {
            writeln!(
                f,
                "- {} ({:.1} km, rating {:.1})",
                nursery.name, nursery.distance_km, nursery.rating
            )?;
            writeln!(f, "  {}", nursery.address)?;
            if !nursery.phone.is_empty() {
                writeln!(f, "  Phone: {}", nursery.phone)?;
            }
            writeln!(f, "  {}", nursery.map_url())?;
        }
        Ok(())
    }
}

impl Display for SpeciesView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Results for \"{}\"{}", self.query, source_note(&self.source))?;
        if self.results.is_empty() {
            return writeln!(f, "No matching species.");
        }
        for species in &self.results {
            writeln!(f, "- {} ({})", species.common_name, species.scientific_name)?;
        }
        Ok(())
    }
}

impl Display for TipsView {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Care tips for {}", self.name)?;
        write!(f, "{}", TipsLines(&self.tips))
    }
}

struct TipsLines<'a>(&'a CareTips);

impl Display for TipsLines<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Watering:    {}", self.0.watering)?;
        writeln!(f, "  Sunlight:    {}", self.0.sunlight)?;
        writeln!(f, "  Temperature: {}", self.0.temperature)?;
        writeln!(f, "  Fertilizer:  {}", self.0.fertilizer)
    }
}
