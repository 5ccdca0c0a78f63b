//! Command line definition and dispatch.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use clap::{Args, Parser, Subcommand};
use leafcare_services::{NewPlant, Placement, ProfileInput, SunPreference};
use serde::Serialize;

use crate::context::DashboardContext;
use crate::dashboard::build_dashboard;
use crate::error::AppError;
use crate::handlers;
use crate::outcome::Outcome;

/// Smart garden assistant: watering, sunlight and weather alerts for your plants
#[derive(Parser, Debug)]
#[command(name = "leafcare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "LEAFCARE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print views as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Weather, alerts and the state of every plant (default)
    Dashboard,

    /// List your plants
    Plants,

    /// Add a plant to the garden
    Add(AddArgs),

    /// Record that a plant was watered now
    Water { id: u64 },

    /// Remove a plant
    Remove { id: u64 },

    /// Show one plant with care tips
    Show { id: u64 },

    /// Ask the AI botanist a question
    Chat {
        message: String,

        /// Ask about one of your plants
        #[arg(short, long)]
        plant: Option<u64>,
    },

    /// Recent chat history
    History {
        #[arg(short, long, default_value_t = leafcare_services::DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Identify a plant from a photo
    Identify { image: PathBuf },

    /// Check a plant's health from a photo
    Health {
        image: PathBuf,

        /// Specific question about the plant
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Show or update your profile
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// Detect your location from your IP address
    Location,

    /// Plant nurseries near you
    Nurseries {
        /// Search radius in kilometres
        #[arg(short, long)]
        radius: Option<f64>,
    },

    /// Search the plant species catalogue
    Search { query: String },

    /// Care tips for a plant by name
    Tips { name: String },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct AddArgs {
    pub name: String,

    /// Where the plant lives (free text, e.g. "Kitchen")
    #[arg(short, long, default_value = "Garden")]
    pub location: String,

    /// Open Roof, Balcony or Indoor Window
    #[arg(short, long, default_value = "Indoor Window")]
    pub placement: Placement,

    /// Morning Sun, Afternoon Shade or Full Sun
    #[arg(short, long, default_value = "Morning Sun")]
    pub sun: SunPreference,

    /// Days between waterings
    #[arg(short, long)]
    pub interval: Option<u32>,

    #[arg(long)]
    pub scientific_name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub care_level: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Path to a photo of the plant
    #[arg(long)]
    pub image: Option<String>,

    /// Days since the plant was last watered
    #[arg(long)]
    pub watered_days_ago: Option<i64>,
}

impl AddArgs {
    /// Build the record to store. An out-of-range `--watered-days-ago` is
    /// returned as the message to show instead.
    pub fn into_new_plant(self, default_interval: u32, now: DateTime<Utc>) -> Result<NewPlant, String> {
        let last_watered = match self.watered_days_ago {
            Some(days) => Some(
                Duration::try_days(days)
                    .and_then(|elapsed| now.checked_sub_signed(elapsed))
                    .ok_or_else(|| format!("{} days ago is not a date LeafCare can record.", days))?,
            ),
            None => None,
        };

        let mut plant = NewPlant::new(self.name.trim(), self.location.trim());
        plant.placement = self.placement;
        plant.sun_preference = self.sun;
        plant.watering_interval_days = self.interval.unwrap_or(default_interval);
        plant.scientific_name = self.scientific_name.filter(|s| !s.trim().is_empty());
        plant.description = self.description.unwrap_or_default();
        if let Some(level) = self.care_level.filter(|s| !s.trim().is_empty()) {
            plant.care_level = level;
        }
        plant.notes = self.notes.unwrap_or_default();
        plant.image_path = self.image;
        plant.last_watered = last_watered;
        Ok(plant)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum ProfileCommand {
    /// Show the saved profile
    Show,

    /// Create or update the profile; omitted fields keep their saved value
    Set(ProfileArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ProfileArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub profession: Option<String>,
    /// "City, CC" used for weather
    #[arg(long)]
    pub location: Option<String>,
}

impl ProfileArgs {
    /// Merge onto an existing profile input.
    pub fn merge(self, base: ProfileInput) -> ProfileInput {
        ProfileInput {
            name: self.name.unwrap_or(base.name),
            email: self.email.unwrap_or(base.email),
            phone: self.phone.unwrap_or(base.phone),
            profession: self.profession.unwrap_or(base.profession),
            location: self.location.unwrap_or(base.location),
        }
    }
}

/// Text ready to print, and whether the action was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub rejected: bool,
}

fn render<T: Serialize + Display>(value: &T, json: bool) -> Result<String, AppError> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(value.to_string().trim_end().to_string())
    }
}

fn rendered<T: Serialize + Display>(value: T, json: bool) -> Result<Rendered, AppError> {
    Ok(Rendered {
        text: render(&value, json)?,
        rejected: false,
    })
}

fn rendered_outcome<T: Serialize + Display>(outcome: Outcome<T>, json: bool) -> Result<Rendered, AppError> {
    Ok(Rendered {
        rejected: outcome.is_rejected(),
        text: render(&outcome, json)?,
    })
}

/// Read an image from disk, refusing oversized files before loading them.
fn read_image(path: &Path) -> Result<Vec<u8>, String> {
    let unreadable = |e: std::io::Error| format!("Could not read image {}: {}", path.display(), e);
    let size = std::fs::metadata(path).map_err(unreadable)?.len();
    if size > handlers::MAX_IMAGE_BYTES as u64 {
        return Err(handlers::image_too_large(size));
    }
    std::fs::read(path).map_err(unreadable)
}

/// Run one command against the context.
pub async fn execute(
    ctx: &DashboardContext,
    command: Command,
    json: bool,
    now: DateTime<Utc>,
) -> Result<Rendered, AppError> {
    tracing::debug!("Executing {:?}", command);

    match command {
        Command::Dashboard => rendered(build_dashboard(ctx, now).await?, json),
        Command::Plants => rendered(handlers::list_plants(ctx)?, json),
        Command::Add(args) => match args.into_new_plant(ctx.config.garden.default_interval_days, now) {
            Ok(plant) => rendered_outcome(handlers::add_plant(ctx, plant)?.map(PlantAdded), json),
            Err(reason) => rendered_outcome(Outcome::<PlantAdded>::Rejected(reason), json),
        },
        Command::Water { id } => {
            rendered_outcome(handlers::water_plant(ctx, id, now)?.map(PlantWatered), json)
        }
        Command::Remove { id } => rendered_outcome(handlers::remove_plant(ctx, id)?, json),
        Command::Show { id } => rendered_outcome(handlers::show_plant(ctx, id, now).await?, json),
        Command::Chat { message, plant } => {
            rendered_outcome(handlers::chat(ctx, &message, plant, now).await?, json)
        }
        Command::History { limit } => rendered(handlers::chat_history(ctx, limit)?, json),
        Command::Identify { image } => match read_image(&image) {
            Ok(bytes) => rendered_outcome(handlers::identify(ctx, &bytes).await?, json),
            Err(reason) => rendered_outcome(Outcome::<String>::Rejected(reason), json),
        },
        Command::Health { image, question } => match read_image(&image) {
            Ok(bytes) => rendered_outcome(
                handlers::assess_health(ctx, &bytes, question.as_deref()).await?,
                json,
            ),
            Err(reason) => rendered_outcome(Outcome::<String>::Rejected(reason), json),
        },
        Command::Profile(ProfileCommand::Show) => rendered(handlers::show_profile(ctx)?, json),
        Command::Profile(ProfileCommand::Set(args)) => {
            let base = ctx
                .profile
                .load()?
                .map(|p| ProfileInput {
                    name: p.name,
                    email: p.email,
                    phone: p.phone,
                    profession: p.profession,
                    location: p.location,
                })
                .unwrap_or_default();
            rendered_outcome(handlers::save_profile(ctx, args.merge(base), now)?, json)
        }
        Command::Location => rendered(handlers::detect_location(ctx).await, json),
        Command::Nurseries { radius } => {
            rendered_outcome(handlers::nearby_nurseries(ctx, radius).await?, json)
        }
        Command::Search { query } => rendered_outcome(handlers::search_species(ctx, &query).await?, json),
        Command::Tips { name } => rendered_outcome(handlers::care_tips(&name), json),
    }
}

/// A newly added plant
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PlantAdded(pub leafcare_services::Plant);

impl Display for PlantAdded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Added #{} {} ({}, every {} day(s))",
            self.0.id, self.0.name, self.0.placement, self.0.watering_interval_days
        )
    }
}

/// A plant that was just watered
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct PlantWatered(pub leafcare_services::Plant);

impl Display for PlantWatered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Watered #{} {}", self.0.id, self.0.name)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["leafcare"]).unwrap();
        assert_eq!(cli.command, None);
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "leafcare",
            "add",
            "Basil",
            "--placement",
            "balcony",
            "--sun",
            "full sun",
            "--interval",
            "2",
            "--watered-days-ago",
            "1",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);

        let Some(Command::Add(args)) = cli.command else {
            panic!("expected add");
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let plant = args.into_new_plant(3, now).unwrap();
        assert_eq!(plant.name, "Basil");
        assert_eq!(plant.location, "Garden");
        assert_eq!(plant.placement, Placement::Balcony);
        assert_eq!(plant.sun_preference, SunPreference::FullSun);
        assert_eq!(plant.watering_interval_days, 2);
        assert_eq!(plant.last_watered, Some(now - Duration::days(1)));
    }

    #[test]
    fn test_absurd_watered_days_ago_is_rejected() {
        let cli = Cli::try_parse_from(["leafcare", "add", "Rose", "--watered-days-ago", "200000000"]).unwrap();
        let Some(Command::Add(args)) = cli.command else {
            panic!("expected add");
        };
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 9, 0, 0).unwrap();
        let reason = args.into_new_plant(3, now).unwrap_err();
        assert!(reason.contains("200000000 days ago"));
    }

    #[test]
    fn test_read_image_checks_size_first() {
        let dir = tempfile::TempDir::new().unwrap();

        let small = dir.path().join("leaf.jpg");
        std::fs::write(&small, b"jpeg").unwrap();
        assert_eq!(read_image(&small).unwrap(), b"jpeg");

        let huge = dir.path().join("huge.jpg");
        let file = std::fs::File::create(&huge).unwrap();
        file.set_len(handlers::MAX_IMAGE_BYTES as u64 + 1).unwrap();
        assert!(read_image(&huge).unwrap_err().contains("too large"));

        assert!(read_image(&dir.path().join("missing.jpg"))
            .unwrap_err()
            .starts_with("Could not read image"));
    }

    #[test]
    fn test_bad_placement_is_a_usage_error() {
        assert!(Cli::try_parse_from(["leafcare", "add", "Basil", "--placement", "garage"]).is_err());
    }

    #[test]
    fn test_profile_merge_keeps_saved_fields() {
        let cli = Cli::try_parse_from(["leafcare", "profile", "set", "--location", "Lahore, PK"]).unwrap();
        let Some(Command::Profile(ProfileCommand::Set(args))) = cli.command else {
            panic!("expected profile set");
        };
        let base = ProfileInput {
            name: "Ayesha".into(),
            email: "ayesha@example.com".into(),
            ..ProfileInput::default()
        };
        let merged = args.merge(base);
        assert_eq!(merged.name, "Ayesha");
        assert_eq!(merged.location, "Lahore, PK");
    }
}
