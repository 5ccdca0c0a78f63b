use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding plants.json, chat_history.json and user_profile.json
    pub data_dir: PathBuf,

    /// Default location and IP geolocation providers
    #[serde(default)]
    pub location: LocationConfig,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Plant store limits and category keywords
    #[serde(default)]
    pub garden: GardenConfig,

    /// Chat-completion provider
    #[serde(default)]
    pub chat: ChatConfig,

    /// Vision identification / health provider
    #[serde(default)]
    pub vision: VisionConfig,

    /// Nursery lookup (Overpass)
    #[serde(default)]
    pub nursery: NurseryConfig,

    /// Species catalogue
    #[serde(default)]
    pub species: SpeciesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub default_city: String,
    pub default_country: String,
    pub default_country_code: String,
    /// Try IP geolocation before falling back to the defaults
    #[serde(default = "default_true")]
    pub detect: bool,
    /// Providers tried in order
    #[serde(default = "default_geo_providers")]
    pub providers: Vec<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_geo_providers() -> Vec<String> {
    vec![
        "https://ipapi.co/json/".to_string(),
        "http://ip-api.com/json/".to_string(),
    ]
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            default_city: "Sialkot".to_string(),
            default_country: "PK".to_string(),
            default_country_code: "PK".to_string(),
            detect: true,
            providers: default_geo_providers(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key (empty = always use default weather)
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Per-session cache lifetime in minutes
    pub refresh_minutes: u32,
    /// Forecast days (8 three-hour entries per day)
    pub forecast_days: u32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
            timeout_secs: default_timeout_secs(),
            refresh_minutes: 15,
            forecast_days: 2,
        }
    }
}

/// Keyword lists used to label plants by name
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub flower: Vec<String>,
    pub tree: Vec<String>,
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        Self {
            flower: ["rose", "flower", "lily", "tulip", "daisy"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            tree: ["tree", "oak", "pine", "maple"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GardenConfig {
    #[serde(default = "default_max_plants")]
    pub max_plants: usize,
    /// Chat messages kept in chat_history.json
    #[serde(default = "default_chat_retention")]
    pub chat_retention: usize,
    #[serde(default = "default_interval_days")]
    pub default_interval_days: u32,
    #[serde(default)]
    pub categories: CategoryKeywords,
}

fn default_max_plants() -> usize {
    50
}

fn default_chat_retention() -> usize {
    100
}

fn default_interval_days() -> u32 {
    3
}

impl Default for GardenConfig {
    fn default() -> Self {
        Self {
            max_plants: default_max_plants(),
            chat_retention: default_chat_retention(),
            default_interval_days: default_interval_days(),
            categories: CategoryKeywords::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Groq (OpenAI-compatible) API key
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            temperature: 0.7,
            max_tokens: 500,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Keyword found in a vision response mapped to a common name
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: String,
    pub name: String,
}

impl KeywordRule {
    pub fn new(keyword: &str, name: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            name: name.to_string(),
        }
    }
}

/// Best-effort correction of a vision answer.
///
/// Applies when the identified name contains `name_contains` and the full
/// response mentions any of `text_mentions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdentificationOverride {
    pub name_contains: String,
    pub text_mentions: Vec<String>,
    pub common_name: String,
    pub scientific_name: String,
    pub description: String,
}

fn default_keyword_rules() -> Vec<KeywordRule> {
    vec![
        KeywordRule::new("tomato", "Tomato Plant"),
        KeywordRule::new("rose", "Rose"),
        KeywordRule::new("snake plant", "Snake Plant"),
        KeywordRule::new("aloe", "Aloe Vera"),
        KeywordRule::new("pothos", "Pothos"),
        KeywordRule::new("philodendron", "Philodendron"),
        KeywordRule::new("basil", "Basil"),
        KeywordRule::new("mint", "Mint"),
        KeywordRule::new("lavender", "Lavender"),
        KeywordRule::new("sunflower", "Sunflower"),
        KeywordRule::new("cactus", "Cactus"),
        KeywordRule::new("fern", "Fern"),
        KeywordRule::new("ivy", "Ivy"),
        KeywordRule::new("jade", "Jade Plant"),
        KeywordRule::new("spider plant", "Spider Plant"),
    ]
}

fn default_overrides() -> Vec<IdentificationOverride> {
    vec![IdentificationOverride {
        name_contains: "rose".to_string(),
        text_mentions: vec!["tomato".to_string(), "solanum".to_string()],
        common_name: "Tomato Plant".to_string(),
        scientific_name: "Solanum lycopersicum".to_string(),
        description: "A tomato plant with red fruits and green leaves.".to_string(),
    }]
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    /// Hugging Face inference API key
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    pub identification_model: String,
    pub health_model: String,
    #[serde(default = "default_vision_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_keyword_rules")]
    pub keywords: Vec<KeywordRule>,
    #[serde(default = "default_overrides")]
    pub overrides: Vec<IdentificationOverride>,
}

fn default_vision_timeout_secs() -> u64 {
    30
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://router.huggingface.co/models".to_string(),
            identification_model: "Salesforce/blip-image-captioning-large".to_string(),
            health_model: "Salesforce/blip-image-captioning-large".to_string(),
            timeout_secs: default_vision_timeout_secs(),
            keywords: default_keyword_rules(),
            overrides: default_overrides(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurseryConfig {
    pub overpass_url: String,
    pub radius_km: f64,
    pub max_results: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NurseryConfig {
    fn default() -> Self {
        Self {
            overpass_url: "http://overpass-api.de/api/interpreter".to_string(),
            radius_km: 10.0,
            max_results: 10,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Perenual API key
    #[serde(default)]
    pub api_key: String,
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeciesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://perenual.com/api".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("leafcare");

        Self {
            data_dir,
            location: LocationConfig::default(),
            weather: WeatherConfig::default(),
            garden: GardenConfig::default(),
            chat: ChatConfig::default(),
            vision: VisionConfig::default(),
            nursery: NurseryConfig::default(),
            species: SpeciesConfig::default(),
        }
    }
}

/// Split a `City,CC` location string.
pub fn parse_location(value: &str) -> Option<(String, String)> {
    let (city, country) = value.split_once(',')?;
    let city = city.trim();
    let country = country.trim();
    if city.is_empty() || country.is_empty() {
        return None;
    }
    Some((city.to_string(), country.to_string()))
}

impl Config {
    /// Load configuration from the default path, creating it if missing.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist.
    ///
    /// Environment overrides are applied after reading.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {}", path.display());
            config
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Overlay secrets and the default location from the environment.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("OPENWEATHER_API_KEY") {
            self.weather.api_key = key;
        }
        if let Some(key) = non_empty("GROQ_API_KEY") {
            self.chat.api_key = key;
        }
        if let Some(key) = non_empty("HUGGINGFACE_API_KEY") {
            self.vision.api_key = key;
        }
        if let Some(key) = non_empty("PERENUAL_API_KEY") {
            self.species.api_key = key;
        }
        if let Some(location) = non_empty("LEAFCARE_DEFAULT_LOCATION") {
            match parse_location(&location) {
                Some((city, country)) => {
                    self.location.default_city = city;
                    self.location.default_country_code = country.clone();
                    self.location.default_country = country;
                }
                None => tracing::warn!(
                    "Ignoring LEAFCARE_DEFAULT_LOCATION={:?}; expected City,CC",
                    location
                ),
            }
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);
        self.validate_url(&self.chat.base_url, "chat.base_url", &mut result);
        self.validate_url(&self.vision.base_url, "vision.base_url", &mut result);
        self.validate_url(&self.nursery.overpass_url, "nursery.overpass_url", &mut result);
        self.validate_url(&self.species.base_url, "species.base_url", &mut result);
        for (i, provider) in self.location.providers.iter().enumerate() {
            self.validate_url(provider, &format!("location.providers[{}]", i), &mut result);
        }

        if self.location.default_city.trim().is_empty() {
            result.add_error("location.default_city", "Default city cannot be empty");
        }

        let timeouts = [
            ("location.timeout_secs", self.location.timeout_secs),
            ("weather.timeout_secs", self.weather.timeout_secs),
            ("chat.timeout_secs", self.chat.timeout_secs),
            ("vision.timeout_secs", self.vision.timeout_secs),
            ("nursery.timeout_secs", self.nursery.timeout_secs),
            ("species.timeout_secs", self.species.timeout_secs),
        ];
        for (field, secs) in timeouts {
            if secs == 0 {
                result.add_error(field, "Timeout must be greater than 0");
            } else if secs > 120 {
                result.add_warning(field, "Timeout is unusually long (>120s)");
            }
        }

        if self.weather.refresh_minutes == 0 {
            result.add_warning(
                "weather.refresh_minutes",
                "Weather caching disabled (0 minutes)",
            );
        }

        if self.weather.forecast_days == 0 || self.weather.forecast_days > 5 {
            result.add_error("weather.forecast_days", "Forecast days must be between 1 and 5");
        }

        if self.garden.max_plants == 0 {
            result.add_error("garden.max_plants", "Max plants must be greater than 0");
        }
        if self.garden.chat_retention == 0 {
            result.add_error("garden.chat_retention", "Chat retention must be greater than 0");
        }
        if self.garden.default_interval_days == 0 {
            result.add_error(
                "garden.default_interval_days",
                "Watering interval must be at least 1 day",
            );
        }

        if !(0.0..=2.0).contains(&self.chat.temperature) {
            result.add_error("chat.temperature", "Temperature must be between 0.0 and 2.0");
        }

        if self.nursery.radius_km <= 0.0 {
            result.add_error("nursery.radius_km", "Search radius must be positive");
        }

        let keys = [
            ("weather.api_key", &self.weather.api_key, "default weather will be shown"),
            ("chat.api_key", &self.chat.api_key, "AI chat is unavailable"),
            ("vision.api_key", &self.vision.api_key, "plant identification is unavailable"),
            ("species.api_key", &self.species.api_key, "species search uses built-in data"),
        ];
        for (field, key, consequence) in keys {
            if key.trim().is_empty() {
                result.add_warning(field, format!("Not configured - {}", consequence));
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("leafcare");

        Ok(config_dir.join("config.toml"))
    }

    pub fn plants_path(&self) -> PathBuf {
        self.data_dir.join("plants.json")
    }

    pub fn chat_history_path(&self) -> PathBuf {
        self.data_dir.join("chat_history.json")
    }

    pub fn profile_path(&self) -> PathBuf {
        self.data_dir.join("user_profile.json")
    }
}
