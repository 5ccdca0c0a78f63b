pub mod config;
pub mod error;
pub mod fallback;

pub use config::{
    CategoryKeywords, ChatConfig, Config, GardenConfig, IdentificationOverride, KeywordRule,
    LocationConfig, NurseryConfig, SpeciesConfig, ValidationResult, VisionConfig, WeatherConfig,
};
pub use error::{ConfigError, ProviderError, ReqwestErrorExt};
pub use fallback::{provider_fn, FallbackChain, FallbackExhausted, Provider, ProviderFuture, Source, Sourced};

use anyhow::Result;

/// Initialize tracing/logging.
///
/// `RUST_LOG` wins when set; otherwise `debug` when verbose, `info` when not.
pub fn init(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::debug!("LeafCare core initialized");
    Ok(())
}
