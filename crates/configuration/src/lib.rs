use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, DatabaseSettings, LoggingSettings};

/// Prefix for environment overrides, e.g. `APP__DATABASE__MAX_CONNECTIONS=10`.
const ENV_PREFIX: &str = "APP";

/// Loads the application configuration from the given TOML file.
///
/// The file is optional: every setting has a default, and any value can be
/// overridden from the environment. `DATABASE_URL` (read from the process
/// environment or a `.env` file) always wins for the connection string.
/// The returned configuration has been validated.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    // A missing .env file is fine; real environments set variables directly.
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let mut config = builder.try_deserialize::<Config>()?;

    if let Ok(url) = std::env::var("DATABASE_URL") {
        tracing::debug!("Using DATABASE_URL from the environment.");
        config.database.url = url;
    }

    config.validate()?;
    Ok(config)
}
