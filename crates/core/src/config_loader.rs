use crate::config::AppConfig;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging the default TOML file and
    /// `APP_`-prefixed environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from("config/Config.toml")
    }

    /// Loads application configuration from a specific TOML file, with
    /// `APP_`-prefixed environment variables taking precedence.
    ///
    /// Nesting in variable names uses a double underscore so snake_case
    /// field names stay intact: `APP_ENGINE__MAX_ASSETS=16` sets
    /// `engine.max_assets`. Float overrides must use decimal notation;
    /// exponent forms like `1e-6` come through the env provider as strings.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<AppConfig> {
        let config: AppConfig = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        Ok(config)
    }
}
