use std::path::PathBuf;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "CATALOG_ENV";
const CONFIG_DIR_ENV: &str = "CATALOG_CONFIG_DIR";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub slugs: SlugSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, environment overlay
    /// and `CATALOG_*` variables (nested keys separated by `__`).
    pub fn load() -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = std::env::var(ENV_VAR_NAME).unwrap_or_else(|_| DEFAULT_ENV.to_string());
        let config_dir = match std::env::var(CONFIG_DIR_ENV) {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => std::env::current_dir()
                .with_context(|| "unable to resolve current directory")?
                .join("config"),
        };

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{environment}.toml"));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix("CATALOG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("slugs.reserved"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = match environment.as_str() {
            "local" => Environment::Local,
            "staging" => Environment::Staging,
            "production" => Environment::Production,
            other => {
                return Err(anyhow!(
                    "unsupported environment '{}'; expected local/staging/production",
                    other
                ));
            }
        };

        Ok(settings)
    }
}

/// Store-wide settings shared by every module.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralSettings {
    /// Base URL public links are resolved against.
    #[serde(default = "GeneralSettings::default_domain")]
    pub domain: String,
}

impl GeneralSettings {
    fn default_domain() -> String {
        "http://localhost:3000".to_string()
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            domain: Self::default_domain(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlugSettings {
    /// Slugs no record may take because routes already own them.
    #[serde(default = "SlugSettings::default_reserved")]
    pub reserved: Vec<String>,
}

impl SlugSettings {
    fn default_reserved() -> Vec<String> {
        ["api", "admin", "ajax", "static", "assets"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}

impl Default for SlugSettings {
    fn default() -> Self {
        Self {
            reserved: Self::default_reserved(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Source of store-wide settings read at request time.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Base domain public URLs are built from.
    async fn domain(&self) -> anyhow::Result<String>;
}

#[async_trait]
impl SettingsProvider for Settings {
    async fn domain(&self) -> anyhow::Result<String> {
        Ok(self.general.domain.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_domain_is_localhost() {
        let settings = Settings::default();
        assert_eq!(settings.general.domain, "http://localhost:3000");
    }

    #[test]
    fn default_reserved_slugs_cover_api_routes() {
        let settings = Settings::default();
        assert!(settings.slugs.reserved.iter().any(|slug| slug == "api"));
        assert!(settings.slugs.reserved.iter().any(|slug| slug == "admin"));
    }

    #[test]
    fn partial_sections_fill_defaults() {
        let cfg = config::Config::builder()
            .set_override("general.domain", "https://shop.test")
            .unwrap()
            .set_override("telemetry.log_format", "json")
            .unwrap()
            .build()
            .unwrap();
        let settings: Settings = cfg.try_deserialize().unwrap();
        assert_eq!(settings.general.domain, "https://shop.test");
        assert_eq!(settings.telemetry.log_format, LogFormat::Json);
        assert_eq!(settings.telemetry.filter, "info");
        assert!(!settings.slugs.reserved.is_empty());
    }

    #[tokio::test]
    async fn settings_provide_their_domain() {
        let mut settings = Settings::default();
        settings.general.domain = "https://shop.test".to_string();
        assert_eq!(settings.domain().await.unwrap(), "https://shop.test");
    }
}
