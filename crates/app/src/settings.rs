//! Handles settings for the application.
//!
//! Values come from an optional `settings.toml` (path overridable with
//! `POCKETBOOK_CONFIG`) and then from `POCKETBOOK__SECTION__KEY` environment
//! variables, e.g. `POCKETBOOK__AUTH__JWT_SECRET`.

use std::str::FromStr;

use chrono::Duration;
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "settings";
const CONFIG_PATH_VAR: &str = "POCKETBOOK_CONFIG";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Self::Sqlite("pocketbook.db".to_string())
    }
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Auth {
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_token_ttl_minutes: 15,
            refresh_token_ttl_days: 7,
            bcrypt_cost: engine::auth::DEFAULT_BCRYPT_COST,
        }
    }
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish_non_exhaustive()
    }
}

impl Auth {
    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_ttl_minutes)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_ttl_days)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Dashboard {
    pub timezone: String,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self {
            timezone: engine::period::DEFAULT_REFERENCE_ZONE.name().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub database: Database,
    pub auth: Auth,
    pub dashboard: Dashboard,
}

impl Settings {
    pub fn new() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let config = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("POCKETBOOK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::Setting("auth.jwt_secret is required".to_string()));
        }
        if self.auth.access_token_ttl_minutes <= 0 || self.auth.refresh_token_ttl_days <= 0 {
            return Err(AppError::Setting("token TTLs must be positive".to_string()));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(AppError::Setting(
                "auth.bcrypt_cost must be between 4 and 31".to_string(),
            ));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        Tz::from_str(&self.dashboard.timezone).map_err(|_| {
            AppError::Setting(format!(
                "unknown dashboard.timezone {:?}",
                self.dashboard.timezone
            ))
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
