//! Runtime configuration
//!
//! Sources, lowest precedence first: built-in defaults, the legacy variables
//! `PORT`, `JWT_SECRET`, `ADMIN_EMAIL` and `OPENROUTER_API_KEY`, an optional
//! `config/lifemon.toml`, then `LIFEMON__SECTION__KEY` environment variables.

use std::collections::HashMap;
use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub uploads: UploadsConfig,
    pub integrations: IntegrationsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub admin_email: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploadsConfig {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IntegrationsConfig {
    pub openrouter_api_key: Option<String>,
    pub openrouter_url: String,
    pub chat_model: String,
    pub food_facts_url: String,
}

const ENV_PREFIX: &str = "LIFEMON";
const CONFIG_FILE: &str = "config/lifemon";
const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const FOOD_FACTS_URL: &str = "https://world.openfoodfacts.org/cgi/search.pl";

/// Legacy variable → settings key
const LEGACY_VARS: [(&str, &str); 4] = [
    ("PORT", "server.port"),
    ("JWT_SECRET", "auth.jwt_secret"),
    ("ADMIN_EMAIL", "auth.admin_email"),
    ("OPENROUTER_API_KEY", "integrations.openrouter_api_key"),
];

impl Settings {
    /// Load from `.env`, the config file and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::build(Some(CONFIG_FILE), None)
    }

    /// Build settings from an optional config file and an environment.
    ///
    /// `env = None` reads the process environment.
    pub fn build(
        config_file: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let lookup = |key: &str| match &env {
            Some(map) => map.get(key).cloned(),
            None => std::env::var(key).ok(),
        };

        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000_i64)?
            .set_default("auth.jwt_secret", "")?
            .set_default("auth.token_ttl_hours", 24_i64)?
            .set_default("auth.bcrypt_cost", 10_i64)?
            .set_default("uploads.dir", "uploads")?
            .set_default("integrations.openrouter_url", OPENROUTER_URL)?
            .set_default("integrations.chat_model", "openai/gpt-4o-mini")?
            .set_default("integrations.food_facts_url", FOOD_FACTS_URL)?;

        for (var, key) in LEGACY_VARS {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                builder = builder.set_default(key, value)?;
            }
        }

        if let Some(path) = config_file {
            builder = builder.add_source(File::with_name(path).required(false));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(env.clone()),
            )
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "auth.jwt_secret must be set (LIFEMON__AUTH__JWT_SECRET or JWT_SECRET)".to_string(),
            ));
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "auth.bcrypt_cost must be between 4 and 31, got {}",
                self.auth.bcrypt_cost
            )));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(ConfigError::Message(
                "auth.token_ttl_hours must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Socket address string for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Configured database path, else [`default_database_path`]
    pub fn database_path(&self) -> PathBuf {
        self.database.path.clone().unwrap_or_else(default_database_path)
    }

    /// True when `email` is the configured bootstrap admin (case-insensitive)
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.auth
            .admin_email
            .as_deref()
            .is_some_and(|admin| admin.trim().eq_ignore_ascii_case(email.trim()))
    }
}

/// `LIFEMON_DATABASE_PATH`, else `data/lifemon.db` under the project root
/// (resolved from the executable location when running from `target/`).
pub fn default_database_path() -> PathBuf {
    std::env::var("LIFEMON_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("lifemon.db");
            path
        })
}
