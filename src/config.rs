use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

use crate::error::ConfigError;

// Only for local development, a warning is logged whenever it is used
const DEV_JWT_SECRET: &str = "pifloor-development-secret-do-not-use-in-production";

#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub jwt_secret: String,
    pub jwt_expires_minutes: i64,
    pub bcrypt_cost: u32,
    pub frontend_url: String,
    pub master_admin_id: i64,
    pub google_api_key: Option<String>,
    pub gemini_api_base: String,
    pub static_dir: Option<String>,
    pub bootstrap_admin: Option<AdminBootstrap>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            database_path: "pifloor.db".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expires_minutes: 15,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            frontend_url: "http://localhost:5173".to_string(),
            master_admin_id: 7,
            google_api_key: None,
            gemini_api_base: "https://generativelanguage.googleapis.com".to_string(),
            static_dir: None,
            bootstrap_admin: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let jwt_secret = optional("JWT_SECRET_KEY").unwrap_or_else(|| {
            warn!("JWT_SECRET_KEY not set! Using the development key (DO NOT USE IN PRODUCTION)");
            defaults.jwt_secret.clone()
        });

        let bootstrap_admin = match (
            optional("ADMIN_USERNAME"),
            optional("ADMIN_EMAIL"),
            optional("ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(email), Some(password)) => Some(AdminBootstrap {
                username,
                email,
                password,
            }),
            (None, None, None) => None,
            _ => {
                return Err(ConfigError::Incomplete(
                    "ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD must be set together",
                ))
            }
        };

        Ok(Self {
            host: try_load("PIFLOOR_HOST", &defaults.host)?,
            port: try_load("PORT", &defaults.port.to_string())?,
            database_path: try_load("DATABASE_PATH", &defaults.database_path)?,
            jwt_secret,
            jwt_expires_minutes: try_load(
                "JWT_EXPIRES_MINUTES",
                &defaults.jwt_expires_minutes.to_string(),
            )?,
            bcrypt_cost: try_load("BCRYPT_COST", &defaults.bcrypt_cost.to_string())?,
            frontend_url: try_load("FRONTEND_URL", &defaults.frontend_url)?,
            master_admin_id: try_load("MASTER_ADMIN_ID", &defaults.master_admin_id.to_string())?,
            google_api_key: optional("GOOGLE_API_KEY"),
            gemini_api_base: try_load("GEMINI_API_BASE", &defaults.gemini_api_base)?,
            static_dir: optional("STATIC_DIR"),
            bootstrap_admin,
        })
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    optional(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e: T::Err| {
            warn!("Invalid {key} value: {e}");
            ConfigError::Invalid {
                key: key.to_string(),
                reason: e.to_string(),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_development_setup() {
        let config = Config::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.master_admin_id, 7);
        assert_eq!(config.jwt_expires_minutes, 15);
        assert!(config.google_api_key.is_none());
    }

    #[test]
    fn test_try_load_rejects_garbage() {
        env::set_var("PIFLOOR_TEST_PORT", "not-a-port");
        let result: Result<u16, _> = try_load("PIFLOOR_TEST_PORT", "5000");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
        env::remove_var("PIFLOOR_TEST_PORT");

        let fallback: u16 = try_load("PIFLOOR_TEST_UNSET_PORT", "5000").unwrap();
        assert_eq!(fallback, 5000);
    }
}
