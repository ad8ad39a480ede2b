// config.rs
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("either IDENTITY_JWT_SECRET or IDENTITY_JWT_PUBLIC_KEY must be set")]
    MissingIdentityKey,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Identity provider token verification
    pub identity_jwt_secret: Option<String>,
    pub identity_jwt_public_key: Option<String>,
    pub identity_issuer: Option<String>,
    pub allowed_origins: Vec<String>,
    pub default_currency: String,
    pub bootstrap_admin_emails: Vec<String>,
    pub expiry_sweep_interval_secs: u64,
    pub log_level: String,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let jwt_secret = non_empty("JWT_SECRET_KEY").ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;
        let jwt_maxage = non_empty("JWT_MAXAGE").ok_or(ConfigError::Missing("JWT_MAXAGE"))?;
        let jwt_maxage = parse_number::<i64>("JWT_MAXAGE", &jwt_maxage)?;

        let identity_jwt_secret = non_empty("IDENTITY_JWT_SECRET");
        let identity_jwt_public_key = non_empty("IDENTITY_JWT_PUBLIC_KEY");
        if identity_jwt_secret.is_none() && identity_jwt_public_key.is_none() {
            return Err(ConfigError::MissingIdentityKey);
        }

        let port = match non_empty("PORT") {
            Some(port) => parse_number::<u16>("PORT", &port)?,
            None => 8000,
        };

        let database_max_connections = match non_empty("DATABASE_MAX_CONNECTIONS") {
            Some(value) => parse_number::<u32>("DATABASE_MAX_CONNECTIONS", &value)?,
            None => 10,
        };

        let expiry_sweep_interval_secs = match non_empty("EXPIRY_SWEEP_INTERVAL_SECS") {
            Some(value) => parse_number::<u64>("EXPIRY_SWEEP_INTERVAL_SECS", &value)?,
            None => 3600,
        };

        let allowed_origins = non_empty("CORS_ALLOWED_ORIGINS")
            .map(|value| split_list(&value))
            .unwrap_or_else(|| vec!["http://localhost:3000".to_string()]);

        let bootstrap_admin_emails = non_empty("BOOTSTRAP_ADMIN_EMAILS")
            .map(|value| {
                split_list(&value)
                    .into_iter()
                    .map(|email| email.to_lowercase())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Config {
            database_url: non_empty("DATABASE_URL"),
            database_max_connections,
            jwt_secret,
            jwt_maxage,
            port,
            identity_jwt_secret,
            identity_jwt_public_key,
            identity_issuer: non_empty("IDENTITY_ISSUER"),
            allowed_origins,
            default_currency: non_empty("DEFAULT_CURRENCY").unwrap_or_else(|| "IDR".to_string()),
            bootstrap_admin_emails,
            expiry_sweep_interval_secs,
            log_level: non_empty("LOG_LEVEL").unwrap_or_else(|| "debug".to_string()),
        })
    }
}

fn parse_number<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}
