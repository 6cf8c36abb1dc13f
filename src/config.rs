use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    /// Base URL for tracking and acceptance links in outgoing email.
    pub frontend_url: String,
    /// HTTP mail relay endpoint. Unset means emails are logged, not sent.
    pub mail_api_url: Option<String>,
    pub mail_from: String,
    pub mail_timeout_secs: u64,
    pub mail_queue_size: usize,
    /// How long an acceptance token stays claimable; unclaimed orders
    /// expire on the same clock.
    pub token_ttl_hours: i64,
    pub expiry_sweep_secs: u64,
    pub nutrislice_base_url: String,
    pub nutrislice_school: String,
    pub dining_halls: Vec<String>,
    pub meal_types: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            log_level: "info".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            mail_api_url: None,
            mail_from: "orders@dormdash.local".to_string(),
            mail_timeout_secs: 10,
            mail_queue_size: 1024,
            token_ttl_hours: 24,
            expiry_sweep_secs: 60,
            nutrislice_base_url: "https://umassdining.nutrislice.com".to_string(),
            nutrislice_school: "umass-dining".to_string(),
            dining_halls: ["worcester", "berkshire", "franklin", "hampshire"]
                .map(String::from)
                .to_vec(),
            meal_types: ["breakfast", "lunch", "dinner"].map(String::from).to_vec(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();
        let defaults = Config::default();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", defaults.http_port)?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            frontend_url: env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            mail_api_url: env::var("MAIL_API_URL").ok().filter(|url| !url.is_empty()),
            mail_from: env::var("MAIL_FROM").unwrap_or(defaults.mail_from),
            mail_timeout_secs: parse_or_default("MAIL_TIMEOUT_SECS", defaults.mail_timeout_secs)?,
            mail_queue_size: parse_or_default("MAIL_QUEUE_SIZE", defaults.mail_queue_size)?,
            token_ttl_hours: parse_or_default("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            expiry_sweep_secs: parse_or_default("EXPIRY_SWEEP_SECS", defaults.expiry_sweep_secs)?,
            nutrislice_base_url: env::var("NUTRISLICE_BASE_URL")
                .unwrap_or(defaults.nutrislice_base_url),
            nutrislice_school: env::var("NUTRISLICE_SCHOOL").unwrap_or(defaults.nutrislice_school),
            dining_halls: parse_list("DINING_HALLS", defaults.dining_halls),
            meal_types: parse_list("MEAL_TYPES", defaults.meal_types),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}

fn parse_list(key: &str, default: Vec<String>) -> Vec<String> {
    match env::var(key) {
        Ok(raw) => {
            let values: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(String::from)
                .collect();
            if values.is_empty() { default } else { values }
        }
        Err(_) => default,
    }
}
