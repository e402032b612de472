use crate::error::{Error, Result};
use chrono::{FixedOffset, Offset, Utc};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// Absent means the in-memory store is used.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    /// Offset (minutes east of UTC) that defines the campus calendar day.
    pub campus_utc_offset_minutes: i32,
    pub enforce_registration_window: bool,
    pub max_body_bytes: usize,
    pub log_json: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let offset: i32 = get_env_parse_or("CAMPUS_UTC_OFFSET_MINUTES", 0)?;
        if offset.abs() >= 24 * 60 {
            return Err(Error::Config(format!(
                "CAMPUS_UTC_OFFSET_MINUTES out of range: {}",
                offset
            )));
        }

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            jwt_secret: get_env("JWT_SECRET")?,
            jwt_ttl_hours: get_env_parse_or("JWT_TTL_HOURS", 168)?,
            campus_utc_offset_minutes: offset,
            enforce_registration_window: get_env_parse_or("ENFORCE_REGISTRATION_WINDOW", false)?,
            max_body_bytes: get_env_parse_or("MAX_BODY_BYTES", 1024 * 1024)?,
            log_json: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// The fixed offset the registration cut-off is evaluated in.
    pub fn campus_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.campus_utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
