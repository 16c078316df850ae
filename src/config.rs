use anyhow::Context;
use chrono::NaiveTime;
use dotenvy::dotenv;
use std::env;

use crate::model::geo::GeoPoint;

/// Office geofence and work schedule. Loaded once at startup, read-only
/// afterwards.
#[derive(Clone)]
pub struct OfficeConfig {
    pub location: GeoPoint,
    pub radius_meters: f64,
    pub work_start: NaiveTime,
    pub work_end: NaiveTime,
    pub late_tolerance_minutes: i64,
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub jwt_secret: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,
    pub company_name: String,
    pub office: OfficeConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            access_token_ttl: parse_var("ACCESS_TOKEN_TTL", "900")?, // default 15 min
            refresh_token_ttl: parse_var("REFRESH_TOKEN_TTL", "604800")?, // default 7 days

            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: parse_var("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            company_name: env::var("COMPANY_NAME")
                .unwrap_or_else(|_| "PT Lestari Bumi Persada".to_string()),
            office: OfficeConfig::from_env()?,
        })
    }
}

impl OfficeConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            location: GeoPoint {
                latitude: parse_var("OFFICE_LATITUDE", "-7.740165594931652")?,
                longitude: parse_var("OFFICE_LONGITUDE", "110.35828466491625")?,
            },
            radius_meters: parse_var("OFFICE_RADIUS_METERS", "100")?,
            work_start: parse_time_var("WORK_START", "09:00")?,
            work_end: parse_time_var("WORK_END", "18:00")?,
            late_tolerance_minutes: parse_var("LATE_TOLERANCE_MINUTES", "15")?,
        })
    }
}

fn parse_var<T>(key: &str, default: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .with_context(|| format!("invalid {key}"))
}

fn parse_time_var(key: &str, default: &str) -> anyhow::Result<NaiveTime> {
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    NaiveTime::parse_from_str(&raw, "%H:%M").with_context(|| format!("invalid {key}: {raw}"))
}
