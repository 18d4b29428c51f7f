//! Process configuration from environment variables.
//!
//! `main` loads a `.env` file first (when present) so local runs can keep
//! their settings next to the binary.

use anyhow::{anyhow, bail, Context, Result};
use chrono_tz::Tz;
use rand::{distributions::Alphanumeric, Rng};
use std::{env, fmt::Display, net::IpAddr, path::PathBuf, str::FromStr};
use tracing::{info, warn};

use crate::domain::calendar::CalendarService;
use crate::domain::history_service::DEFAULT_RETENTION_DAYS;
use crate::domain::rollover_service::DEFAULT_ROLLOVER_HOURS;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub data_dir: PathBuf,
    pub admin_username: String,
    pub admin_password: String,
    pub cron_secret: Option<String>,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub history_retention_days: usize,
    pub timezone: Tz,
    pub rollover_hours: Vec<u32>,
    pub rollover_scheduler: bool,
    pub rollover_poll_secs: u64,
    pub static_dir: Option<PathBuf>,
    pub cors_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: 3000,
            data_dir: PathBuf::from("data"),
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            cron_secret: None,
            session_secret: random_secret(),
            session_ttl_hours: 12,
            history_retention_days: DEFAULT_RETENTION_DAYS,
            timezone: chrono_tz::America::New_York,
            rollover_hours: DEFAULT_ROLLOVER_HOURS.to_vec(),
            rollover_scheduler: false,
            rollover_poll_secs: 600,
            static_dir: None,
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let admin_password = optional("ADMIN_PASSWORD").unwrap_or_else(|| {
            warn!("ADMIN_PASSWORD not set, using the built-in default");
            "admin".to_string()
        });

        let session_secret = optional("SESSION_SECRET").unwrap_or_else(|| {
            warn!("SESSION_SECRET not set, sessions will not survive a restart");
            random_secret()
        });

        let cron_secret = optional("CRON_SECRET");
        if cron_secret.is_none() {
            warn!("CRON_SECRET not set, /api/cron/daily-reset will reject every call");
        }

        let timezone_name: String = try_load("BUSINESS_TIMEZONE", "America/New_York")?;
        let history_retention_days: usize = try_load("HISTORY_RETENTION_DAYS", "15")?;
        if history_retention_days == 0 {
            bail!("HISTORY_RETENTION_DAYS must be at least 1");
        }

        let config = Self {
            bind_addr: try_load("BIND_ADDR", "0.0.0.0")?,
            port: try_load("PORT", "3000")?,
            data_dir: try_load("DATA_DIR", "data")?,
            admin_username: try_load("ADMIN_USERNAME", "admin")?,
            admin_password,
            cron_secret,
            session_secret,
            session_ttl_hours: try_load("SESSION_TTL_HOURS", "12")?,
            history_retention_days,
            timezone: CalendarService::parse_timezone(&timezone_name)?,
            rollover_hours: parse_hours(&try_load::<String>("ROLLOVER_HOURS", "3,4")?)?,
            rollover_scheduler: try_load("ROLLOVER_SCHEDULER", "false")?,
            rollover_poll_secs: try_load("ROLLOVER_POLL_SECS", "600")?,
            static_dir: optional("STATIC_DIR").map(PathBuf::from),
            cors_origin: optional("CORS_ORIGIN"),
        };

        if config.session_ttl_hours <= 0 {
            bail!("SESSION_TTL_HOURS must be positive");
        }
        if config.rollover_poll_secs == 0 {
            bail!("ROLLOVER_POLL_SECS must be positive");
        }

        Ok(config)
    }
}

/// Non-empty value of `key`, if set
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    let raw = optional(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse()
        .map_err(|e| anyhow!("Invalid {key} value '{raw}': {e}"))
}

/// Parse a comma-separated list of local hours such as `3,4`
fn parse_hours(raw: &str) -> Result<Vec<u32>> {
    let hours = raw
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| {
            let hour: u32 = h.parse().with_context(|| format!("Invalid hour '{h}' in ROLLOVER_HOURS"))?;
            if hour > 23 {
                bail!("Hour {hour} in ROLLOVER_HOURS is out of range");
            }
            Ok(hour)
        })
        .collect::<Result<Vec<u32>>>()?;

    if hours.is_empty() {
        bail!("ROLLOVER_HOURS must name at least one hour");
    }
    Ok(hours)
}

fn random_secret() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
