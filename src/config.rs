// Application configuration.
// Reads an optional JSON file from the config dir, then applies environment overrides.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::cache::{FreshnessWindows, paths};
use crate::error::{AppError, Result};
use crate::period::Period;
use crate::service::StalePolicy;

pub const ENV_URL: &str = "CLUBDUES_URL";
pub const ENV_API_KEY: &str = "CLUBDUES_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "CLUBDUES_ACCESS_TOKEN";
pub const ENV_CLUB_NAME: &str = "CLUBDUES_CLUB_NAME";
pub const ENV_PERIOD: &str = "CLUBDUES_PERIOD";
pub const ENV_FRESH_HOURS: &str = "CLUBDUES_FRESH_HOURS";
pub const ENV_STALE_DAYS: &str = "CLUBDUES_STALE_DAYS";
pub const ENV_STALE_POLICY: &str = "CLUBDUES_STALE_POLICY";

const DEFAULT_CLUB_NAME: &str = "Clube";

/// On-disk shape of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub club_name: Option<String>,
    pub period: Option<String>,
    pub fresh_hours: Option<i64>,
    pub stale_days: Option<i64>,
    /// `serve-stale` or `recompute`.
    pub stale_policy: Option<String>,
    pub snapshot_path: Option<PathBuf>,
    pub reports_dir: Option<PathBuf>,
}

impl ConfigFile {
    /// Read a config file, `None` if it does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)?;
        let file: ConfigFile = serde_json::from_str(&contents)?;
        Ok(Some(file))
    }
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
    pub club_name: String,
    pub period: Period,
    pub windows: FreshnessWindows,
    pub stale_policy: StalePolicy,
    pub snapshot_path: Option<PathBuf>,
    pub reports_dir: Option<PathBuf>,
}

impl Config {
    /// Load from the platform config file and the process environment.
    pub fn load() -> Result<Self> {
        let file = match paths::config_path() {
            Some(path) => ConfigFile::read(&path)?.unwrap_or_default(),
            None => ConfigFile::default(),
        };
        Self::resolve(file, |name| std::env::var(name).ok())
    }

    /// Merge a config file with environment values. Environment wins.
    pub fn resolve(file: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let pick = |name: &str, fallback: Option<String>| {
            env(name).filter(|v| !v.trim().is_empty()).or(fallback)
        };

        let backend_url =
            pick(ENV_URL, file.backend_url).ok_or(AppError::MissingConfig(ENV_URL))?;
        let api_key = pick(ENV_API_KEY, file.api_key).ok_or(AppError::MissingConfig(ENV_API_KEY))?;
        let access_token = pick(ENV_ACCESS_TOKEN, file.access_token);
        let club_name =
            pick(ENV_CLUB_NAME, file.club_name).unwrap_or_else(|| DEFAULT_CLUB_NAME.to_string());

        let period = match pick(ENV_PERIOD, file.period) {
            Some(raw) => raw.parse()?,
            None => Period::current(),
        };

        let defaults = FreshnessWindows::default();
        let fresh_hours = match pick(ENV_FRESH_HOURS, None) {
            Some(raw) => Some(parse_positive(ENV_FRESH_HOURS, &raw)?),
            None => file.fresh_hours,
        };
        let fresh = match fresh_hours {
            Some(hours) => window(ENV_FRESH_HOURS, Duration::try_hours(hours))?,
            None => defaults.fresh,
        };
        let stale_days = match pick(ENV_STALE_DAYS, None) {
            Some(raw) => Some(parse_positive(ENV_STALE_DAYS, &raw)?),
            None => file.stale_days,
        };
        let stale = match stale_days {
            Some(days) => window(ENV_STALE_DAYS, Duration::try_days(days))?,
            None => defaults.stale,
        };

        let stale_policy = match pick(ENV_STALE_POLICY, file.stale_policy) {
            Some(raw) => raw.parse()?,
            None => StalePolicy::default(),
        };

        if stale < fresh {
            return Err(AppError::Other(format!(
                "stale window ({}h) shorter than fresh window ({}h)",
                stale.num_hours(),
                fresh.num_hours()
            )));
        }

        Ok(Self {
            backend_url,
            api_key,
            access_token,
            club_name,
            period,
            windows: FreshnessWindows { fresh, stale },
            stale_policy,
            snapshot_path: file.snapshot_path.or_else(paths::snapshot_path),
            reports_dir: file.reports_dir.or_else(paths::reports_dir),
        })
    }
}

fn window(name: &str, duration: Option<Duration>) -> Result<Duration> {
    duration
        .filter(|d| *d > Duration::zero())
        .ok_or_else(|| AppError::Other(format!("{} is out of range", name)))
}

fn parse_positive(name: &str, raw: &str) -> Result<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Other(format!(
            "{} must be a positive integer, got '{}'",
            name, raw
        ))),
    }
}
