//! Scheduler configuration.
//!
//! These settings are caller-side policy for the review service. The SM-2
//! engine itself takes no configuration.

use serde::Deserialize;
use std::path::Path;

/// Default number of due cards returned per query
pub const DEFAULT_DUE_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Upper bound applied to intervals after scheduling; `None` leaves them uncapped
    pub max_interval_days: Option<u32>,
    pub due_limit: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            max_interval_days: None,
            due_limit: DEFAULT_DUE_LIMIT,
        }
    }
}

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    scheduler: Option<SchedulerSection>,
}

#[derive(Debug, Default, Deserialize)]
struct SchedulerSection {
    max_interval_days: Option<u32>,
    due_limit: Option<usize>,
}

/// Load configuration with priority: config.toml > .env / environment > default
pub fn load_config() -> SchedulerConfig {
    load_config_in(Path::new("."))
}

/// [`load_config`] reading `config.toml` and `.env` from `dir`
pub fn load_config_in(dir: &Path) -> SchedulerConfig {
    // Load .env file if present; existing environment variables win
    let _ = dotenvy::from_path(dir.join(".env"));
    load_from_path(&dir.join("config.toml"))
}

/// Same priority order as [`load_config`], reading the TOML file at `path`
pub fn load_from_path(path: &Path) -> SchedulerConfig {
    let section = match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => config.scheduler.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("Ignoring invalid {}: {}", path.display(), e);
                SchedulerSection::default()
            }
        },
        Err(_) => SchedulerSection::default(),
    };

    resolve(section, |key| std::env::var(key).ok())
}

fn resolve(section: SchedulerSection, env: impl Fn(&str) -> Option<String>) -> SchedulerConfig {
    let defaults = SchedulerConfig::default();

    let max_interval_days = match section.max_interval_days {
        Some(days) => {
            tracing::info!("Using max_interval_days from config.toml: {}", days);
            Some(days)
        }
        None => env_parse::<u32>(&env, "SCHEDULER_MAX_INTERVAL_DAYS"),
    }
    .filter(|days| {
        if *days == 0 {
            tracing::warn!("max_interval_days must be at least 1, leaving intervals uncapped");
        }
        *days > 0
    });

    let due_limit = section
        .due_limit
        .or_else(|| env_parse::<usize>(&env, "SCHEDULER_DUE_LIMIT"))
        .unwrap_or(defaults.due_limit);

    SchedulerConfig {
        max_interval_days,
        due_limit,
    }
}

fn env_parse<T: std::str::FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => {
            tracing::info!("Using {} from env: {}", key, raw.trim());
            Some(value)
        }
        Err(_) => {
            tracing::warn!("Ignoring unparseable {}={:?}", key, raw);
            None
        }
    }
}
