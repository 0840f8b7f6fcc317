use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub const DEVELOPMENT_API_BASE: &str = "http://127.0.0.1:5000";
pub const PRODUCTION_API_BASE: &str = "https://edutrack-backend-pkbq.onrender.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    pub fn api_base(self) -> &'static str {
        match self {
            BuildMode::Development => DEVELOPMENT_API_BASE,
            BuildMode::Production => PRODUCTION_API_BASE,
        }
    }

    fn compiled_default() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

impl FromStr for BuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(BuildMode::Production),
            "development" | "dev" => Ok(BuildMode::Development),
            other => Err(format!("unknown build mode {other:?}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub mode: BuildMode,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn load() -> Self {
        let mode = match var("APP_ENV") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Invalid APP_ENV value: {e}");
                BuildMode::compiled_default()
            }),
            Err(()) => BuildMode::compiled_default(),
        };
        info!("Build mode {mode:?}, prediction service at {}", mode.api_base());

        Self {
            mode,
            host: try_load("EDUTRACK_HOST", "127.0.0.1".to_string()),
            port: try_load("EDUTRACK_PORT", 3000),
        }
    }

    pub fn api_base(&self) -> &'static str {
        self.mode.api_base()
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        info!("{key} not set, using default");
    })
}

fn try_load<T: FromStr + Display>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value: {e}, using default: {default}");
            default
        }),
        Err(()) => default,
    }
}
