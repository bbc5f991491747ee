// src/config.rs
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}: cannot parse {value:?}")]
    Parse { key: &'static str, value: String },

    #[error("{key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_path: PathBuf,
    pub images_dir: PathBuf,
    /// Catchment radius in meters. Always finite and > 0.
    pub catchment_radius_m: f64,
    /// Upper bound on bounding-box candidates per query.
    pub candidate_cap: usize,
    pub grid_cell_deg: f64,
    pub request_timeout: Duration,
    /// `None` disables the background reload.
    pub reload_interval: Option<Duration>,
    pub max_workers: usize,
    pub max_body_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database_path: PathBuf::from("work.sqlite"),
            images_dir: PathBuf::from("public/images"),
            catchment_radius_m: 10_000.0,
            candidate_cap: 5_000,
            grid_cell_deg: 0.1,
            request_timeout: Duration::from_millis(5_000),
            reload_interval: Some(Duration::from_secs(60)),
            max_workers: 8,
            max_body_bytes: 16 * 1024,
        }
    }
}

impl Config {
    /// Load from process environment, honoring a `.env` file if present.
    pub fn init() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Config::default();

        if let Some(v) = parse_key(&lookup, "SHIFTS_BIND_ADDR")? {
            cfg.bind_addr = v;
        }
        if let Some(v) = lookup("SHIFTS_DATABASE_PATH") {
            cfg.database_path = PathBuf::from(v);
        }
        if let Some(v) = lookup("SHIFTS_IMAGES_DIR") {
            cfg.images_dir = PathBuf::from(v);
        }
        if let Some(v) = parse_key(&lookup, "SHIFTS_CATCHMENT_RADIUS_M")? {
            cfg.catchment_radius_m = v;
        }
        if let Some(v) = parse_key(&lookup, "SHIFTS_CANDIDATE_CAP")? {
            cfg.candidate_cap = v;
        }
        if let Some(v) = parse_key(&lookup, "SHIFTS_GRID_CELL_DEG")? {
            cfg.grid_cell_deg = v;
        }
        if let Some(ms) = parse_key::<u64, _>(&lookup, "SHIFTS_REQUEST_TIMEOUT_MS")? {
            cfg.request_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = parse_key::<u64, _>(&lookup, "SHIFTS_RELOAD_INTERVAL_SECS")? {
            cfg.reload_interval = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(v) = parse_key(&lookup, "SHIFTS_MAX_WORKERS")? {
            cfg.max_workers = v;
        }
        if let Some(v) = parse_key(&lookup, "SHIFTS_MAX_BODY_BYTES")? {
            cfg.max_body_bytes = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.catchment_radius_m.is_finite() || self.catchment_radius_m <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "SHIFTS_CATCHMENT_RADIUS_M",
                reason: format!("must be finite and > 0, got {}", self.catchment_radius_m),
            });
        }
        if self.candidate_cap == 0 {
            return Err(ConfigError::Invalid {
                key: "SHIFTS_CANDIDATE_CAP",
                reason: "must be > 0".into(),
            });
        }
        if !(self.grid_cell_deg > 0.0 && self.grid_cell_deg <= 90.0) {
            return Err(ConfigError::Invalid {
                key: "SHIFTS_GRID_CELL_DEG",
                reason: format!("must be in (0, 90], got {}", self.grid_cell_deg),
            });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "SHIFTS_REQUEST_TIMEOUT_MS",
                reason: "must be > 0".into(),
            });
        }
        if self.max_workers == 0 {
            return Err(ConfigError::Invalid {
                key: "SHIFTS_MAX_WORKERS",
                reason: "must be > 0".into(),
            });
        }
        Ok(())
    }
}

fn parse_key<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Parse { key, value: raw }),
    }
}
