use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub mongo_url: String,
    pub mongo_db: String,
    pub public_dir: PathBuf,
    pub flash_ttl: Duration,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("RUST_PORT", "3000"),
            mongo_url: try_load("MONGO_URL", "mongodb://localhost:27017"),
            mongo_db: try_load("MONGO_DB", "contacts"),
            public_dir: try_load("PUBLIC_DIR", "public"),
            flash_ttl: Duration::from_secs(try_load("FLASH_TTL_SECS", "60")),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
