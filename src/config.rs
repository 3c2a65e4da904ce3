use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Service configuration, read once at boot from environment variables
/// layered over built-in defaults.
///
/// | Env var | Default |
/// |---|---|
/// | `MONGO_URI` | `mongodb://localhost:27017` |
/// | `MONGO_DATABASE` | `aitools` |
/// | `PORT` | `5000` |
/// | `PUBLIC_URL` | unset |
/// | `KEEPALIVE_INTERVAL_SECS` | `600` |
/// | `UPLOAD_DIR` | `uploads` |
/// | `MAX_UPLOAD_BYTES` | `20971520` |
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub mongo_uri: String,
    pub mongo_database: String,
    pub port: u16,
    /// Externally reachable base URL, used as the keep-alive target.
    #[serde(default)]
    pub public_url: Option<String>,
    pub keepalive_interval_secs: u64,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::load(config::Environment::default().try_parsing(true))
    }

    fn load(env: config::Environment) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .set_default("mongo_uri", "mongodb://localhost:27017")?
            .set_default("mongo_database", "aitools")?
            .set_default("port", 5000)?
            .set_default("keepalive_interval_secs", 600)?
            .set_default("upload_dir", "uploads")?
            .set_default("max_upload_bytes", 20 * 1024 * 1024)?
            .add_source(env)
            .build()?
            .try_deserialize()?;

        if config.keepalive_interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "KEEPALIVE_INTERVAL_SECS must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// URL the keep-alive task calls: `<public_url>/ping`, or the loopback
    /// listener when no public URL is configured.
    pub fn keepalive_url(&self) -> String {
        match self.public_url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            Some(base) => format!("{}/ping", base.trim_end_matches('/')),
            None => format!("http://127.0.0.1:{}/ping", self.port),
        }
    }

    pub fn keepalive_interval(&self) -> Duration {
        Duration::from_secs(self.keepalive_interval_secs)
    }
}
