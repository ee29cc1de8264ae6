use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 30;

/// Server configuration, read once at startup and handed to the pieces that
/// need it.
#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Root under which per-request audio artifacts are created.
    pub scratch_dir: PathBuf,
    pub engine_url: String,
    pub engine_timeout: Duration,
    /// Period of the in-process janitor. `None` leaves cleanup to `/cleanup`.
    pub cleanup_interval: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let tld = lookup("TTS_TLD").unwrap_or_else(|| "com".into());

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            scratch_dir: lookup("TTS_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            engine_url: lookup("TTS_ENGINE_URL").unwrap_or_else(|| {
                format!(
                    "https://translate.google.{}/_/TranslateWebserverUi/data/batchexecute",
                    tld
                )
            }),
            engine_timeout: Duration::from_secs(
                lookup("TTS_ENGINE_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_ENGINE_TIMEOUT_SECS),
            ),
            cleanup_interval: lookup("CLEANUP_INTERVAL_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
