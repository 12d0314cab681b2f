use std::path::PathBuf;

use crate::domain::{PostingCapability, StatusTracking};
use crate::poster::PosterConfig;

/// Runtime configuration resolved from positional arguments and environment
/// variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub vendors_path: PathBuf,
    pub requests_path: PathBuf,
    pub posting_mode: PostingCapability,
    pub poster: PosterConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_sources(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    /// Builds the configuration from explicit sources. `args` excludes the
    /// program name.
    pub fn from_sources<A, F>(args: A, lookup: F) -> Result<Self, ConfigError>
    where
        A: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut args = args.into_iter();
        let vendors_path = args.next().ok_or(ConfigError::MissingArgument("vendors.csv"))?;
        let requests_path = args
            .next()
            .ok_or(ConfigError::MissingArgument("writeoffs.csv"))?;

        let posting_mode = match lookup("WRITEOFF_POSTING_MODE").as_deref().map(str::trim) {
            None | Some("") | Some("atomic") => PostingCapability::Atomic,
            Some("sequential") => PostingCapability::Sequential,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "WRITEOFF_POSTING_MODE",
                    value: other.to_string(),
                });
            }
        };

        let defaults = PosterConfig::default();
        let status_tracking = parse_bool(&lookup, "WRITEOFF_STATUS_TRACKING")?
            .map(StatusTracking::from)
            .unwrap_or(defaults.status_tracking);
        let degrade_on_atomic_failure = parse_bool(&lookup, "WRITEOFF_DEGRADE_ON_ATOMIC_FAILURE")?
            .unwrap_or(defaults.degrade_on_atomic_failure);
        let max_conflict_retries = match lookup("WRITEOFF_CONFLICT_RETRIES") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "WRITEOFF_CONFLICT_RETRIES",
                value: raw,
            })?,
            None => defaults.max_conflict_retries,
        };

        Ok(Self {
            vendors_path: PathBuf::from(vendors_path),
            requests_path: PathBuf::from(requests_path),
            posting_mode,
            poster: PosterConfig {
                status_tracking,
                max_conflict_retries,
                degrade_on_atomic_failure,
            },
        })
    }
}

fn parse_bool<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing command line argument <{0}>")]
    MissingArgument(&'static str),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
