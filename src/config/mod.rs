//! Runtime configuration, loaded from environment variables with sane
//! defaults. The source URL is deliberately not configurable.

use crate::application::trainer::TrainerConfig;
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct ForecastConfig {
    /// Read timeout for the history fetch, in seconds.
    pub http_timeout_secs: u64,
    pub trainer: TrainerConfig,
}

impl ForecastConfig {
    pub fn from_env() -> Result<Self> {
        let http_timeout_secs = env_or("BRENTCAST_HTTP_TIMEOUT_SECS", 30u64)?;
        let seed = env_or("BRENTCAST_TRAIN_SEED", 42u64)?;
        let n_trees = env_or("BRENTCAST_TRAIN_TREES", 100usize)?;
        let test_fraction = env_or("BRENTCAST_TEST_FRACTION", 0.2f64)?;

        if !(test_fraction > 0.0 && test_fraction < 1.0) {
            anyhow::bail!(
                "BRENTCAST_TEST_FRACTION must be in (0, 1), got {}",
                test_fraction
            );
        }

        Ok(Self {
            http_timeout_secs,
            trainer: TrainerConfig {
                seed,
                n_trees,
                test_fraction,
            },
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Invalid {}: '{}'", key, raw)),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e).with_context(|| format!("Invalid {}", key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        let config = ForecastConfig::from_env().unwrap();
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.trainer, TrainerConfig::default());
    }
}
