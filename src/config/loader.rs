//! Environment overrides
//!
//! Variables are read from an iterator so tests can supply their own.

use super::Config;
use crate::utils::error::{OrchestratorError, Result};
use std::str::FromStr;
use tracing::debug;

/// Prefix of every override variable
pub const ENV_PREFIX: &str = "REGISTRY_BATCH_";

fn parse<T: FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| OrchestratorError::Config(format!("Invalid {}: {}", name, e)))
}

impl Config {
    /// Apply `DATABASE_URL` and `REGISTRY_BATCH_*` overrides
    pub fn with_env_overrides<I>(mut self, vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if name == "DATABASE_URL" {
                self.store.url = value;
                continue;
            }

            let Some(key) = name.strip_prefix(ENV_PREFIX) else {
                continue;
            };

            match key {
                "DATABASE_URL" => self.store.url = value,
                "MAX_CONNECTIONS" => self.store.max_connections = parse(&name, &value)?,
                "CLEAR_PAYLOADS" => self.store.clear_payloads_on_reset = parse(&name, &value)?,
                "MAX_CONCURRENCY" => self.dispatch.max_concurrency = parse(&name, &value)?,
                "REQUESTS_PER_SECOND" => {
                    self.dispatch.requests_per_second = Some(parse(&name, &value)?)
                }
                "BURST" => self.dispatch.burst = Some(parse(&name, &value)?),
                "REQUEST_TIMEOUT_MS" => {
                    self.dispatch.request_timeout_ms = Some(parse(&name, &value)?)
                }
                "REQUESTS_PER_BATCH" => self.driver.requests_per_batch = parse(&name, &value)?,
                "UNIT_SIZE" => self.driver.unit_size = parse(&name, &value)?,
                "FAILURE_RATE_THRESHOLD" => {
                    self.driver.failure_rate_threshold = parse(&name, &value)?
                }
                "MIN_UNIT_SIZE" => {
                    self.driver.min_unit_size_for_rate_check = parse(&name, &value)?
                }
                "BACKOFF_SECS" => self.driver.backoff_secs = parse(&name, &value)?,
                "UPDATE_MODE" => self.driver.update_mode = parse(&name, &value)?,
                "THREADS" => self.worker_pool.number_of_threads = parse(&name, &value)?,
                "LOG_LEVEL" => self.logging.level = value,
                "LOG_JSON" => self.logging.json = parse(&name, &value)?,
                _ => {
                    debug!("Ignoring unknown environment variable {}", name);
                    continue;
                }
            }
            debug!("Configuration override from {}", name);
        }

        Ok(self)
    }
}
