//! Client configuration loaded from the environment.

use std::str::FromStr;

use review_core::{EngineConfig, InterleaveMode};

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Connection settings plus engine tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub engine: EngineConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            engine: EngineConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Load from process environment, reading a `.env` file first if present.
    ///
    /// Recognised keys: `SRS_BASE_URL`, `SRS_API_TOKEN`, `REVIEW_BATCH_LIMIT`,
    /// `REVIEW_REFILL_THRESHOLD`, `REVIEW_REQUEUE_MIN`, `REVIEW_REQUEUE_MAX`,
    /// `REVIEW_INTERLEAVE`, `REVIEW_SEED`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = value("SRS_BASE_URL") {
            config.base_url = url;
        }
        config.api_token = value("SRS_API_TOKEN");

        let engine = &mut config.engine;
        if let Some(raw) = value("REVIEW_BATCH_LIMIT") {
            engine.batch_limit = parse("REVIEW_BATCH_LIMIT", &raw)?;
        }
        if let Some(raw) = value("REVIEW_REFILL_THRESHOLD") {
            engine.refill_threshold = parse("REVIEW_REFILL_THRESHOLD", &raw)?;
        }
        if let Some(raw) = value("REVIEW_REQUEUE_MIN") {
            engine.requeue_min_offset = parse("REVIEW_REQUEUE_MIN", &raw)?;
        }
        if let Some(raw) = value("REVIEW_REQUEUE_MAX") {
            engine.requeue_max_offset = parse("REVIEW_REQUEUE_MAX", &raw)?;
        }
        if let Some(raw) = value("REVIEW_INTERLEAVE") {
            engine.interleave = InterleaveMode::from_str(&raw)?;
        }
        if let Some(raw) = value("REVIEW_SEED") {
            engine.seed = Some(parse("REVIEW_SEED", &raw)?);
        }

        config.engine.validate()?;
        Ok(config)
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| ClientError::InvalidEnv {
        key: key.to_string(),
        value: raw.to_string(),
    })
}
