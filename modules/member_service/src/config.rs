//! Configuration for member service module

use crate::domain::audit::{Auditing, FixedAuditor, NoAuditor, RandomAuditor};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    ZeroPageSize(&'static str),
}

/// Member service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Page size used when a request names none
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,

    /// Upper bound for requested page sizes; larger requests are clamped
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,

    /// Cache query results until the next mutation
    #[serde(default = "default_true")]
    pub result_cache: bool,

    /// Distinct cached queries per table
    #[serde(default = "default_cache_capacity")]
    pub result_cache_capacity: usize,

    /// Source of the created-by / last-modified-by audit columns
    #[serde(default)]
    pub auditor: AuditorConfig,
}

/// Auditor selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditorConfig {
    /// Random identifier per write
    #[default]
    Random,
    /// Leave the actor columns empty
    None,
    /// Always the given name
    Fixed(String),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            result_cache: true,
            result_cache_capacity: default_cache_capacity(),
            auditor: AuditorConfig::default(),
        }
    }
}

impl Config {
    /// Reject values that would make every paged request invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_page_size == 0 {
            return Err(ConfigError::ZeroPageSize("default_page_size"));
        }
        if self.max_page_size == 0 {
            return Err(ConfigError::ZeroPageSize("max_page_size"));
        }
        Ok(())
    }

    /// Auditing hooks for the configured auditor
    pub fn auditing(&self) -> Auditing {
        match &self.auditor {
            AuditorConfig::Random => Auditing::new(Arc::new(RandomAuditor)),
            AuditorConfig::None => Auditing::new(Arc::new(NoAuditor)),
            AuditorConfig::Fixed(name) => Auditing::new(Arc::new(FixedAuditor(name.clone()))),
        }
    }

    /// Effective per-table cache capacity; zero disables caching
    pub fn cache_capacity(&self) -> usize {
        if self.result_cache {
            self.result_cache_capacity
        } else {
            0
        }
    }

    /// Requested page size with defaults and the upper bound applied
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_page_size)
            .min(self.max_page_size)
    }
}

fn default_page_size() -> u64 {
    5
}

fn default_max_page_size() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    256
}
