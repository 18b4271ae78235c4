//! Layered server configuration: defaults, optional YAML file, environment

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use member_service::Config;
use serde::Deserialize;
use std::path::Path;

/// Environment variable prefix; nested keys are separated by `__`
pub const ENV_PREFIX: &str = "MEMBER_SERVER_";

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Address the HTTP listener binds to
    pub bind_addr: String,

    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,

    /// Members inserted at startup, spread over two teams; 0 disables seeding
    pub seed_members: u32,

    /// Member service module configuration
    pub member_service: Config,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            log_level: "member_service=info,member_server=info,tower_http=info,warn".to_string(),
            seed_members: 0,
            member_service: Config::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration, the YAML file overriding defaults and the
    /// environment overriding both
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = file {
            if !path.exists() {
                anyhow::bail!("config file not found: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("invalid server configuration")?;
        config
            .member_service
            .validate()
            .context("invalid member_service configuration")?;
        Ok(config)
    }
}
