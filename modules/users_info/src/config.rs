use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the users_info module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersInfoConfig {
    #[serde(default = "default_min_age")]
    pub min_age: u32,
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for UsersInfoConfig {
    fn default() -> Self {
        Self {
            min_age: default_min_age(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_min_age() -> u32 {
    18
}

fn default_page_size() -> u32 {
    3
}

fn default_max_page_size() -> u32 {
    1000
}

impl UsersInfoConfig {
    /// Build from the raw `modules.users_info` value; a missing section yields defaults.
    pub fn from_module_value(value: Option<&serde_json::Value>) -> anyhow::Result<Self> {
        let Some(value) = value else {
            return Ok(Self::default());
        };
        let config: Self = serde_json::from_value(value.clone())
            .map_err(|e| anyhow::anyhow!("Invalid users_info config: {e}"))?;
        if config.default_page_size == 0 || config.max_page_size == 0 {
            anyhow::bail!("Invalid users_info config: page sizes must be greater than 0");
        }
        Ok(config)
    }
}

impl From<UsersInfoConfig> for ServiceConfig {
    fn from(cfg: UsersInfoConfig) -> Self {
        Self {
            min_age: cfg.min_age,
            default_page_size: cfg.default_page_size,
            max_page_size: cfg.max_page_size,
        }
    }
}
