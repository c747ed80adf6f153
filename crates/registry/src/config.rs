use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

/// What happens to a table delivered while no consumer is bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum PendingPolicy {
    /// Keep only the most recent undelivered table. Older ones are dropped
    /// with a warning.
    #[default]
    LastWriteWins,
    /// Keep every undelivered table and flush them in arrival order.
    Queue,
}

impl PendingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingPolicy::LastWriteWins => "last-write-wins",
            PendingPolicy::Queue => "queue",
        }
    }
}

impl fmt::Display for PendingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PendingPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "last-write-wins" => Ok(PendingPolicy::LastWriteWins),
            "queue" => Ok(PendingPolicy::Queue),
            other => Err(Error::UnknownPolicy(other.to_string())),
        }
    }
}

/// Settings shared by the registry and the presentation helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub pending_policy: PendingPolicy,
    /// Base URL that relative implementor references are resolved against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl RegistryConfig {
    pub fn with_policy(mut self, policy: PendingPolicy) -> Self {
        self.pending_policy = policy;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Parses the configured base URL, if any.
    pub fn base_url(&self) -> Result<Option<Url>> {
        self.base_url
            .as_deref()
            .map(|raw| {
                Url::parse(raw).map_err(|source| Error::InvalidBaseUrl {
                    url: raw.to_string(),
                    source,
                })
            })
            .transpose()
    }
}
