//! Pool configuration (TOML).
//!
//! ```toml
//! name = "web-pool"
//! desired_size = 3
//! victim_policy = "OLDEST"
//! reconcile_interval = "30s"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use fleet_planner::VictimSelectionPolicy;

const DEFAULT_RECONCILE_INTERVAL: &str = "30s";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Logical pool name, used in log fields.
    pub name: String,
    /// Initial desired size. Unset means the controller idles until told.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_size: Option<u32>,
    #[serde(default)]
    pub victim_policy: VictimSelectionPolicy,
    /// Time between reconciliation ticks, e.g. "30s" or "2m".
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval: String,
}

fn default_reconcile_interval() -> String {
    DEFAULT_RECONCILE_INTERVAL.to_string()
}

impl PoolConfig {
    /// A config with defaults for everything but the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desired_size: None,
            victim_policy: VictimSelectionPolicy::default(),
            reconcile_interval: default_reconcile_interval(),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: PoolConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            anyhow::bail!("pool name must not be empty");
        }
        self.reconcile_interval()?;
        Ok(())
    }

    /// The parsed reconcile interval. Always non-zero.
    pub fn reconcile_interval(&self) -> anyhow::Result<Duration> {
        let secs = parse_duration_secs(&self.reconcile_interval)?;
        if secs == 0 {
            anyhow::bail!("reconcile_interval must be greater than zero");
        }
        Ok(Duration::from_secs(secs))
    }
}

/// Parse a duration string like "30s", "5m" or "45" into seconds.
fn parse_duration_secs(s: &str) -> anyhow::Result<u64> {
    let s = s.trim();
    let (digits, multiplier) = if let Some(secs) = s.strip_suffix('s') {
        (secs, 1)
    } else if let Some(mins) = s.strip_suffix('m') {
        (mins, 60)
    } else {
        (s, 1)
    };
    let value: u64 = digits
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid duration {s:?}: {e}"))?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow::anyhow!("duration {s:?} is too large"))
}
