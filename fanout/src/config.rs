//! Defaults applied by the registry and the callback probes.

use std::time::Duration;

/// Callback timeout in seconds given to subscriptions that set none.
pub const DEFAULT_TIME_OUT: i64 = 10;

/// Expected status when confirming deliveries by HTTP status.
pub const DEFAULT_CONFIRM_PATTERN: &str = "200";

/// Upper bound for a ping request or a telnet connect.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub default_time_out: i64,
    pub default_confirm_pattern: String,
    pub probe_timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            default_time_out: DEFAULT_TIME_OUT,
            default_confirm_pattern: DEFAULT_CONFIRM_PATTERN.to_owned(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: RegistryConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the callback timeout, in seconds, used when a subscription has none
    pub fn default_time_out(mut self, seconds: i64) -> Self {
        self.config.default_time_out = seconds;
        self
    }

    /// Set the status pattern used for `httpstatus` confirmation when empty
    pub fn default_confirm_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.config.default_confirm_pattern = pattern.into();
        self
    }

    /// Set the timeout of ping and telnet probes
    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.config.probe_timeout = timeout;
        self
    }

    pub fn build(self) -> RegistryConfig {
        self.config
    }
}
