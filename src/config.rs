//! Ambient configuration: a plain data struct the rest of the crate
//! consumes, built either from `kui-probe`'s parsed [`crate::cli::Args`]
//! or directly via [`ConfigBuilder`] in tests and benches.

use std::time::Duration;

use crate::cli::Args;

/// Tuning knobs for a [`crate::manager::KuiManager`].
#[derive(Debug, Clone)]
pub struct Config {
    terminal_read_timeout: Duration,
    user_read_timeout: Duration,
    lookahead_max: usize,
    log_filter: String,
    verbose: bool,
    stats_json: bool,
    otel_endpoint: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            terminal_read_timeout: Duration::from_millis(40),
            user_read_timeout: Duration::from_millis(1000),
            lookahead_max: 4096,
            log_filter: "info".to_string(),
            verbose: false,
            stats_json: false,
            otel_endpoint: None,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn terminal_read_timeout(&self) -> Duration {
        self.terminal_read_timeout
    }

    pub fn user_read_timeout(&self) -> Duration {
        self.user_read_timeout
    }

    pub fn lookahead_max(&self) -> usize {
        self.lookahead_max
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn stats_json(&self) -> bool {
        self.stats_json
    }

    pub fn otel_endpoint(&self) -> Option<&str> {
        self.otel_endpoint.as_deref()
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            terminal_read_timeout: Duration::from_millis(args.terminal_timeout_ms),
            user_read_timeout: Duration::from_millis(args.user_timeout_ms),
            lookahead_max: args.lookahead_max,
            log_filter: args.log_filter.clone(),
            verbose: args.verbose,
            stats_json: args.stats_json,
            otel_endpoint: if args.otel {
                args.otel_endpoint.clone()
            } else {
                None
            },
        }
    }
}

/// Builder used by tests, benches, and `kui-probe`'s own construction
/// path to avoid a long positional constructor.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    inner: Config,
}

impl ConfigBuilder {
    pub fn terminal_read_timeout(mut self, d: Duration) -> Self {
        self.inner.terminal_read_timeout = d;
        self
    }

    pub fn user_read_timeout(mut self, d: Duration) -> Self {
        self.inner.user_read_timeout = d;
        self
    }

    pub fn lookahead_max(mut self, n: usize) -> Self {
        self.inner.lookahead_max = n;
        self
    }

    pub fn log_filter(mut self, filter: impl Into<String>) -> Self {
        self.inner.log_filter = filter.into();
        self
    }

    pub fn verbose(mut self, v: bool) -> Self {
        self.inner.verbose = v;
        self
    }

    pub fn stats_json(mut self, v: bool) -> Self {
        self.inner.stats_json = v;
        self
    }

    pub fn otel_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.inner.otel_endpoint = Some(endpoint.into());
        self
    }

    pub fn build(self) -> Config {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let c = Config::default();
        assert!(c.lookahead_max() > 0);
        assert!(c.terminal_read_timeout() < c.user_read_timeout());
    }

    #[test]
    fn builder_overrides_fields() {
        let c = Config::builder().lookahead_max(16).verbose(true).build();
        assert_eq!(c.lookahead_max(), 16);
        assert!(c.verbose());
    }
}
