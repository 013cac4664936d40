mod error;
pub use error::ConfigError;

/// Helpers for loading configuration values from the environment.
pub mod env_utils;

use lander_constants::{
    NetworkConstants, DEFAULT_MAX_BACKOFF, DEFAULT_MAX_POLL_FAILURES, DEFAULT_POLL_INTERVAL,
    DEFAULT_REQUEST_TIMEOUT, MIN_POLL_INTERVAL,
};
use std::time::Duration;
use url::Url;

/// Environment variable holding the relay base URL.
pub const RELAY_URL: &str = "LANDER_RELAY_URL";
/// Environment variable holding the bundle simulation RPC URL.
pub const SIMULATION_URL: &str = "LANDER_SIMULATION_URL";
/// Environment variable holding the relay auth UUID.
pub const AUTH_UUID: &str = "LANDER_AUTH_UUID";
/// Environment variable holding the poll interval, in milliseconds.
pub const POLL_INTERVAL_MS: &str = "LANDER_POLL_INTERVAL_MS";
/// Environment variable holding the per-request timeout, in milliseconds.
pub const REQUEST_TIMEOUT_MS: &str = "LANDER_REQUEST_TIMEOUT_MS";
/// Environment variable holding the number of tolerated poll failures.
pub const MAX_POLL_FAILURES: &str = "LANDER_MAX_POLL_FAILURES";
/// Environment variable enabling simulation before submission.
pub const SIMULATE_FIRST: &str = "LANDER_SIMULATE_FIRST";

/// Configuration for a [`RelayClient`].
///
/// [`RelayClient`]: crate::RelayClient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    /// Base URL of the relay JSON-RPC API. Always ends in `/`.
    relay_url: Url,
    /// URL of a bundle-aware ledger RPC used for `simulateBundle`.
    simulation_url: Option<Url>,
    /// Value of the `x-jito-auth` header, if any.
    auth_uuid: Option<String>,
    /// Interval between two status polls.
    poll_interval: Duration,
    /// Timeout for each individual request.
    request_timeout: Duration,
    /// Upper bound on the delay between polls after failures.
    max_backoff: Duration,
    /// Consecutive transient poll failures tolerated before giving up.
    max_poll_failures: u32,
    /// Simulate bundles before sending them.
    simulate_first: bool,
}

impl RelayConfig {
    /// Create a config for the relay at `relay_url`, with default timings.
    pub fn new(relay_url: Url) -> Self {
        Self {
            relay_url: with_trailing_slash(relay_url),
            simulation_url: None,
            auth_uuid: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_backoff: DEFAULT_MAX_BACKOFF,
            max_poll_failures: DEFAULT_MAX_POLL_FAILURES,
            simulate_first: false,
        }
    }

    /// Create a config from a string URL.
    pub fn from_url(relay_url: &str) -> Result<Self, url::ParseError> {
        relay_url.parse().map(Self::new)
    }

    /// Create a config for a known network. Simulation targets the network's
    /// ledger RPC.
    pub fn for_network(network: NetworkConstants) -> Result<Self, url::ParseError> {
        let simulation_url = network.ledger_url().parse()?;
        Ok(Self::from_url(network.relay_url())?.with_simulation_url(simulation_url))
    }

    /// Load the config from the environment.
    ///
    /// [`RELAY_URL`] is required. Every other variable is optional and falls
    /// back to the defaults in [`lander_constants`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::new(env_utils::load_url(RELAY_URL)?);

        config.simulation_url = env_utils::load_url_opt(SIMULATION_URL)?;
        config.auth_uuid = env_utils::load_string_opt(AUTH_UUID);

        if let Some(ms) = env_utils::load_u64_opt(POLL_INTERVAL_MS)? {
            config = config.with_poll_interval(Duration::from_millis(ms));
        }
        if let Some(ms) = env_utils::load_u64_opt(REQUEST_TIMEOUT_MS)? {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(failures) = env_utils::load_u32_opt(MAX_POLL_FAILURES)? {
            config.max_poll_failures = failures;
        }
        if let Some(simulate_first) = env_utils::load_bool_opt(SIMULATE_FIRST)? {
            config.simulate_first = simulate_first;
        }

        Ok(config)
    }

    /// Set the simulation RPC URL.
    pub fn with_simulation_url(mut self, url: Url) -> Self {
        self.simulation_url = Some(url);
        self
    }

    /// Set the relay auth UUID, sent as the `x-jito-auth` header.
    pub fn with_auth_uuid(mut self, auth_uuid: impl Into<String>) -> Self {
        self.auth_uuid = Some(auth_uuid.into());
        self
    }

    /// Set the poll interval. Values below [`MIN_POLL_INTERVAL`] are raised
    /// to it.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Set the maximum backoff between polls.
    pub fn with_max_backoff(mut self, max_backoff: Duration) -> Self {
        self.max_backoff = max_backoff;
        self
    }

    /// Set the number of consecutive transient poll failures tolerated.
    pub fn with_max_poll_failures(mut self, max_poll_failures: u32) -> Self {
        self.max_poll_failures = max_poll_failures;
        self
    }

    /// Simulate bundles before sending them.
    pub fn with_simulate_first(mut self, simulate_first: bool) -> Self {
        self.simulate_first = simulate_first;
        self
    }

    /// Get the relay base URL.
    pub const fn relay_url(&self) -> &Url {
        &self.relay_url
    }

    /// Get the simulation RPC URL.
    pub const fn simulation_url(&self) -> Option<&Url> {
        self.simulation_url.as_ref()
    }

    /// Get the auth UUID.
    pub fn auth_uuid(&self) -> Option<&str> {
        self.auth_uuid.as_deref()
    }

    /// Get the poll interval.
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Get the per-request timeout.
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Get the maximum backoff between polls.
    pub const fn max_backoff(&self) -> Duration {
        self.max_backoff
    }

    /// Get the number of consecutive transient poll failures tolerated.
    pub const fn max_poll_failures(&self) -> u32 {
        self.max_poll_failures
    }

    /// True if bundles should be simulated before they are sent.
    pub const fn simulate_first(&self) -> bool {
        self.simulate_first
    }
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod test {
    use super::*;
    use lander_constants::KnownNetworks;

    #[test]
    fn base_url_gets_trailing_slash() {
        let config = RelayConfig::from_url("https://relay.example/api/v1").unwrap();
        assert_eq!(config.relay_url().as_str(), "https://relay.example/api/v1/");
        assert_eq!(
            config.relay_url().join("bundles").unwrap().as_str(),
            "https://relay.example/api/v1/bundles"
        );
    }

    #[test]
    fn network_config() {
        let config = RelayConfig::for_network(KnownNetworks::Mainnet.constants()).unwrap();
        assert_eq!(config.relay_url().as_str(), lander_constants::mainnet::RELAY_URL);
        assert_eq!(
            config.simulation_url().map(Url::as_str),
            Some("https://api.mainnet-beta.solana.com/")
        );
        assert_eq!(config.poll_interval(), DEFAULT_POLL_INTERVAL);
        assert!(!config.simulate_first());
    }

    #[test]
    fn poll_interval_has_a_floor() {
        let config = RelayConfig::from_url("https://relay.example/api/v1/").unwrap();
        assert_eq!(
            config.clone().with_poll_interval(Duration::ZERO).poll_interval(),
            MIN_POLL_INTERVAL
        );
        assert_eq!(
            config.clone().with_poll_interval(Duration::from_millis(1)).poll_interval(),
            MIN_POLL_INTERVAL
        );
        assert_eq!(
            config.with_poll_interval(Duration::from_millis(25)).poll_interval(),
            Duration::from_millis(25)
        );
    }

    // The only test in this crate that touches the process environment.
    #[test]
    fn load_from_env() {
        std::env::set_var(RELAY_URL, "http://127.0.0.1:9999/api/v1/");
        std::env::set_var(POLL_INTERVAL_MS, "250");
        std::env::set_var(MAX_POLL_FAILURES, "3");
        std::env::set_var(SIMULATE_FIRST, "TRUE");
        std::env::set_var(AUTH_UUID, "5f0c2d4e-0000-4000-8000-000000000000");

        let config = RelayConfig::from_env().unwrap();
        assert_eq!(config.relay_url().as_str(), "http://127.0.0.1:9999/api/v1/");
        assert_eq!(config.poll_interval(), Duration::from_millis(250));
        assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.max_poll_failures(), 3);
        assert!(config.simulate_first());
        assert_eq!(config.auth_uuid(), Some("5f0c2d4e-0000-4000-8000-000000000000"));
        assert_eq!(config.simulation_url(), None);

        std::env::set_var(SIMULATE_FIRST, "sometimes");
        assert!(matches!(RelayConfig::from_env(), Err(ConfigError::ParseBool(_))));

        std::env::set_var(SIMULATE_FIRST, "false");
        std::env::set_var(POLL_INTERVAL_MS, "0");
        assert_eq!(RelayConfig::from_env().unwrap().poll_interval(), MIN_POLL_INTERVAL);
    }
}
