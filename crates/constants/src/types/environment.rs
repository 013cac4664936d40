/// Endpoints for one network.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NetworkConstants {
    /// Name of the network.
    name: &'static str,
    /// JSON-RPC endpoint of the block engine relay.
    relay_url: &'static str,
    /// Ledger RPC endpoint.
    ledger_url: &'static str,
}

impl NetworkConstants {
    /// Create a new set of network constants.
    pub const fn new(name: &'static str, relay_url: &'static str, ledger_url: &'static str) -> Self {
        Self { name, relay_url, ledger_url }
    }

    /// Get the hard-coded mainnet constants.
    pub const fn mainnet() -> Self {
        crate::chains::mainnet::MAINNET
    }

    /// Get the hard-coded testnet constants.
    pub const fn testnet() -> Self {
        crate::chains::testnet::TESTNET
    }

    /// Get the hard-coded local test constants.
    #[cfg(any(test, feature = "test-utils"))]
    pub const fn test() -> Self {
        crate::chains::test_utils::TEST_NETWORK
    }

    /// Get the network name.
    pub const fn name(&self) -> &str {
        self.name
    }

    /// Get the relay URL.
    pub const fn relay_url(&self) -> &str {
        self.relay_url
    }

    /// Get the ledger RPC URL.
    pub const fn ledger_url(&self) -> &str {
        self.ledger_url
    }
}
