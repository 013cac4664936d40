//! Constants for Solana testnet.

use crate::NetworkConstants;

/// Name of the network.
pub const NAME: &str = "testnet";

/// JSON-RPC endpoint of the testnet block engine relay.
pub const RELAY_URL: &str = "https://dallas.testnet.block-engine.jito.wtf/api/v1/";

/// Public ledger RPC endpoint.
pub const LEDGER_URL: &str = "https://api.testnet.solana.com";

/// Network constants for testnet.
pub const TESTNET: NetworkConstants = NetworkConstants::new(NAME, RELAY_URL, LEDGER_URL);
