//! Constants for local tests.

use crate::NetworkConstants;
use solana_sdk::{hash::Hash, pubkey::Pubkey};

/// Name of the test network.
pub const NAME: &str = "test";

/// Relay endpoint used when no mock relay address is supplied.
pub const RELAY_URL: &str = "http://127.0.0.1:8899/api/v1/";

/// Ledger endpoint used in tests.
pub const LEDGER_URL: &str = "http://127.0.0.1:8899";

/// Test token mint.
pub const TEST_MINT: Pubkey = Pubkey::new_from_array([0x89; 32]);

/// Test tip accounts, in the order the mock relay returns them.
pub const TEST_TIP_ACCOUNTS: [Pubkey; 3] = [
    Pubkey::new_from_array([0x91; 32]),
    Pubkey::new_from_array([0x92; 32]),
    Pubkey::new_from_array([0x93; 32]),
];

/// Blockhash served by mock ledgers.
pub const TEST_BLOCKHASH: Hash = Hash::new_from_array([0x42; 32]);

/// Network constants for local tests.
pub const TEST_NETWORK: NetworkConstants = NetworkConstants::new(NAME, RELAY_URL, LEDGER_URL);
