/// Mainnet-beta constants.
pub mod mainnet;

/// Testnet constants.
pub mod testnet;

/// Local test constants.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
