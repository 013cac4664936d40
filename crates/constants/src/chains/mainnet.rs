//! Constants for Solana mainnet-beta.

use crate::NetworkConstants;
use solana_sdk::{pubkey, pubkey::Pubkey};

/// Name of the network.
pub const NAME: &str = "mainnet-beta";

/// JSON-RPC endpoint of the mainnet block engine relay.
pub const RELAY_URL: &str = "https://mainnet.block-engine.jito.wtf/api/v1/";

/// Public ledger RPC endpoint.
pub const LEDGER_URL: &str = "https://api.mainnet-beta.solana.com";

/// USDC mint on mainnet-beta.
pub const USDC_MINT: Pubkey = pubkey!("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v");

/// Decimals of [`USDC_MINT`].
pub const USDC_DECIMALS: u8 = 6;

/// Network constants for mainnet-beta.
pub const MAINNET: NetworkConstants = NetworkConstants::new(NAME, RELAY_URL, LEDGER_URL);
