use crate::NetworkConstants;
use std::str::FromStr;

/// The list of known networks as a string.
const KNOWN_NETWORKS: &str = "mainnet, testnet";

/// Error type for parsing a network name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseNetworkError {
    /// The network name is not supported.
    #[error("network name {0} is not parseable. supported networks: {KNOWN_NETWORKS}")]
    NetworkNotSupported(String),
}

/// Networks with hard-coded relay and ledger endpoints.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KnownNetworks {
    /// Solana mainnet-beta.
    Mainnet,
    /// Solana testnet.
    Testnet,
    /// Local test network.
    #[cfg(any(test, feature = "test-utils"))]
    Test,
}

impl KnownNetworks {
    /// Get the constants for this network.
    pub const fn constants(self) -> NetworkConstants {
        match self {
            Self::Mainnet => crate::mainnet::MAINNET,
            Self::Testnet => crate::testnet::TESTNET,
            #[cfg(any(test, feature = "test-utils"))]
            Self::Test => crate::test_utils::TEST_NETWORK,
        }
    }
}

impl FromStr for KnownNetworks {
    type Err = ParseNetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            #[cfg(any(test, feature = "test-utils"))]
            "test" => Ok(Self::Test),
            "mainnet" | "mainnet-beta" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            _ => Err(ParseNetworkError::NetworkNotSupported(s)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_networks() {
        assert_eq!(" Mainnet-Beta ".parse::<KnownNetworks>().unwrap(), KnownNetworks::Mainnet);
        assert_eq!("testnet".parse::<KnownNetworks>().unwrap(), KnownNetworks::Testnet);
        assert_eq!(
            "devnet".parse::<KnownNetworks>().unwrap_err(),
            ParseNetworkError::NetworkNotSupported("devnet".to_string())
        );
    }

    #[test]
    fn constants_match_network() {
        assert_eq!(KnownNetworks::Mainnet.constants().name(), "mainnet-beta");
        assert_eq!(
            KnownNetworks::Testnet.constants().relay_url(),
            crate::testnet::RELAY_URL
        );
    }
}
