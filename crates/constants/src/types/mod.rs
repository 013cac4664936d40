mod networks;
pub use networks::{KnownNetworks, ParseNetworkError};

mod environment;
pub use environment::NetworkConstants;
