//! Deterministic keypairs for tests.
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::{keypair::keypair_from_seed, Signer},
};
use std::sync::LazyLock;

/// Test keypairs used in tests.
pub static TEST_KEYPAIRS: LazyLock<[Keypair; 4]> = LazyLock::new(|| {
    [
        keypair_from_seed(&[1u8; 32]).unwrap(),
        keypair_from_seed(&[2u8; 32]).unwrap(),
        keypair_from_seed(&[3u8; 32]).unwrap(),
        keypair_from_seed(&[4u8; 32]).unwrap(),
    ]
});

/// Test users used in tests. Pubkeys corresponding to [`TEST_KEYPAIRS`].
pub static TEST_USERS: LazyLock<[Pubkey; 4]> =
    LazyLock::new(|| TEST_KEYPAIRS.each_ref().map(|k| k.pubkey()));
