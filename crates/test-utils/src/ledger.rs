//! A scripted in-memory [`Ledger`].
use lander_constants::test_utils::TEST_BLOCKHASH;
use lander_sender::{Ledger, TokenBalance};
use solana_sdk::{hash::Hash, pubkey::Pubkey};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

/// Errors returned by [`MockLedger`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockLedgerError {
    /// No balance was set for the account.
    #[error("account not found: {0}")]
    AccountNotFound(Pubkey),
}

#[derive(Debug)]
struct LedgerState {
    balances: HashMap<Pubkey, u64>,
    token_balances: HashMap<Pubkey, TokenBalance>,
    blockhash: Hash,
    blockhash_requests: usize,
}

/// A mock [`Ledger`] serving balances and a blockhash set by the test.
#[derive(Debug, Clone)]
pub struct MockLedger {
    state: Arc<Mutex<LedgerState>>,
}

impl Default for MockLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLedger {
    /// Create a new mock ledger returning [`TEST_BLOCKHASH`].
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                balances: HashMap::new(),
                token_balances: HashMap::new(),
                blockhash: TEST_BLOCKHASH,
                blockhash_requests: 0,
            })),
        }
    }

    /// Set the lamport balance of `owner`.
    pub fn with_balance(self, owner: Pubkey, lamports: u64) -> Self {
        self.state.lock().unwrap().balances.insert(owner, lamports);
        self
    }

    /// Set the balance of the token account at `account`.
    pub fn with_token_balance(self, account: Pubkey, balance: TokenBalance) -> Self {
        self.state.lock().unwrap().token_balances.insert(account, balance);
        self
    }

    /// Set the blockhash returned from now on.
    pub fn set_blockhash(&self, blockhash: Hash) {
        self.state.lock().unwrap().blockhash = blockhash;
    }

    /// Number of times the latest blockhash was requested.
    pub fn blockhash_requests(&self) -> usize {
        self.state.lock().unwrap().blockhash_requests
    }
}

impl Ledger for MockLedger {
    type Error = MockLedgerError;

    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, Self::Error> {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(owner)
            .copied()
            .ok_or(MockLedgerError::AccountNotFound(*owner))
    }

    async fn get_token_balance(&self, token_account: &Pubkey) -> Result<TokenBalance, Self::Error> {
        self.state
            .lock()
            .unwrap()
            .token_balances
            .get(token_account)
            .copied()
            .ok_or(MockLedgerError::AccountNotFound(*token_account))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Self::Error> {
        let mut state = self.state.lock().unwrap();
        state.blockhash_requests += 1;
        Ok(state.blockhash)
    }
}
