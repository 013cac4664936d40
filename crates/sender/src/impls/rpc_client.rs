use crate::{Ledger, LedgerError, TokenBalance};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{hash::Hash, pubkey::Pubkey};

impl Ledger for RpcClient {
    type Error = LedgerError;

    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, Self::Error> {
        RpcClient::get_balance(self, owner).await.map_err(Into::into)
    }

    async fn get_token_balance(&self, token_account: &Pubkey) -> Result<TokenBalance, Self::Error> {
        let balance = self.get_token_account_balance(token_account).await?;
        let amount = balance.amount.parse::<u64>().map_err(|_| LedgerError::InvalidAmount {
            account: *token_account,
            amount: balance.amount.clone(),
        })?;
        Ok(TokenBalance::new(amount, balance.decimals))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, Self::Error> {
        RpcClient::get_latest_blockhash(self).await.map_err(Into::into)
    }
}
