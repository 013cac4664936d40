use crate::{AssemblyError, DerivationFailure};
use lander_constants::MINIMUM_TIP_LAMPORTS;
use solana_sdk::{
    hash::Hash, instruction::Instruction, pubkey::Pubkey, signer::Signer, system_instruction,
    transaction::Transaction,
};
use tracing::trace;

/// An SPL token transfer between the associated token accounts of the sender
/// and the receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenTransfer {
    /// The token mint.
    pub mint: Pubkey,
    /// The token program owning the mint.
    pub token_program: Pubkey,
    /// Allow owners that are program addresses rather than wallets.
    pub allow_owner_off_curve: bool,
}

impl TokenTransfer {
    /// A transfer of `mint` under the SPL token program, for wallet owners.
    pub const fn new(mint: Pubkey) -> Self {
        Self { mint, token_program: spl_token::ID, allow_owner_off_curve: false }
    }

    /// Set the token program.
    pub const fn with_token_program(mut self, token_program: Pubkey) -> Self {
        self.token_program = token_program;
        self
    }

    /// Allow or reject owners that are off the ed25519 curve.
    pub const fn allow_owner_off_curve(mut self, allow: bool) -> Self {
        self.allow_owner_off_curve = allow;
        self
    }

    fn address_for(&self, owner: &Pubkey) -> Result<Pubkey, AssemblyError> {
        if !self.allow_owner_off_curve && !owner.is_on_curve() {
            return Err(AssemblyError::AddressDerivation {
                owner: *owner,
                mint: self.mint,
                reason: DerivationFailure::OwnerOffCurve,
            });
        }
        associated_token_address(owner, &self.mint, &self.token_program)
    }
}

/// The asset moved by the primary transaction of a bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    /// Lamports, moved with the system program.
    Native,
    /// SPL tokens, moved between associated token accounts.
    Token(TokenTransfer),
}

impl Transfer {
    /// An SPL token transfer of `mint`.
    pub const fn token(mint: Pubkey) -> Self {
        Self::Token(TokenTransfer::new(mint))
    }

    fn instruction(
        &self,
        sender: &Pubkey,
        receiver: &Pubkey,
        amount: u64,
    ) -> Result<Instruction, AssemblyError> {
        match self {
            Self::Native => Ok(system_instruction::transfer(sender, receiver, amount)),
            Self::Token(token) => {
                let source = token.address_for(sender)?;
                let destination = token.address_for(receiver)?;
                spl_token::instruction::transfer(
                    &token.token_program,
                    &source,
                    &destination,
                    sender,
                    &[],
                    amount,
                )
                .map_err(Into::into)
            }
        }
    }
}

/// Derive the associated token address of `owner` for `mint`.
///
/// Unlike the SPL helper this never panics. It fails with
/// [`AssemblyError::AddressDerivation`] when no bump seed yields a valid
/// program address.
pub fn associated_token_address(
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey, AssemblyError> {
    Pubkey::try_find_program_address(
        &[owner.as_ref(), token_program.as_ref(), mint.as_ref()],
        &spl_associated_token_account::ID,
    )
    .map(|(address, _bump)| address)
    .ok_or(AssemblyError::AddressDerivation {
        owner: *owner,
        mint: *mint,
        reason: DerivationFailure::NoViableBump,
    })
}

/// The instruction paying the relay's minimum tip from `payer` to
/// `tip_account`.
pub fn tip_instruction(payer: &Pubkey, tip_account: &Pubkey) -> Instruction {
    system_instruction::transfer(payer, tip_account, MINIMUM_TIP_LAMPORTS)
}

/// Build a transaction paid for by `signer`, assign it `blockhash` and sign
/// it.
fn signed_transaction<S: Signer>(
    signer: &S,
    instructions: &[Instruction],
    blockhash: Hash,
) -> Result<Transaction, AssemblyError> {
    let mut tx = Transaction::new_with_payer(instructions, Some(&signer.pubkey()));
    tx.try_sign(&[signer], blockhash)?;
    Ok(tx)
}

/// Build the signed transactions moving `amount` from `sender` to
/// `receiver`.
///
/// Always produces exactly one transfer transaction. When `tip_account` is
/// given, a second transaction paying [`MINIMUM_TIP_LAMPORTS`] to it is
/// appended, so the tip always executes last. Every transaction uses
/// `blockhash`, has `sender` as fee payer, and is signed before being
/// returned.
///
/// The tip account must have been fetched from the relay for this submission
/// only, and `blockhash` must be fresh. Rebuild from scratch when either
/// changes.
pub fn build_transfer_transaction<S: Signer>(
    sender: &S,
    receiver: &Pubkey,
    amount: u64,
    transfer: Transfer,
    blockhash: Hash,
    tip_account: Option<&Pubkey>,
) -> Result<Vec<Transaction>, AssemblyError> {
    if amount == 0 {
        return Err(AssemblyError::ZeroAmount);
    }

    let payer = sender.try_pubkey()?;

    let transfer_ix = transfer.instruction(&payer, receiver, amount)?;
    let mut transactions = vec![signed_transaction(sender, &[transfer_ix], blockhash)?];

    if let Some(tip_account) = tip_account {
        let tip_ix = tip_instruction(&payer, tip_account);
        transactions.push(signed_transaction(sender, &[tip_ix], blockhash)?);
    }

    trace!(
        %payer,
        %receiver,
        amount,
        %blockhash,
        count = transactions.len(),
        "assembled transfer transactions"
    );

    Ok(transactions)
}
