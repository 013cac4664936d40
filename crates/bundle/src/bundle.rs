//! Lander bundle types.
use crate::AssemblyError;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use solana_sdk::{hash::Hash, signature::Signature, transaction::Transaction};

/// Wire encoding of the transactions in a bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionEncoding {
    /// Base-58, the relay's default.
    #[default]
    Base58,
    /// Base-64.
    Base64,
}

impl TransactionEncoding {
    /// The name of the encoding as used in relay requests.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base58 => "base58",
            Self::Base64 => "base64",
        }
    }

    /// Encode raw transaction bytes.
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base58 => bs58::encode(bytes).into_string(),
            Self::Base64 => BASE64_STANDARD.encode(bytes),
        }
    }

    /// Decode an encoded transaction into raw bytes.
    pub fn decode(&self, encoded: &str) -> Result<Vec<u8>, String> {
        match self {
            Self::Base58 => bs58::decode(encoded).into_vec().map_err(|e| e.to_string()),
            Self::Base64 => BASE64_STANDARD.decode(encoded).map_err(|e| e.to_string()),
        }
    }
}

impl core::fmt::Display for TransactionEncoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered, non-empty set of signed transactions, encoded for submission
/// to a relay.
///
/// All transactions share one blockhash, so they become valid together and
/// expire together. The relay executes them sequentially and includes them
/// atomically, but acceptance of the bundle does not mean every transaction
/// succeeds.
///
/// A bundle is immutable once encoded. When the blockhash goes stale, rebuild
/// the transactions and encode a new bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Encoded transactions, in execution order.
    transactions: Vec<String>,
    /// First signature of each transaction, in execution order.
    signatures: Vec<Signature>,
    /// The blockhash shared by all transactions.
    blockhash: Hash,
    /// The encoding of `transactions`.
    encoding: TransactionEncoding,
}

impl Bundle {
    /// Encode `transactions` as a base-58 bundle.
    pub fn new(transactions: &[Transaction]) -> Result<Self, AssemblyError> {
        Self::with_encoding(transactions, TransactionEncoding::default())
    }

    /// Encode `transactions` with the given encoding.
    ///
    /// Fails if the list is empty, if a transaction is not fully signed, or if
    /// the transactions do not all share the same blockhash.
    pub fn with_encoding(
        transactions: &[Transaction],
        encoding: TransactionEncoding,
    ) -> Result<Self, AssemblyError> {
        let first = transactions.first().ok_or(AssemblyError::EmptyBundle)?;
        let blockhash = first.message.recent_blockhash;

        let mut encoded = Vec::with_capacity(transactions.len());
        let mut signatures = Vec::with_capacity(transactions.len());

        for (index, tx) in transactions.iter().enumerate() {
            if tx.message.recent_blockhash != blockhash {
                return Err(AssemblyError::MixedBlockhash {
                    index,
                    expected: blockhash,
                    found: tx.message.recent_blockhash,
                });
            }
            let signature = match tx.signatures.first() {
                Some(signature) if tx.is_signed() => *signature,
                _ => return Err(AssemblyError::Unsigned { index }),
            };

            encoded.push(encoding.encode(&bincode::serialize(tx)?));
            signatures.push(signature);
        }

        Ok(Self { transactions: encoded, signatures, blockhash, encoding })
    }

    /// Returns the encoded transactions in this bundle.
    pub fn transactions(&self) -> &[String] {
        self.transactions.as_slice()
    }

    /// Returns the transaction ids (first signatures), in execution order.
    pub fn signatures(&self) -> &[Signature] {
        self.signatures.as_slice()
    }

    /// Returns the blockhash shared by all transactions.
    pub const fn blockhash(&self) -> Hash {
        self.blockhash
    }

    /// Returns the transaction encoding.
    pub const fn encoding(&self) -> TransactionEncoding {
        self.encoding
    }

    /// Number of transactions in the bundle. Never zero.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the bundle has no transactions. Encoded bundles never do.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Consume the bundle and return the encoded transactions.
    pub fn into_transactions(self) -> Vec<String> {
        self.transactions
    }

    /// Return an iterator over the decoded transactions in this bundle.
    pub fn decode_transactions(
        &self,
    ) -> impl Iterator<Item = Result<Transaction, AssemblyError>> + '_ {
        self.transactions.iter().enumerate().map(|(index, encoded)| {
            let bytes = self
                .encoding
                .decode(encoded)
                .map_err(|reason| AssemblyError::Decode { index, reason })?;
            bincode::deserialize(&bytes)
                .map_err(|e| AssemblyError::Decode { index, reason: e.to_string() })
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{build_transfer_transaction, Transfer};
    use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer, system_instruction};

    fn transfers(sender: &Keypair, blockhash: Hash, tip: Option<&Pubkey>) -> Vec<Transaction> {
        build_transfer_transaction(
            sender,
            &Pubkey::new_unique(),
            1_000,
            Transfer::Native,
            blockhash,
            tip,
        )
        .unwrap()
    }

    #[test]
    fn bundle_preserves_order() {
        let sender = Keypair::new();
        let blockhash = Hash::new_unique();
        let tip = Pubkey::new_unique();

        // Two assembler calls, the second carrying the tip.
        let mut txs = transfers(&sender, blockhash, None);
        txs.extend(transfers(&sender, blockhash, Some(&tip)));

        let bundle = Bundle::new(&txs).unwrap();
        assert_eq!(bundle.len(), 3);
        assert_eq!(bundle.blockhash(), blockhash);
        assert_eq!(bundle.encoding(), TransactionEncoding::Base58);

        let expected: Vec<_> = txs.iter().map(|tx| tx.signatures[0]).collect();
        assert_eq!(bundle.signatures(), expected.as_slice());

        let decoded: Vec<_> = bundle.decode_transactions().collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded, txs);
    }

    #[test]
    fn base64_bundle_decodes() {
        let sender = Keypair::new();
        let txs = transfers(&sender, Hash::new_unique(), Some(&Pubkey::new_unique()));

        let bundle = Bundle::with_encoding(&txs, TransactionEncoding::Base64).unwrap();
        assert_eq!(bundle.encoding().as_str(), "base64");

        let decoded: Vec<_> = bundle.decode_transactions().collect::<Result<_, _>>().unwrap();
        assert_eq!(decoded, txs);
    }

    #[test]
    fn empty_bundle_is_rejected() {
        assert!(matches!(Bundle::new(&[]), Err(AssemblyError::EmptyBundle)));
    }

    #[test]
    fn mixed_blockhash_is_rejected() {
        let sender = Keypair::new();
        let mut txs = transfers(&sender, Hash::new_unique(), None);
        let stale = Hash::new_unique();
        txs.extend(transfers(&sender, stale, None));

        match Bundle::new(&txs) {
            Err(AssemblyError::MixedBlockhash { index, found, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(found, stale);
            }
            other => panic!("expected mixed blockhash error, got {other:?}"),
        }
    }

    #[test]
    fn unsigned_transaction_is_rejected() {
        let sender = Keypair::new();
        let ix = system_instruction::transfer(&sender.pubkey(), &Pubkey::new_unique(), 1);
        let tx = Transaction::new_with_payer(&[ix], Some(&sender.pubkey()));

        assert!(matches!(Bundle::new(&[tx]), Err(AssemblyError::Unsigned { index: 0 })));
    }

    #[test]
    fn transaction_without_signatures_is_rejected() {
        let sender = Keypair::new();
        let blockhash = Hash::new_unique();
        let mut txs = transfers(&sender, blockhash, None);
        let mut empty = Transaction::default();
        empty.message.recent_blockhash = blockhash;
        txs.push(empty);

        let last = txs.len() - 1;
        assert!(matches!(Bundle::new(&txs), Err(AssemblyError::Unsigned { index }) if index == last));
        assert!(matches!(
            Bundle::new(&[Transaction::default()]),
            Err(AssemblyError::Unsigned { index: 0 })
        ));
    }

    #[test]
    fn garbage_fails_to_decode() {
        let sender = Keypair::new();
        let txs = transfers(&sender, Hash::new_unique(), None);
        let mut bundle = Bundle::new(&txs).unwrap();
        bundle.transactions[0] = "0OIl".to_string();

        let err = bundle.decode_transactions().next().unwrap().unwrap_err();
        assert!(matches!(err, AssemblyError::Decode { index: 0, .. }));
    }

    #[test]
    fn encoding_serde() {
        assert_eq!(serde_json::to_string(&TransactionEncoding::Base64).unwrap(), "\"base64\"");
        assert_eq!(
            serde_json::from_str::<TransactionEncoding>("\"base58\"").unwrap(),
            TransactionEncoding::Base58
        );
    }
}
