//! Send two token transfers as one bundle and wait for it to land.
//!
//! ```sh
//! RUST_LOG=info cargo run -p lander-sender --example send_bundle -- \
//!     --keypair ~/.config/solana/id.json \
//!     --receiver <RECEIVER>
//! ```
//!
//! The tip is paid after the second transfer. Pass `--simulate` to simulate
//! the bundle before submitting it.
use clap::Parser;
use eyre::{eyre, WrapErr};
use lander_bundle::Transfer;
use lander_constants::{mainnet, KnownNetworks};
use lander_relay::{BundleState, RelayClient, RelayConfig};
use lander_sender::{BundleSender, SendOptions, TransferRequest};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{pubkey::Pubkey, signature::read_keypair_file, signer::Signer};
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Send a bundle of token transfers through a block engine relay")]
struct Args {
    /// Path to the sender's keypair file.
    #[arg(long, env = "LANDER_KEYPAIR")]
    keypair: PathBuf,

    /// The receiving wallet.
    #[arg(long)]
    receiver: Pubkey,

    /// The network to use.
    #[arg(long, default_value = "mainnet")]
    network: KnownNetworks,

    /// The mint of the transferred token.
    #[arg(long, default_value_t = mainnet::USDC_MINT)]
    mint: Pubkey,

    /// Amounts of the two transfers, in the token's smallest unit.
    #[arg(long, num_args = 1.., default_values_t = [10_000, 20_000])]
    amounts: Vec<u64>,

    /// Simulate the bundle before submitting it.
    #[arg(long)]
    simulate: bool,

    /// Seconds to wait for the bundle to land.
    #[arg(long, default_value_t = 120)]
    timeout: u64,

    /// Optional relay auth UUID.
    #[arg(long, env = "LANDER_AUTH_UUID")]
    auth_uuid: Option<String>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let signer = read_keypair_file(&args.keypair)
        .map_err(|e| eyre!("failed to read keypair {}: {e}", args.keypair.display()))?;
    let network = args.network.constants();

    let mut config = RelayConfig::for_network(network)?;
    if let Some(auth_uuid) = args.auth_uuid {
        config = config.with_auth_uuid(auth_uuid);
    }
    let relay = RelayClient::new(config)?;
    let ledger = RpcClient::new(network.ledger_url().to_string());

    let options = SendOptions::new()
        .with_confirm_timeout(Duration::from_secs(args.timeout))
        .with_simulate_first(args.simulate);
    let sender = BundleSender::new(signer, ledger, relay, options);

    println!("Network: {}", network.name());
    println!("Sender: {}", sender.signer().pubkey());

    let balances = sender.balances(Some(&args.mint)).await.wrap_err("failed to fetch balances")?;
    println!("SOL balance: {} lamports", balances.lamports);
    if let Some(token) = balances.token {
        println!("Token balance: {}", token.ui_amount());
    }

    let transfers: Vec<_> = args
        .amounts
        .iter()
        .map(|amount| TransferRequest::new(args.receiver, *amount, Transfer::token(args.mint)))
        .collect();

    let report = sender.send_transfers(&transfers).await?;
    println!("Bundle: {}", report.bundle_url());
    for url in report.transaction_urls() {
        println!("Transaction: {url}");
    }

    match report.status.state {
        BundleState::Confirmed => {
            println!("Bundle landed in slot {:?} after {:?}", report.status.slot, report.status.elapsed);
            Ok(())
        }
        BundleState::Failed => Err(eyre!("bundle failed: {:?}", report.status.err)),
        state => Err(eyre!("bundle did not land: {state} after {:?}", report.status.elapsed)),
    }
}
