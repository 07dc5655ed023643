mod commands;
mod config;
mod rpc;

use anyhow::Context;
use commands::{Command, ConsoleObserver};
use config::CliConfig;
use ev_chain_client::ChainClient;
use ev_market_core::Marketplace;
use ev_storage::RocksDbStore;
use rpc::RpcWallet;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = commands::parse(&args)?;
    if command == Command::Help {
        println!("{}", commands::USAGE);
        return Ok(());
    }

    let config = CliConfig::from_env()?;
    info!(rpc = %config.rpc_url, db = %config.db_path, chain = %config.chain.chain_id, "storefront console starting");

    let store = RocksDbStore::open_default(&config.db_path)
        .with_context(|| format!("failed to open catalog database at {}", config.db_path))?;
    let wallet = RpcWallet::new(config.rpc_url.clone());
    debug!(endpoint = wallet.endpoint(), "json-rpc wallet ready");
    let chain = ChainClient::new(Some(wallet), config.chain.clone());

    let market = Marketplace::new(chain, store, now_ms);
    market.set_observer(Rc::new(ConsoleObserver));

    let result = commands::run(&market, command).await;
    market.stop();
    result
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}
