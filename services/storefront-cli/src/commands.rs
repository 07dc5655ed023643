use anyhow::{Result, bail};
use ev_api_types::{ListingDraft, Notification, NotificationKind};
use ev_chain_client::WalletProvider;
use ev_market_core::{MarketObserver, Marketplace, PurchaseOutcome};
use ev_storage::KeyValueStore;

pub const USAGE: &str = "usage: storefront <command>

commands:
  list                               show the catalog, newest first
  stats                              item count, floor price and total value
  connect                            connect the node account and show the session
  balance                            connect and show the ETHO balance
  buy <id>                           buy a listing
  sell --name <n> [--description <d>] [--price <p>] [--tags <a,b>] [--image <url>]
                                     list a new asset for the connected account
  seller-wallet [<address>]          show or set the payout address";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Stats,
    Connect,
    Balance,
    Buy { id: String },
    Sell(ListingDraft),
    SellerWallet(Option<String>),
    Help,
}

pub fn parse(args: &[String]) -> Result<Command> {
    let Some((name, rest)) = args.split_first() else {
        return Ok(Command::Help);
    };

    let command = match name.as_str() {
        "list" => Command::List,
        "stats" => Command::Stats,
        "connect" => Command::Connect,
        "balance" => Command::Balance,
        "buy" => match rest {
            [id] => Command::Buy { id: id.clone() },
            _ => bail!("buy takes exactly one listing id"),
        },
        "sell" => Command::Sell(parse_draft(rest)?),
        "seller-wallet" => match rest {
            [] => Command::SellerWallet(None),
            [address] => Command::SellerWallet(Some(address.clone())),
            _ => bail!("seller-wallet takes at most one address"),
        },
        "help" | "-h" | "--help" => Command::Help,
        other => bail!("unknown command: {other}\n\n{USAGE}"),
    };
    Ok(command)
}

fn parse_draft(args: &[String]) -> Result<ListingDraft> {
    let mut draft = ListingDraft::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let Some(value) = iter.next() else {
            bail!("{flag} needs a value");
        };
        match flag.as_str() {
            "--name" => draft.name = value.clone(),
            "--description" => draft.description = value.clone(),
            "--price" => draft.price = value.clone(),
            "--tags" => draft.tags = value.clone(),
            "--image" => draft.image_url = Some(value.clone()),
            other => bail!("unknown sell option: {other}"),
        }
    }
    if draft.name.trim().is_empty() {
        bail!("sell needs --name");
    }
    Ok(draft)
}

/// Prints every notification the marketplace raises.
pub struct ConsoleObserver;

impl MarketObserver for ConsoleObserver {
    fn state_changed(&self) {}

    fn notified(&self, notification: &Notification) {
        match notification.kind {
            NotificationKind::Success => println!("✓ {}", notification.message),
            NotificationKind::Error => eprintln!("✗ {}", notification.message),
        }
    }
}

pub async fn run<P, S>(market: &Marketplace<P, S>, command: Command) -> Result<()>
where
    P: WalletProvider,
    S: KeyValueStore,
{
    match command {
        Command::Help => println!("{USAGE}"),
        Command::List => {
            for listing in market.listings() {
                println!(
                    "{:<34} {:>10} ETHO  {}  [{}]",
                    listing.id,
                    listing.price,
                    listing.name,
                    listing.tags.join(", ")
                );
            }
        }
        Command::Stats => {
            let stats = market.stats();
            println!("items listed: {}", stats.items_listed);
            match stats.floor_price {
                Some(floor) => println!("floor price:  {floor} ETHO"),
                None => println!("floor price:  -"),
            }
            println!("total value:  {} ETHO", stats.total_value);
        }
        Command::Connect => {
            market.connect_wallet().await?;
            let session = market.session();
            println!("address: {}", session.address().unwrap_or_default());
            println!("network: {}", session.network_id().unwrap_or_default());
        }
        Command::Balance => {
            market.connect_wallet().await?;
            println!("{} ETHO", market.session().balance());
        }
        Command::Buy { id } => {
            market.connect_wallet().await?;
            match market.buy(&id).await {
                PurchaseOutcome::Fulfilled(receipt) => {
                    println!("tx: {}", receipt.tx_hash);
                    println!("balance: {} ETHO", market.session().balance());
                }
                PurchaseOutcome::Failed(reason) => bail!(reason),
                outcome => bail!("purchase did not run: {outcome:?}"),
            }
        }
        Command::Sell(draft) => {
            market.connect_wallet().await?;
            let listing = market.submit_listing(&draft)?;
            println!("listed {} at {} ETHO", listing.id, listing.price);
        }
        Command::SellerWallet(None) => match market.seller_wallet() {
            Some(address) => println!("{address}"),
            None => println!("no payout address set"),
        },
        Command::SellerWallet(Some(address)) => market.save_seller_wallet(&address)?,
    }
    Ok(())
}
