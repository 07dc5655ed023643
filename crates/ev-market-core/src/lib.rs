//! The storefront controller.
//!
//! [`Marketplace`] ties the wallet connection, the local catalog and the
//! visible notification together. Hosts (the browser UI, the native console)
//! construct one per application, drive it from their single-threaded
//! executor and redraw whenever the registered [`MarketObserver`] fires.

pub mod curation;
pub mod listing;
pub mod notify;
pub mod purchase;

use ev_api_types::{AssetListing, ListingDraft, MarketplaceStats, Notification, NotificationKind, SessionState, WalletAddress};
use ev_chain_client::{ChainClient, ChainError, WalletProvider, erc20};
use ev_storage::{CatalogError, CatalogStore, KeyValueStore};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use curation::{Curator, DEFAULT_SUGGESTED_PRICE};
pub use notify::Notifier;
pub use purchase::{PurchaseOutcome, PurchasePhase};

#[derive(Debug, Error)]
pub enum MarketError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Please connect wallet to list assets")]
    NotConnected,
    #[error("wallet connection already in progress")]
    ConnectInProgress,
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),
    #[error("storefront is stopped")]
    Stopped,
    #[error("wallet connection was cancelled")]
    ConnectCancelled,
}

/// Host hook for redraws. Called with no internal borrow held, so
/// implementations may read the marketplace freely.
pub trait MarketObserver {
    fn state_changed(&self);

    fn notified(&self, _notification: &Notification) {
        self.state_changed();
    }
}

pub struct Marketplace<P, S> {
    chain: ChainClient<P>,
    catalog: RefCell<CatalogStore<S>>,
    session: RefCell<SessionState>,
    notifier: Notifier,
    pending: RefCell<HashMap<String, PurchasePhase>>,
    running: Cell<bool>,
    generation: Cell<u64>,
    clock: Box<dyn Fn() -> u64>,
    curator: Option<Box<dyn Curator>>,
    observer: RefCell<Option<Rc<dyn MarketObserver>>>,
}

impl<P: WalletProvider, S: KeyValueStore> Marketplace<P, S> {
    /// Opens the catalog from `store` and starts in the running state.
    /// `clock` returns milliseconds since the Unix epoch.
    pub fn new(chain: ChainClient<P>, store: S, clock: impl Fn() -> u64 + 'static) -> Self {
        let catalog = CatalogStore::open(store, clock());
        Self {
            chain,
            catalog: RefCell::new(catalog),
            session: RefCell::new(SessionState::disconnected()),
            notifier: Notifier::default(),
            pending: RefCell::new(HashMap::new()),
            running: Cell::new(true),
            generation: Cell::new(0),
            clock: Box::new(clock),
            curator: None,
            observer: RefCell::new(None),
        }
    }

    pub fn with_curator(mut self, curator: impl Curator + 'static) -> Self {
        self.curator = Some(Box::new(curator));
        self
    }

    pub fn set_observer(&self, observer: Rc<dyn MarketObserver>) {
        *self.observer.borrow_mut() = Some(observer);
    }

    pub fn chain(&self) -> &ChainClient<P> {
        &self.chain
    }

    /// Stops the controller. Connect results still in flight are discarded
    /// when they arrive and no further observer callbacks are made.
    pub fn stop(&self) {
        self.running.set(false);
        self.cancel_connect();
        self.observer.borrow_mut().take();
        info!("storefront stopped");
    }

    pub fn session(&self) -> SessionState {
        self.session.borrow().clone()
    }

    pub fn listings(&self) -> Vec<AssetListing> {
        self.catalog.borrow().listings().to_vec()
    }

    pub fn listing(&self, id: &str) -> Option<AssetListing> {
        self.catalog.borrow().get(id).cloned()
    }

    pub fn stats(&self) -> MarketplaceStats {
        self.catalog.borrow().stats()
    }

    pub fn seller_wallet(&self) -> Option<String> {
        self.catalog.borrow().seller_wallet()
    }

    pub fn notification(&self) -> Option<Notification> {
        self.notifier.current()
    }

    pub fn purchase_phase(&self, id: &str) -> PurchasePhase {
        self.pending
            .borrow()
            .get(id)
            .copied()
            .unwrap_or(PurchasePhase::Idle)
    }

    pub fn has_curator(&self) -> bool {
        self.curator.is_some()
    }

    pub fn notify(&self, message: impl Into<String>, kind: NotificationKind) -> Notification {
        let notification = self.notifier.notify(message, kind);
        match kind {
            NotificationKind::Success => info!(seq = notification.seq, "{}", notification.message),
            NotificationKind::Error => warn!(seq = notification.seq, "{}", notification.message),
        }
        if let Some(observer) = self.observer() {
            observer.notified(&notification);
        }
        notification
    }

    /// Clears the visible notification if it is still `seq`.
    pub fn clear_notification(&self, seq: u64) -> bool {
        let cleared = self.notifier.clear_if_current(seq);
        if cleared {
            self.changed();
        }
        cleared
    }

    /// Connects the wallet and loads its balance. Failures reset the session
    /// and surface as an error notification.
    pub async fn connect_wallet(&self) -> Result<WalletAddress, MarketError> {
        if !self.running.get() {
            return Err(MarketError::Stopped);
        }
        if self.session.borrow().is_connecting() {
            debug!("connect ignored: already connecting");
            return Err(MarketError::ConnectInProgress);
        }

        let generation = self.generation.get();
        let previous = self.session();
        self.set_session(previous.begin_connect());

        let result = self.connect_and_read_balance().await;

        if self.generation.get() != generation {
            debug!("discarding superseded connect result");
            if !self.running.get() && self.session.borrow().is_connecting() {
                self.session.replace(previous);
            }
            self.unbind_stale_signer();
            return Err(if self.running.get() {
                MarketError::ConnectCancelled
            } else {
                MarketError::Stopped
            });
        }

        match result {
            Ok((address, balance)) => {
                let network_id = self.chain.config().network_id();
                self.set_session(SessionState::connected(address.as_str(), balance, network_id));
                self.notify("MetaMask Connected to Polygon", NotificationKind::Success);
                Ok(address)
            }
            Err(err) => {
                self.chain.disconnect();
                self.set_session(self.session().connect_failed());
                self.notify(err.to_string(), NotificationKind::Error);
                Err(err.into())
            }
        }
    }

    fn cancel_connect(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    /// Drops the signer when it no longer matches the session. A newer
    /// connect still in flight owns the signer and is left alone.
    fn unbind_stale_signer(&self) {
        let session = self.session();
        if session.is_connecting() {
            return;
        }
        let signer = self.chain.signer();
        if signer.as_ref().map(WalletAddress::as_str) != session.address() {
            self.chain.disconnect();
            if session.is_connected() {
                self.set_session(SessionState::disconnected());
            }
        }
    }

    async fn connect_and_read_balance(&self) -> Result<(WalletAddress, String), ChainError> {
        let address = self.chain.connect().await?;
        let balance = self.chain.get_balance(&address).await?;
        Ok((address, balance))
    }

    /// Wallet reported a new account list.
    pub async fn on_accounts_changed(&self, accounts: Vec<String>) {
        if !self.running.get() {
            return;
        }
        if accounts.is_empty() {
            info!("wallet reported no accounts; disconnecting");
            self.cancel_connect();
            self.chain.disconnect();
            self.set_session(SessionState::disconnected());
            return;
        }
        if let Err(err) = self.connect_wallet().await {
            debug!("reconnect after account change did not complete: {err}");
        }
    }

    /// Re-reads the token balance of the connected account.
    pub async fn refresh_balance(&self) -> Result<String, MarketError> {
        let address = self.session().address().map(|a| WalletAddress(a.to_owned())).ok_or(MarketError::NotConnected)?;
        let balance = self.chain.get_balance(&address).await?;

        // The account may have changed while the balance was in flight.
        if self.session().address() == Some(address.as_str()) {
            self.set_session(self.session().with_balance(balance.clone()));
        }
        Ok(balance)
    }

    /// Buys listing `id` with a token transfer to the platform address.
    ///
    /// The listing is removed only after the transfer is confirmed; every
    /// other outcome leaves the catalog untouched.
    pub async fn buy(&self, id: &str) -> PurchaseOutcome {
        let Some(listing) = self.listing(id) else {
            let message = "Asset no longer available";
            self.notify(message, NotificationKind::Error);
            return PurchaseOutcome::Failed(message.to_owned());
        };

        if self.pending.borrow().contains_key(id) {
            debug!(id, "purchase already in flight");
            return PurchaseOutcome::AlreadyPending;
        }

        if !self.session.borrow().is_connected() {
            self.advance(id, PurchasePhase::RequireConnect);
            let _ = self.connect_wallet().await;
            self.finish(id);
            return PurchaseOutcome::RequireConnect;
        }

        self.advance(id, PurchasePhase::Authorizing);
        self.notify(
            format!("Initiating Secure Transfer of {} ETHO...", listing.price),
            NotificationKind::Success,
        );

        let recipient = WalletAddress(self.chain.config().platform_address.clone());
        let receipt = match self.chain.submit_transfer(listing.price, &recipient).await {
            Ok(tx_hash) => {
                self.advance(id, PurchasePhase::Confirming);
                self.chain.confirm_transfer(tx_hash).await
            }
            Err(err) => Err(err),
        };

        let receipt = match receipt {
            Ok(receipt) => receipt,
            Err(err) => {
                self.advance(id, PurchasePhase::Failed);
                self.finish(id);
                let message = err.to_string();
                self.notify(message.clone(), NotificationKind::Error);
                return PurchaseOutcome::Failed(message);
            }
        };

        self.notify("Funds Secured. Minting NFT to Vault...", NotificationKind::Success);
        self.notify("Success! Asset acquired and NFT minted.", NotificationKind::Success);

        self.catalog.borrow_mut().remove(id);
        self.advance(id, PurchasePhase::Fulfilled);
        self.finish(id);

        if let Err(err) = self.refresh_balance().await {
            warn!("balance refresh after purchase failed: {err}");
        }
        self.changed();

        PurchaseOutcome::Fulfilled(receipt)
    }

    /// Lists a new asset for the connected seller.
    pub fn submit_listing(&self, draft: &ListingDraft) -> Result<AssetListing, MarketError> {
        let Some(seller) = self.session().address().map(ToOwned::to_owned) else {
            let err = MarketError::NotConnected;
            self.notify(err.to_string(), NotificationKind::Error);
            return Err(err);
        };

        let listing = {
            let mut catalog = self.catalog.borrow_mut();
            let mut id = listing::new_listing_id();
            while catalog.contains_id(&id) {
                id = listing::new_listing_id();
            }
            let listing = listing::build_listing(draft, &seller, (self.clock)(), id);
            catalog.append(listing.clone())?;
            listing
        };

        info!(id = %listing.id, price = listing.price, "asset listed");
        self.notify("Asset successfully listed for sale!", NotificationKind::Success);
        Ok(listing)
    }

    /// Records the seller's payout address. It is stored only and never
    /// used as a transfer recipient.
    pub fn save_seller_wallet(&self, wallet_address: &str) -> Result<(), MarketError> {
        let wallet_address = wallet_address.trim();
        if erc20::parse_address(wallet_address).is_err() {
            let err = MarketError::InvalidAddress(wallet_address.to_owned());
            self.notify(err.to_string(), NotificationKind::Error);
            return Err(err);
        }

        self.catalog.borrow().set_seller_wallet(wallet_address);
        self.notify("Withdrawal wallet updated!", NotificationKind::Success);
        Ok(())
    }

    /// Applies curator suggestions to `draft`. Without a curator the draft
    /// comes back unchanged.
    pub async fn curate(&self, draft: &ListingDraft) -> ListingDraft {
        match self.curator.as_deref() {
            Some(curator) => curation::curate_draft(curator, draft).await,
            None => draft.clone(),
        }
    }

    fn set_session(&self, session: SessionState) {
        *self.session.borrow_mut() = session;
        self.changed();
    }

    fn advance(&self, id: &str, next: PurchasePhase) {
        let mut pending = self.pending.borrow_mut();
        let current = pending.get(id).copied().unwrap_or(PurchasePhase::Idle);
        debug_assert!(current.can_advance_to(next), "{current:?} -> {next:?}");
        pending.insert(id.to_owned(), next);
        drop(pending);
        self.changed();
    }

    fn finish(&self, id: &str) {
        self.pending.borrow_mut().remove(id);
    }

    fn observer(&self) -> Option<Rc<dyn MarketObserver>> {
        self.observer.borrow().clone()
    }

    fn changed(&self) {
        if let Some(observer) = self.observer() {
            observer.state_changed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ev_chain_client::mock::MockWallet;
    use ev_chain_client::{ChainConfig, ProviderError};
    use ev_storage::{ASSETS_KEY, InMemoryStore, SELLER_WALLET_KEY};
    use serde_json::Value;

    const BUYER: &str = "0x3a2b000000000000000000000000000000000fe1";
    const NOW: u64 = 1_700_000_000_000;

    type TestMarket = Marketplace<Rc<MockWallet>, Rc<InMemoryStore>>;

    fn market(wallet: &Rc<MockWallet>, store: &Rc<InMemoryStore>) -> TestMarket {
        let chain = ChainClient::new(Some(wallet.clone()), ChainConfig::default());
        Marketplace::new(chain, store.clone(), || NOW)
    }

    fn wallet() -> Rc<MockWallet> {
        let wallet = Rc::new(MockWallet::new(vec![BUYER.to_owned()], "0x89"));
        wallet.set_balance("12500000000000000000");
        wallet
    }

    #[derive(Default)]
    struct Recorder {
        messages: RefCell<Vec<(String, NotificationKind)>>,
        redraws: Cell<u32>,
    }

    impl MarketObserver for Recorder {
        fn state_changed(&self) {
            self.redraws.set(self.redraws.get() + 1);
        }

        fn notified(&self, notification: &Notification) {
            self.messages
                .borrow_mut()
                .push((notification.message.clone(), notification.kind));
        }
    }

    fn assert_session_invariant(session: &SessionState) {
        if session.address().is_none() {
            assert_eq!(session.balance(), "0");
            assert_eq!(session.network_id(), None);
        }
    }

    #[tokio::test]
    async fn connect_sets_session_and_notifies() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());

        let address = market.connect_wallet().await.unwrap();
        let session = market.session();
        assert_eq!(address.as_str(), BUYER);
        assert_eq!(session.address(), Some(BUYER));
        assert_eq!(session.balance(), "12.5");
        assert_eq!(session.network_id(), Some("137"));
        assert!(!session.is_connecting());
        assert_eq!(market.notification().unwrap().message, "MetaMask Connected to Polygon");
    }

    #[tokio::test]
    async fn rejected_connect_resets_session() {
        let wallet = wallet();
        wallet.reject_accounts();
        let market = market(&wallet, &Rc::default());

        assert!(market.connect_wallet().await.is_err());
        let session = market.session();
        assert!(!session.is_connected());
        assert!(!session.is_connecting());
        assert_session_invariant(&session);

        let notification = market.notification().unwrap();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.contains("User rejected"));
    }

    #[tokio::test]
    async fn missing_provider_reports_metamask_not_found() {
        let chain: ChainClient<Rc<MockWallet>> = ChainClient::new(None, ChainConfig::default());
        let market = Marketplace::new(chain, Rc::new(InMemoryStore::default()), || NOW);

        assert!(matches!(
            market.connect_wallet().await,
            Err(MarketError::Chain(ChainError::ProviderUnavailable))
        ));
        assert_eq!(market.notification().unwrap().message, "MetaMask not found");
    }

    #[tokio::test]
    async fn buying_removes_listing_after_transfer() {
        let wallet = wallet();
        let store = Rc::new(InMemoryStore::default());
        let market = market(&wallet, &store);
        let recorder = Rc::new(Recorder::default());
        market.set_observer(recorder.clone());
        market.connect_wallet().await.unwrap();

        let id = market
            .listings()
            .into_iter()
            .find(|listing| listing.price == 450.0)
            .unwrap()
            .id;

        let outcome = market.buy(&id).await;
        assert!(matches!(outcome, PurchaseOutcome::Fulfilled(_)));

        let remaining = market.listings();
        assert_eq!(remaining.len(), 2);
        assert!(remaining.iter().all(|listing| listing.id != id));
        assert_eq!(market.purchase_phase(&id), PurchasePhase::Idle);

        let persisted: Vec<AssetListing> = serde_json::from_str(&store.get(ASSETS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, remaining);

        let messages: Vec<String> = recorder.messages.borrow().iter().map(|(m, _)| m.clone()).collect();
        assert_eq!(
            messages,
            vec![
                "MetaMask Connected to Polygon",
                "Initiating Secure Transfer of 450 ETHO...",
                "Funds Secured. Minting NFT to Vault...",
                "Success! Asset acquired and NFT minted.",
            ]
        );
    }

    #[tokio::test]
    async fn purchase_pays_the_platform_not_the_seller() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());
        market.connect_wallet().await.unwrap();
        let listing = market.listings().remove(0);

        market.buy(&listing.id).await;

        let calls = wallet.calls();
        let (_, params) = calls
            .iter()
            .find(|(method, _)| method == "eth_sendTransaction")
            .unwrap();
        let data = params[0]["data"].as_str().unwrap();
        assert!(data.contains("1a077de405dfd0e0f4faf447b4a8129c3fe9a3d0"));
        assert_eq!(params[0]["from"], Value::from(BUYER));
    }

    #[tokio::test]
    async fn buy_while_disconnected_only_connects() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());
        let id = market.listings()[0].id.clone();

        let outcome = market.buy(&id).await;

        assert_eq!(outcome, PurchaseOutcome::RequireConnect);
        assert_eq!(wallet.count("eth_requestAccounts"), 1);
        assert_eq!(wallet.count("eth_sendTransaction"), 0);
        assert_eq!(market.listings().len(), 3);
        assert!(market.session().is_connected());
        assert_eq!(market.purchase_phase(&id), PurchasePhase::Idle);
    }

    #[tokio::test]
    async fn declined_transfer_keeps_catalog() {
        let wallet = wallet();
        wallet.reject_transfer();
        let market = market(&wallet, &Rc::default());
        market.connect_wallet().await.unwrap();
        let before = market.listings();

        let outcome = market.buy(&before[1].id).await;

        let PurchaseOutcome::Failed(reason) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert!(reason.contains("User denied"));
        assert_eq!(market.listings(), before);
        assert_eq!(market.notification().unwrap().kind, NotificationKind::Error);
        assert_eq!(market.purchase_phase(&before[1].id), PurchasePhase::Idle);
    }

    #[tokio::test]
    async fn reverted_transfer_keeps_catalog() {
        let wallet = wallet();
        wallet.revert_transfer();
        let market = market(&wallet, &Rc::default());
        market.connect_wallet().await.unwrap();
        let before = market.listings();

        assert!(matches!(market.buy(&before[0].id).await, PurchaseOutcome::Failed(_)));
        assert_eq!(market.listings(), before);
    }

    #[tokio::test]
    async fn unknown_listing_is_reported() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());
        market.connect_wallet().await.unwrap();

        let outcome = market.buy("gone").await;
        assert_eq!(outcome, PurchaseOutcome::Failed("Asset no longer available".to_owned()));
        assert_eq!(wallet.count("eth_sendTransaction"), 0);
    }

    /// Yields to the executor before every request so two buys can interleave.
    struct YieldingWallet(Rc<MockWallet>);

    #[async_trait(?Send)]
    impl WalletProvider for YieldingWallet {
        async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
            tokio::task::yield_now().await;
            self.0.request(method, params).await
        }

        async fn delay(&self, millis: u32) {
            self.0.delay(millis).await
        }
    }

    #[tokio::test]
    async fn second_buy_of_same_listing_is_ignored() {
        let inner = wallet();
        let chain = ChainClient::new(Some(YieldingWallet(inner.clone())), ChainConfig::default());
        let market = Marketplace::new(chain, InMemoryStore::default(), || NOW);
        market.connect_wallet().await.unwrap();
        let id = market.listings()[0].id.clone();

        let (first, second) = tokio::join!(market.buy(&id), market.buy(&id));

        assert!(matches!(first, PurchaseOutcome::Fulfilled(_)));
        assert_eq!(second, PurchaseOutcome::AlreadyPending);
        assert_eq!(inner.count("eth_sendTransaction"), 1);
        assert_eq!(market.listings().len(), 2);
    }

    #[tokio::test]
    async fn empty_account_list_disconnects() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());
        market.connect_wallet().await.unwrap();

        market.on_accounts_changed(Vec::new()).await;

        let session = market.session();
        assert!(!session.is_connected());
        assert_session_invariant(&session);
        assert_eq!(market.chain().signer(), None);
    }

    #[tokio::test]
    async fn account_switch_reconnects() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());
        market.connect_wallet().await.unwrap();

        let other = "0x00000000000000000000000000000000000000b2";
        wallet.set_accounts(vec![other.to_owned()]);
        market.on_accounts_changed(vec![other.to_owned()]).await;

        assert_eq!(market.session().address(), Some(other));
        assert_eq!(wallet.count("eth_requestAccounts"), 2);
    }

    #[tokio::test]
    async fn connect_is_ignored_while_connecting() {
        let inner = wallet();
        let chain = ChainClient::new(Some(YieldingWallet(inner.clone())), ChainConfig::default());
        let market = Marketplace::new(chain, InMemoryStore::default(), || NOW);

        let (first, second) = tokio::join!(market.connect_wallet(), market.connect_wallet());

        assert!(first.is_ok());
        assert!(matches!(second, Err(MarketError::ConnectInProgress)));
        assert_eq!(inner.count("eth_requestAccounts"), 1);
    }

    #[tokio::test]
    async fn results_after_stop_are_discarded() {
        let inner = wallet();
        let chain = ChainClient::new(Some(YieldingWallet(inner.clone())), ChainConfig::default());
        let market = Marketplace::new(chain, InMemoryStore::default(), || NOW);

        let stop = async {
            tokio::task::yield_now().await;
            market.stop();
        };
        let (result, ()) = tokio::join!(market.connect_wallet(), stop);

        assert!(matches!(result, Err(MarketError::Stopped)));
        assert!(!market.session().is_connected());
        assert!(!market.session().is_connecting());
        assert_eq!(market.chain().signer(), None);
        assert!(market.notification().is_none());
        assert!(matches!(market.connect_wallet().await, Err(MarketError::Stopped)));
    }

    #[tokio::test]
    async fn revoking_accounts_cancels_connect_in_flight() {
        let inner = wallet();
        let chain = ChainClient::new(Some(YieldingWallet(inner.clone())), ChainConfig::default());
        let market = Marketplace::new(chain, InMemoryStore::default(), || NOW);

        let revoke = async {
            tokio::task::yield_now().await;
            market.on_accounts_changed(Vec::new()).await;
            assert!(!market.session().is_connected());
        };
        let (result, ()) = tokio::join!(market.connect_wallet(), revoke);

        assert!(matches!(result, Err(MarketError::ConnectCancelled)));
        let session = market.session();
        assert!(!session.is_connected());
        assert!(!session.is_connecting());
        assert_session_invariant(&session);
        assert_eq!(market.chain().signer(), None);
        assert!(market.notification().is_none());

        market.connect_wallet().await.unwrap();
        assert!(market.session().is_connected());
    }

    #[tokio::test]
    async fn listing_requires_a_connected_wallet() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());

        let draft = ListingDraft {
            name: "Orphan".to_owned(),
            price: "10".to_owned(),
            ..ListingDraft::default()
        };
        assert!(matches!(market.submit_listing(&draft), Err(MarketError::NotConnected)));
        assert_eq!(market.listings().len(), 3);
        assert_eq!(market.notification().unwrap().message, "Please connect wallet to list assets");
    }

    #[tokio::test]
    async fn submitted_listing_goes_first() {
        let wallet = wallet();
        let market = market(&wallet, &Rc::default());
        market.connect_wallet().await.unwrap();

        let draft = ListingDraft {
            name: "Neon Catalyst".to_owned(),
            description: "A glowing city".to_owned(),
            price: "abc".to_owned(),
            tags: "Tech, Blue, Minimal".to_owned(),
            image_url: None,
        };
        let listing = market.submit_listing(&draft).unwrap();

        assert_eq!(listing.seller, BUYER);
        assert_eq!(listing.price, ev_api_types::DEFAULT_LISTING_PRICE);
        assert_eq!(listing.tags, vec!["Tech", "Blue", "Minimal"]);
        assert_eq!(listing.created_at, NOW);
        assert_eq!(market.listings()[0], listing);
        assert_eq!(market.stats().items_listed, 4);
        assert_eq!(market.notification().unwrap().message, "Asset successfully listed for sale!");

        let second = market.submit_listing(&draft).unwrap();
        assert_ne!(second.id, listing.id);
    }

    #[tokio::test]
    async fn seller_wallet_is_validated_and_persisted() {
        let store = Rc::new(InMemoryStore::default());
        let market = market(&wallet(), &store);

        assert!(matches!(
            market.save_seller_wallet("not-an-address"),
            Err(MarketError::InvalidAddress(_))
        ));
        assert_eq!(store.get(SELLER_WALLET_KEY).unwrap(), None);

        market.save_seller_wallet(BUYER).unwrap();
        assert_eq!(market.seller_wallet().as_deref(), Some(BUYER));
        assert_eq!(market.notification().unwrap().message, "Withdrawal wallet updated!");
    }

    #[tokio::test]
    async fn stale_clear_keeps_newer_notification() {
        let market = market(&wallet(), &Rc::default());
        let first = market.notify("first", NotificationKind::Success);
        let second = market.notify("second", NotificationKind::Error);

        assert!(!market.clear_notification(first.seq));
        assert_eq!(market.notification(), Some(second.clone()));
        assert!(market.clear_notification(second.seq));
        assert!(market.notification().is_none());
    }

    #[tokio::test]
    async fn curate_without_curator_is_identity() {
        let market = market(&wallet(), &Rc::default());
        let draft = ListingDraft {
            name: "n".to_owned(),
            description: "d".to_owned(),
            ..ListingDraft::default()
        };
        assert!(!market.has_curator());
        assert_eq!(market.curate(&draft).await, draft);
    }
}
