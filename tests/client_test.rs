//! Integration Tests - Marketplace Client Behavior
//!
//! Tests the client against mock ports: connection gating, profile
//! resolution, handle rebinding on network change, amount conversion at the
//! boundary, and the two-phase buy ordering. Uses mockall for trait mocking
//! and tokio::test for async tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use mockall::mock;
use mockall::Sequence;
use rust_decimal_macros::dec;

use mundo_market::domain::catalog::{Category, NewListing, RawItem, RawOrder};
use mundo_market::domain::error::{MarketError, TxPhase};
use mundo_market::domain::network::{NetworkProfile, ProfileTable};
use mundo_market::ports::ledger::{LedgerHandles, TxReceipt};
use mundo_market::ports::notify::{ProgressSink, TxProgress};
use mundo_market::ports::wallet::SessionState;
use mundo_market::usecases::MarketplaceClient;

// ---- Mock Definitions ----

mock! {
    pub Session {}

    #[async_trait::async_trait]
    impl mundo_market::ports::wallet::WalletSession for Session {
        fn state(&self) -> SessionState;
        async fn prompt_connect(&self);
        async fn request_chain_switch(&self, chain_id: u64);
    }
}

mock! {
    pub Ledger {}

    #[async_trait::async_trait]
    impl mundo_market::ports::ledger::MarketplaceLedger for Ledger {
        async fn owner(&self) -> anyhow::Result<String>;
        async fn list_item(&self, listing: &NewListing) -> anyhow::Result<TxReceipt>;
        async fn all_items(&self) -> anyhow::Result<Vec<RawItem>>;
        async fn item(&self, id: u64) -> anyhow::Result<Option<RawItem>>;
        async fn buy(&self, id: u64, payment_token: &str) -> anyhow::Result<TxReceipt>;
        async fn orders_for(&self, address: &str) -> anyhow::Result<Vec<RawOrder>>;
        async fn is_token_allowed(&self, token: &str) -> anyhow::Result<bool>;
        async fn allow_token(&self, token: &str) -> anyhow::Result<TxReceipt>;
    }
}

mock! {
    pub Token {}

    #[async_trait::async_trait]
    impl mundo_market::ports::ledger::PaymentToken for Token {
        async fn approve(&self, spender: &str, amount_atomic: u128) -> anyhow::Result<TxReceipt>;
    }
}

mock! {
    pub Factory {}

    #[async_trait::async_trait]
    impl mundo_market::ports::ledger::LedgerFactory for Factory {
        async fn bind(&self, profile: &NetworkProfile) -> anyhow::Result<LedgerHandles>;
    }
}

// ---- Helpers ----

const TESTNET: u64 = 44787;
const MAINNET: u64 = 42220;
const MARKETPLACE: &str = "0x4a7F6e1d54C4183b34c9b0DeD88c0C2c5f08eB10";
const TOKEN: &str = "0x874069Fa1Eb16D44d622F2e0Ca25eeA172369bC1";
const BUYER: &str = "0x1111111111111111111111111111111111111111";

fn profile(chain_id: u64, decimals: u32, symbol: &str) -> NetworkProfile {
    NetworkProfile {
        chain_id,
        decimals,
        currency_symbol: symbol.to_string(),
        rpc_url: "http://localhost:8545".to_string(),
        marketplace_address: MARKETPLACE.to_string(),
        payment_token_address: TOKEN.to_string(),
    }
}

fn table() -> ProfileTable {
    ProfileTable::new([profile(TESTNET, 6, "USDC"), profile(MAINNET, 18, "cKES")])
}

fn raw_item(id: u64, price_atomic: u128) -> RawItem {
    RawItem {
        id,
        name: format!("item-{id}"),
        category: "electronics".to_string(),
        image_url: "https://img.example/i.png".to_string(),
        price_atomic,
        rating: 0,
        stock: 5,
        description: "desc".to_string(),
    }
}

fn receipt(hash: &str) -> TxReceipt {
    TxReceipt {
        tx_hash: hash.to_string(),
        block_number: 42,
    }
}

fn connected_session(chain_id: u64) -> MockSession {
    let mut session = MockSession::new();
    session
        .expect_state()
        .returning(move || SessionState::connected(chain_id, BUYER));
    session
}

fn handles(ledger: MockLedger, token: MockToken) -> LedgerHandles {
    LedgerHandles {
        marketplace: Arc::new(ledger),
        payment_token: Arc::new(token),
    }
}

fn factory_returning(h: LedgerHandles) -> MockFactory {
    let mut factory = MockFactory::new();
    factory.expect_bind().returning(move |_| Ok(h.clone()));
    factory
}

fn client(session: MockSession, factory: MockFactory) -> MarketplaceClient {
    MarketplaceClient::new(Arc::new(session), Arc::new(factory), table())
}

/// Progress sink that records every stage for ordering assertions.
#[derive(Default)]
struct RecordingSink(Mutex<Vec<TxProgress>>);

impl ProgressSink for RecordingSink {
    fn progress(&self, stage: TxProgress) {
        self.0.lock().unwrap().push(stage);
    }
}

// ---- Connection Gating ----

#[tokio::test]
async fn ensure_ready_prompts_connect_when_disconnected() {
    let mut session = MockSession::new();
    session
        .expect_state()
        .returning(|| SessionState::default());
    session.expect_prompt_connect().times(1).returning(|| ());
    session.expect_request_chain_switch().times(0);

    let client = client(session, MockFactory::new());
    assert!(!client.ensure_ready().await);
}

#[tokio::test]
async fn ensure_ready_requests_switch_on_unsupported_chain() {
    let mut session = connected_session(1); // Ethereum mainnet, unsupported
    session.expect_prompt_connect().times(0);
    session
        .expect_request_chain_switch()
        .times(1)
        .withf(|&chain_id| chain_id == TESTNET)
        .returning(|_| ());

    let client = client(session, MockFactory::new());
    assert!(!client.ensure_ready().await);
}

#[tokio::test]
async fn ensure_ready_passes_on_supported_chain() {
    let mut session = connected_session(TESTNET);
    session.expect_prompt_connect().times(0);
    session.expect_request_chain_switch().times(0);

    let client = client(session, MockFactory::new());
    assert!(client.ensure_ready().await);
}

#[tokio::test]
async fn mutating_operation_aborts_when_disconnected() {
    let mut session = MockSession::new();
    session
        .expect_state()
        .returning(|| SessionState::default());
    session.expect_prompt_connect().returning(|| ());

    // Factory must never be reached without a usable session.
    let mut factory = MockFactory::new();
    factory.expect_bind().times(0);

    let client = client(session, factory);
    let err = client
        .list_item("hat", Category::Clothing, "https://img", "5", 1, "warm")
        .await
        .unwrap_err();
    assert!(matches!(err, MarketError::NotConnected));
}

// ---- Listing ----

#[tokio::test]
async fn list_item_converts_price_with_active_profile() {
    let mut ledger = MockLedger::new();
    ledger
        .expect_list_item()
        .times(1)
        .withf(|listing: &NewListing| {
            listing.price_atomic == 12_500_000 && listing.category == Category::Electronics
        })
        .returning(|_| Ok(receipt("0xlist")));

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, MockToken::new())),
    );

    let rec = client
        .list_item(
            "headphones",
            Category::Electronics,
            "https://img.example/h.png",
            "12.50",
            3,
            "wireless",
        )
        .await
        .unwrap();
    assert_eq!(rec.tx_hash, "0xlist");
}

#[tokio::test]
async fn list_item_with_bad_price_never_reaches_the_ledger() {
    let mut ledger = MockLedger::new();
    ledger.expect_list_item().times(0);

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, MockToken::new())),
    );

    for bad in ["ten", "-5", "1.0000001"] {
        let err = client
            .list_item("x", Category::Pets, "https://img", bad, 1, "d")
            .await
            .unwrap_err();
        assert!(matches!(err, MarketError::InvalidAmount(_)), "input {bad}");
    }
}

// ---- Catalog Reads ----

#[tokio::test]
async fn all_items_is_empty_without_a_profile() {
    let mut session = MockSession::new();
    session
        .expect_state()
        .returning(|| SessionState::default());

    let mut factory = MockFactory::new();
    factory.expect_bind().times(0);

    let client = client(session, factory);
    assert!(client.all_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn all_items_converts_atomic_prices_to_human_units() {
    let mut ledger = MockLedger::new();
    ledger.expect_all_items().returning(|| {
        Ok(vec![
            raw_item(1, 10_000_000),
            raw_item(2, 20_500_000),
            raw_item(3, 5_250_000),
        ])
    });

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, MockToken::new())),
    );

    let items = client.all_items().await.unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].price, dec!(10.00));
    assert_eq!(items[1].price, dec!(20.50));
    assert_eq!(items[2].price, dec!(5.25));
    // Ledger-reported order is preserved, not re-sorted.
    assert_eq!(
        items.iter().map(|i| i.id).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[tokio::test]
async fn all_items_on_empty_ledger_is_empty() {
    let mut ledger = MockLedger::new();
    ledger.expect_all_items().returning(|| Ok(Vec::new()));

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, MockToken::new())),
    );
    assert!(client.all_items().await.unwrap().is_empty());
}

#[tokio::test]
async fn missing_item_normalizes_to_not_found() {
    let mut ledger = MockLedger::new();
    // Revert on id 7, zeroed sentinel on id 8: same outcome.
    ledger
        .expect_item()
        .withf(|&id| id == 7)
        .returning(|_| Err(anyhow::anyhow!("execution reverted")));
    ledger.expect_item().withf(|&id| id == 8).returning(|_| {
        Ok(Some(RawItem {
            id: 0,
            name: String::new(),
            category: String::new(),
            image_url: String::new(),
            price_atomic: 0,
            rating: 0,
            stock: 0,
            description: String::new(),
        }))
    });

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, MockToken::new())),
    );

    for id in [7, 8] {
        let err = client.item(id).await.unwrap_err();
        assert!(matches!(err, MarketError::NotFound { .. }), "id {id}");
    }
}

// ---- Two-Phase Buy ----

#[tokio::test]
async fn buy_approves_exact_price_before_purchasing() {
    let mut seq = Sequence::new();

    let mut ledger = MockLedger::new();
    let mut token = MockToken::new();

    ledger
        .expect_item()
        .times(1)
        .in_sequence(&mut seq)
        .returning(|id| Ok(Some(raw_item(id, 20_500_000))));
    token
        .expect_approve()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|spender, amount| spender == MARKETPLACE && *amount == 20_500_000)
        .returning(|_, _| Ok(receipt("0xapprove")));
    ledger
        .expect_buy()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|&id, token_addr| id == 2 && token_addr == TOKEN)
        .returning(|_, _| Ok(receipt("0xbuy")));

    let sink = Arc::new(RecordingSink::default());
    let client = MarketplaceClient::new(
        Arc::new(connected_session(TESTNET)),
        Arc::new(factory_returning(handles(ledger, token))),
        table(),
    )
    .with_progress(Arc::clone(&sink) as Arc<dyn ProgressSink>);

    let rec = client.buy_item(2).await.unwrap();
    assert_eq!(rec.tx_hash, "0xbuy");
    assert_eq!(
        *sink.0.lock().unwrap(),
        vec![
            TxProgress::ApprovalPending,
            TxProgress::PurchasePending,
            TxProgress::Confirmed
        ]
    );
}

#[tokio::test]
async fn buy_never_purchases_when_approval_fails() {
    let mut ledger = MockLedger::new();
    let mut token = MockToken::new();

    ledger
        .expect_item()
        .returning(|id| Ok(Some(raw_item(id, 1_000_000))));
    token
        .expect_approve()
        .times(1)
        .returning(|_, _| Err(anyhow::anyhow!("user declined in wallet")));
    ledger.expect_buy().times(0);

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, token)),
    );

    let err = client.buy_item(1).await.unwrap_err();
    match err {
        MarketError::TransactionRejected { phase, .. } => assert_eq!(phase, TxPhase::Approval),
        other => panic!("expected TransactionRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn buy_reports_purchase_phase_on_late_failure() {
    let mut ledger = MockLedger::new();
    let mut token = MockToken::new();

    ledger
        .expect_item()
        .returning(|id| Ok(Some(raw_item(id, 1_000_000))));
    token
        .expect_approve()
        .returning(|_, _| Ok(receipt("0xapprove")));
    ledger
        .expect_buy()
        .returning(|_, _| Err(anyhow::anyhow!("execution reverted: out of stock")));

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, token)),
    );

    let err = client.buy_item(1).await.unwrap_err();
    match err {
        MarketError::TransactionRejected { phase, .. } => assert_eq!(phase, TxPhase::Purchase),
        other => panic!("expected TransactionRejected, got {other:?}"),
    }
}

#[tokio::test]
async fn buying_a_missing_item_is_not_found() {
    let mut ledger = MockLedger::new();
    let mut token = MockToken::new();
    ledger.expect_item().returning(|_| Ok(None));
    token.expect_approve().times(0);
    ledger.expect_buy().times(0);

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, token)),
    );
    assert!(matches!(
        client.buy_item(9).await.unwrap_err(),
        MarketError::NotFound { .. }
    ));
}

// ---- Orders ----

#[tokio::test]
async fn orders_convert_cost_and_timestamp() {
    let mut ledger = MockLedger::new();
    ledger
        .expect_orders_for()
        .withf(|address| address == BUYER)
        .returning(|_| {
            Ok(vec![RawOrder {
                timestamp_secs: 1_700_000_000,
                item: raw_item(4, 5_250_000),
            }])
        });

    let client = client(
        connected_session(TESTNET),
        factory_returning(handles(ledger, MockToken::new())),
    );

    let orders = client.my_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].placed_at.timestamp(), 1_700_000_000);
    assert_eq!(orders[0].item.price, dec!(5.25));
}

#[tokio::test]
async fn orders_are_empty_when_disconnected() {
    let mut session = MockSession::new();
    session
        .expect_state()
        .returning(|| SessionState::default());

    let client = client(session, MockFactory::new());
    assert!(client.my_orders().await.unwrap().is_empty());
}

// ---- Network Switch Rebinding ----

#[tokio::test]
async fn network_switch_rebinds_handles_and_decimals() {
    // Session whose chain id can move between calls.
    let live_chain = Arc::new(AtomicU64::new(TESTNET));
    let chain_for_session = Arc::clone(&live_chain);
    let mut session = MockSession::new();
    session.expect_state().returning(move || {
        SessionState::connected(chain_for_session.load(Ordering::SeqCst), BUYER)
    });

    // Testnet ledger: 10 USDC at 6 decimals.
    let mut testnet_ledger = MockLedger::new();
    testnet_ledger
        .expect_all_items()
        .returning(|| Ok(vec![raw_item(1, 10_000_000)]));
    // Mainnet ledger: 2 cKES at 18 decimals.
    let mut mainnet_ledger = MockLedger::new();
    mainnet_ledger
        .expect_all_items()
        .returning(|| Ok(vec![raw_item(1, 2_000_000_000_000_000_000)]));

    let testnet_handles = handles(testnet_ledger, MockToken::new());
    let mainnet_handles = handles(mainnet_ledger, MockToken::new());

    let mut factory = MockFactory::new();
    factory
        .expect_bind()
        .times(1)
        .withf(|p: &NetworkProfile| p.chain_id == TESTNET)
        .returning(move |_| Ok(testnet_handles.clone()));
    factory
        .expect_bind()
        .times(1)
        .withf(|p: &NetworkProfile| p.chain_id == MAINNET)
        .returning(move |_| Ok(mainnet_handles.clone()));

    let client = client(session, factory);

    let items = client.all_items().await.unwrap();
    assert_eq!(items[0].price, dec!(10));

    // Wallet switches networks between the two calls.
    live_chain.store(MAINNET, Ordering::SeqCst);

    let items = client.all_items().await.unwrap();
    assert_eq!(items[0].price, dec!(2));
}

#[tokio::test]
async fn repeat_calls_on_one_network_bind_once() {
    let mut ledger = MockLedger::new();
    ledger
        .expect_all_items()
        .times(2)
        .returning(|| Ok(Vec::new()));

    let h = handles(ledger, MockToken::new());
    let mut factory = MockFactory::new();
    factory
        .expect_bind()
        .times(1)
        .returning(move |_| Ok(h.clone()));

    let client = client(connected_session(TESTNET), factory);
    client.all_items().await.unwrap();
    client.all_items().await.unwrap();
}

// ---- Profile Resolution ----

#[tokio::test]
async fn resolve_profile_matches_documented_networks() {
    let client = client(connected_session(TESTNET), MockFactory::new());

    let testnet = client.resolve_profile(TESTNET).unwrap();
    assert_eq!(testnet.decimals, 6);
    assert_eq!(testnet.currency_symbol, "USDC");

    let mainnet = client.resolve_profile(MAINNET).unwrap();
    assert_eq!(mainnet.decimals, 18);
    assert_eq!(mainnet.currency_symbol, "cKES");

    assert!(client.resolve_profile(1).is_none());
}
