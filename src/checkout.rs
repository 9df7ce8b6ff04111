//! Cart checkout footer.
//!
//! One footer allows a single purchase confirmation at a time. `begin` and
//! `complete` are split so a caller sharing the footer can release it while the
//! network call is outstanding; the `Submitting` state is what keeps a second
//! confirmation out in the meantime.

use serde::Serialize;
use serde_json::Value;
use tracing::{event, Level};
use uuid::Uuid;

use crate::{
    client::PurchaseClient,
    context::ShopContext,
    domain::{cart_total, CartItem, CartSnapshot},
    error::{CheckoutError, ClientError, Ineligibility},
    navigation::{Navigator, Route},
    repositories::CartRepository,
};

pub const CONFIRM_LABEL: &str = "Confirm Purchase";
pub const PROCESSING_LABEL: &str = "Processing...";
pub const INSUFFICIENT_VOUCHERS: &str = "Insufficient vouchers!";
pub const PURCHASE_CONFIRMED: &str = "Purchase confirmed! The voucher amount has been deducted.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SubmissionState {
    Idle,
    Submitting,
}

/// A confirmation that has been started and awaits its network result.
#[derive(Debug)]
pub struct PendingPurchase {
    pub id: Uuid,
    pub snapshot: CartSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterView {
    pub total_cost_text: String,
    pub insufficient_vouchers: Option<String>,
    pub button_label: String,
    pub button_disabled: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

/// Eligibility predicate shared by rendering and submission.
pub fn eligibility(total_cost: i64, voucher_balance: i64, cart_empty: bool, state: SubmissionState) -> Result<(), Ineligibility> {
    if state == SubmissionState::Submitting {
        return Err(Ineligibility::SubmissionInFlight);
    }

    if cart_empty {
        return Err(Ineligibility::EmptyCart);
    }

    if total_cost > voucher_balance {
        return Err(Ineligibility::InsufficientVouchers);
    }

    Ok(())
}

#[derive(Debug)]
pub struct CheckoutFooter {
    state: SubmissionState,
    error: Option<String>,
    notice: Option<String>,
}

impl CheckoutFooter {
    pub fn new() -> Self {
        CheckoutFooter {
            state: SubmissionState::Idle,
            error: None,
            notice: None,
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub async fn is_disabled(&self, ctx: &ShopContext, total_cost: i64, voucher_balance: i64) -> bool {
        let cart_empty = ctx.cart.items().await.is_empty();
        eligibility(total_cost, voucher_balance, cart_empty, self.state).is_err()
    }

    pub async fn render(&self, ctx: &ShopContext, total_cost: i64, voucher_balance: i64) -> FooterView {
        let disabled = self.is_disabled(ctx, total_cost, voucher_balance).await;

        FooterView {
            total_cost_text: format!("Total cost: {} 💳", total_cost),
            insufficient_vouchers: if total_cost > voucher_balance {
                Some(INSUFFICIENT_VOUCHERS.to_string())
            } else {
                None
            },
            button_label: match self.state {
                SubmissionState::Submitting => PROCESSING_LABEL.to_string(),
                SubmissionState::Idle => CONFIRM_LABEL.to_string(),
            },
            button_disabled: disabled,
            error: self.error.clone(),
            notice: self.notice.clone(),
        }
    }

    /// Checks eligibility and snapshots the cart. Leaves the footer `Submitting`.
    pub async fn begin(&mut self, ctx: &ShopContext, total_cost: i64, voucher_balance: i64) -> Result<PendingPurchase, CheckoutError> {
        let items = ctx.cart.items().await;
        self.start(&items, total_cost, voucher_balance)
    }

    /// Like `begin`, but prices the same cart read that becomes the snapshot.
    pub async fn begin_from_cart(&mut self, ctx: &ShopContext, voucher_balance: i64) -> Result<PendingPurchase, CheckoutError> {
        let items = ctx.cart.items().await;

        match cart_total(&items) {
            Some(total_cost) => self.start(&items, total_cost, voucher_balance),
            None => {
                // an unpriceable cart is never affordable
                let reason = match self.state {
                    SubmissionState::Submitting => Ineligibility::SubmissionInFlight,
                    SubmissionState::Idle => Ineligibility::InsufficientVouchers,
                };
                event!(Level::WARN, "cart total overflowed, purchase rejected: {}", reason);
                Err(CheckoutError::Ineligible(reason))
            }
        }
    }

    fn start(&mut self, items: &[CartItem], total_cost: i64, voucher_balance: i64) -> Result<PendingPurchase, CheckoutError> {
        if let Err(reason) = eligibility(total_cost, voucher_balance, items.is_empty(), self.state) {
            event!(Level::INFO, "purchase rejected before submission: {}", reason);
            return Err(CheckoutError::Ineligible(reason));
        }

        let pending = PendingPurchase {
            id: Uuid::new_v4(),
            snapshot: CartSnapshot::capture(items),
        };

        self.state = SubmissionState::Submitting;
        self.error = None;
        self.notice = None;
        event!(Level::INFO, "submitting purchase {} with {} lines", pending.id, pending.snapshot.items().len());

        Ok(pending)
    }

    /// Applies the network result of `pending` and returns the footer to `Idle`.
    pub async fn complete(&mut self, ctx: &ShopContext, pending: PendingPurchase, result: Result<Value, ClientError>) -> Result<Value, CheckoutError> {
        self.state = SubmissionState::Idle;

        match result {
            Ok(payload) => {
                ctx.cart.clear().await;
                ctx.client.reset_store().await;
                self.notice = Some(PURCHASE_CONFIRMED.to_string());
                ctx.navigator.navigate(Route::LANDING);
                event!(Level::INFO, "purchase {} confirmed", pending.id);
                Ok(payload)
            },
            Err(e) => {
                event!(Level::WARN, "Error confirming purchase {}: {}", pending.id, e);
                self.error = Some(e.to_string());
                Err(CheckoutError::SubmissionFailed(e.to_string()))
            }
        }
    }

    pub async fn confirm(&mut self, ctx: &ShopContext, total_cost: i64, voucher_balance: i64) -> Result<Value, CheckoutError> {
        let pending = self.begin(ctx, total_cost, voucher_balance).await?;
        let result = ctx.client.confirm_purchase(&pending.snapshot).await;
        self.complete(ctx, pending, result).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    };

    use async_trait::async_trait;
    use serde_json::json;
    use tokio::sync::Mutex;

    use super::*;
    use crate::{
        domain::tests::product,
        navigation::HistoryNavigator,
        repositories::InMemoryCartRepository,
    };

    pub struct MockClient {
        pub fail: AtomicBool,
        pub submitted: Mutex<Vec<CartSnapshot>>,
        pub resets: AtomicUsize,
    }

    impl MockClient {
        pub fn new(fail: bool) -> Self {
            MockClient {
                fail: AtomicBool::new(fail),
                submitted: Mutex::new(Vec::new()),
                resets: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PurchaseClient for MockClient {
        async fn confirm_purchase(&self, snapshot: &CartSnapshot) -> Result<Value, ClientError> {
            self.submitted.lock().await.push(snapshot.clone());
            if self.fail.load(Ordering::SeqCst) {
                Err(ClientError::GraphQl(String::from("Not enough vouchers")))
            } else {
                Ok(json!(true))
            }
        }

        async fn reset_store(&self) {
            self.resets.fetch_add(1, Ordering::SeqCst);
        }
    }

    pub struct Fixture {
        pub ctx: ShopContext,
        pub cart: Arc<InMemoryCartRepository>,
        pub client: Arc<MockClient>,
        pub navigator: Arc<HistoryNavigator>,
    }

    pub fn fixture(fail: bool) -> Fixture {
        let cart = Arc::new(InMemoryCartRepository::new());
        let client = Arc::new(MockClient::new(fail));
        let navigator = Arc::new(HistoryNavigator::new());

        Fixture {
            ctx: ShopContext::new(cart.clone(), client.clone(), navigator.clone()),
            cart: cart,
            client: client,
            navigator: navigator,
        }
    }

    async fn fill_cart(cart: &InMemoryCartRepository, total: i64) {
        cart.add(CartItem { product: product("chips", total / 2), quantity: 2 }).await.unwrap();
    }

    #[test]
    fn disabled_iff_over_budget_empty_or_in_flight() {
        for total in [0, 99, 100, 101] {
            for empty in [false, true] {
                for state in [SubmissionState::Idle, SubmissionState::Submitting] {
                    let expected = total > 100 || empty || state == SubmissionState::Submitting;
                    assert_eq!(eligibility(total, 100, empty, state).is_err(), expected);
                }
            }
        }
    }

    #[tokio::test]
    async fn exact_balance_is_enabled_and_purchase_succeeds() {
        let f = fixture(false);
        fill_cart(&f.cart, 100).await;
        let mut footer = CheckoutFooter::new();

        let view = footer.render(&f.ctx, 100, 100).await;
        assert!(!view.button_disabled);
        assert_eq!(view.button_label, "Confirm Purchase");
        assert_eq!(view.insufficient_vouchers, None);

        footer.confirm(&f.ctx, 100, 100).await.unwrap();

        assert!(f.cart.items().await.is_empty());
        assert_eq!(f.client.resets.load(Ordering::SeqCst), 1);
        assert_eq!(f.navigator.history(), vec![Route::Dashboard]);
        assert_eq!(footer.notice(), Some(PURCHASE_CONFIRMED));
        assert_eq!(footer.state(), SubmissionState::Idle);
    }

    #[tokio::test]
    async fn over_budget_is_disabled_and_cannot_be_forced() {
        let f = fixture(false);
        fill_cart(&f.cart, 150).await;
        let mut footer = CheckoutFooter::new();

        let view = footer.render(&f.ctx, 150, 100).await;
        assert!(view.button_disabled);
        assert_eq!(view.insufficient_vouchers.as_deref(), Some("Insufficient vouchers!"));
        assert_eq!(view.total_cost_text, "Total cost: 150 💳");

        let result = footer.confirm(&f.ctx, 150, 100).await;
        assert!(matches!(result, Err(CheckoutError::Ineligible(Ineligibility::InsufficientVouchers))));
        assert!(f.client.submitted.lock().await.is_empty());
        assert_eq!(f.cart.items().await.len(), 1);
    }

    #[tokio::test]
    async fn empty_cart_is_disabled() {
        let f = fixture(false);
        let mut footer = CheckoutFooter::new();

        assert!(footer.render(&f.ctx, 0, 100).await.button_disabled);
        assert!(matches!(
            footer.confirm(&f.ctx, 0, 100).await,
            Err(CheckoutError::Ineligible(Ineligibility::EmptyCart))
        ));
    }

    #[tokio::test]
    async fn in_flight_submission_blocks_a_second_one() {
        let f = fixture(false);
        fill_cart(&f.cart, 40).await;
        let mut footer = CheckoutFooter::new();

        let pending = footer.begin(&f.ctx, 40, 100).await.unwrap();
        let view = footer.render(&f.ctx, 40, 100).await;
        assert!(view.button_disabled);
        assert_eq!(view.button_label, "Processing...");

        assert!(matches!(
            footer.begin(&f.ctx, 40, 100).await,
            Err(CheckoutError::Ineligible(Ineligibility::SubmissionInFlight))
        ));

        let result = f.ctx.client.confirm_purchase(&pending.snapshot).await;
        footer.complete(&f.ctx, pending, result).await.unwrap();

        assert_eq!(f.client.submitted.lock().await.len(), 1);
        assert_eq!(f.navigator.history().len(), 1);
    }

    #[tokio::test]
    async fn snapshot_ignores_edits_made_while_in_flight() {
        let f = fixture(false);
        fill_cart(&f.cart, 40).await;
        let mut footer = CheckoutFooter::new();

        let pending = footer.begin(&f.ctx, 40, 100).await.unwrap();
        f.cart.add(CartItem { product: product("soda", 5), quantity: 1 }).await.unwrap();

        assert_eq!(pending.snapshot.items().len(), 1);
        assert_eq!(cart_total(pending.snapshot.items()), Some(40));
    }

    #[tokio::test]
    async fn begin_from_cart_prices_the_snapshot_it_takes() {
        let f = fixture(false);
        fill_cart(&f.cart, 60).await;
        f.cart.add(CartItem { product: product("soda", 50), quantity: 1 }).await.unwrap();
        let mut footer = CheckoutFooter::new();

        // a stale total of 60 would pass, the cart as read costs 110
        assert!(footer.begin(&f.ctx, 60, 100).await.is_ok());
        footer.state = SubmissionState::Idle;

        assert!(matches!(
            footer.begin_from_cart(&f.ctx, 100).await,
            Err(CheckoutError::Ineligible(Ineligibility::InsufficientVouchers))
        ));
        assert_eq!(footer.state(), SubmissionState::Idle);

        let pending = footer.begin_from_cart(&f.ctx, 110).await.unwrap();
        assert_eq!(cart_total(pending.snapshot.items()), Some(110));
    }

    #[tokio::test]
    async fn failure_keeps_cart_and_re_enables() {
        let f = fixture(true);
        fill_cart(&f.cart, 60).await;
        let mut footer = CheckoutFooter::new();

        let result = footer.confirm(&f.ctx, 60, 100).await;
        assert!(matches!(result, Err(CheckoutError::SubmissionFailed(_))));

        let view = footer.render(&f.ctx, 60, 100).await;
        assert_eq!(view.error.as_deref(), Some("GraphQL error: Not enough vouchers"));
        assert!(!view.button_disabled);
        assert_eq!(view.button_label, "Confirm Purchase");
        assert_eq!(f.cart.items().await.len(), 1);
        assert_eq!(f.client.resets.load(Ordering::SeqCst), 0);
        assert!(f.navigator.history().is_empty());
        assert_eq!(f.client.submitted.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn retry_after_failure_clears_the_error() {
        let f = fixture(true);
        fill_cart(&f.cart, 60).await;
        let mut footer = CheckoutFooter::new();

        let _ = footer.confirm(&f.ctx, 60, 100).await;
        f.client.fail.store(false, Ordering::SeqCst);
        footer.confirm(&f.ctx, 60, 100).await.unwrap();

        assert_eq!(footer.error(), None);
        assert!(f.cart.items().await.is_empty());
    }
}
