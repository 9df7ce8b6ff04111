use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{event, Level};

use crate::{
    checkout::CheckoutFooter,
    client::PurchaseClient,
    context::ShopContext,
    domain::{cart_total, CartItem, Product, VoucherRequest},
    dtos::{CartFooterResponse, CartResponse, ConfirmPurchaseResponse, ReplaceRequestsResponse, Response},
    error::AppError,
    logs::{LogPage, RequestLogView},
    metrics::CheckoutMetrics,
    navigation::Route,
    repositories::{CartRepository, VoucherRequestRepository},
};

// traits
pub trait Command{}
pub trait Query{}

pub trait CommandHandler<C: Command, R: Response>{
    async fn handle(&self, input: &C) -> Result<R, AppError>;
}

pub trait QueryHandler<Q: Query, R: Response>{
    async fn handle(&self, input: Option<Q>) -> Result<R, AppError>;
}

#[derive(Serialize, Deserialize, Default)]
pub struct GetRequestLogsQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub page: Option<usize>,
}
impl Query for GetRequestLogsQuery{}

#[derive(Serialize, Deserialize)]
pub struct ReplaceRequestsCommand {
    pub requests: Vec<VoucherRequest>,
}
impl Command for ReplaceRequestsCommand{}

#[derive(Serialize, Deserialize)]
pub struct AddProductToCartCommand {
    pub product: Product,
    pub quantity: i64,
}
impl Command for AddProductToCartCommand{}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveProductFromCartCommand {
    pub product_name: String,
}
impl Command for RemoveProductFromCartCommand{}

#[derive(Serialize, Deserialize)]
pub struct ClearCartCommand{
}
impl Command for ClearCartCommand{}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCartQuery {
    #[serde(default)]
    pub balance: i64,
}
impl Query for GetCartQuery{}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPurchaseCommand {
    pub voucher_balance: i64,
}
impl Command for ConfirmPurchaseCommand{}

pub struct GetRequestLogsQueryHandler {
    requests: Arc<dyn VoucherRequestRepository + Send + Sync>,
}

impl GetRequestLogsQueryHandler {
    pub fn new(requests: Arc<dyn VoucherRequestRepository + Send + Sync>) -> Self {
        GetRequestLogsQueryHandler {
            requests: requests
        }
    }
}

impl QueryHandler<GetRequestLogsQuery, LogPage> for GetRequestLogsQueryHandler {
    async fn handle(&self, input_option: Option<GetRequestLogsQuery>) -> Result<LogPage, AppError> {
        let input = input_option.unwrap_or_default();

        if input.page == Some(0) {
            return Err(AppError::MalformedPayload(String::from("page starts at 1")));
        }

        let requests = self.requests.read_all().await.map_err(|e| {
            event!(Level::WARN, "Error occurred while loading voucher requests: {}", e);
            AppError::Internal(e)
        })?;

        let mut view = RequestLogView::new(requests);
        view.set_status(input.status);
        view.set_search(input.search.unwrap_or_default());
        view.go_to(input.page.unwrap_or(1));

        Ok(view.render())
    }
}

pub struct ReplaceRequestsCommandHandler {
    requests: Arc<dyn VoucherRequestRepository + Send + Sync>,
}

impl ReplaceRequestsCommandHandler {
    pub fn new(requests: Arc<dyn VoucherRequestRepository + Send + Sync>) -> Self {
        ReplaceRequestsCommandHandler {
            requests: requests
        }
    }
}

impl CommandHandler<ReplaceRequestsCommand, ReplaceRequestsResponse> for ReplaceRequestsCommandHandler {
    async fn handle(&self, input: &ReplaceRequestsCommand) -> Result<ReplaceRequestsResponse, AppError> {
        self.requests
            .replace_all(input.requests.clone())
            .await
            .map_err(AppError::Internal)?;

        event!(Level::INFO, "voucher request list replaced with {} entries", input.requests.len());
        Ok(ReplaceRequestsResponse {
            count: input.requests.len()
        })
    }
}

pub struct AddProductToCartCommandHandler {
    ctx: ShopContext,
}

impl AddProductToCartCommandHandler {
    pub fn new(ctx: ShopContext) -> Self {
        AddProductToCartCommandHandler {
            ctx: ctx
        }
    }
}

impl CommandHandler<AddProductToCartCommand, CartResponse> for AddProductToCartCommandHandler {
    async fn handle(&self, input: &AddProductToCartCommand) -> Result<CartResponse, AppError> {
        let item = CartItem {
            product: input.product.clone(),
            quantity: input.quantity,
        };

        let items = self.ctx.cart.add(item).await.map_err(|e| {
            event!(Level::WARN, "Error occurred while adding to cart: {}", e);
            AppError::MalformedPayload(e)
        })?;

        let total_cost = cart_total(&items)
            .ok_or_else(|| AppError::MalformedPayload(String::from("Cart total is too large")))?;

        Ok(CartResponse {
            items: items,
            total_cost: total_cost,
        })
    }
}

pub struct RemoveProductFromCartCommandHandler {
    ctx: ShopContext,
}

impl RemoveProductFromCartCommandHandler {
    pub fn new(ctx: ShopContext) -> Self {
        RemoveProductFromCartCommandHandler {
            ctx: ctx
        }
    }
}

impl CommandHandler<RemoveProductFromCartCommand, CartResponse> for RemoveProductFromCartCommandHandler {
    async fn handle(&self, input: &RemoveProductFromCartCommand) -> Result<CartResponse, AppError> {
        let items = self.ctx.cart.remove(&input.product_name).await.map_err(|e| {
            event!(Level::INFO, "Error occurred while removing from cart: {}", e);
            AppError::NotFound(e)
        })?;

        let total_cost = cart_total(&items)
            .ok_or_else(|| AppError::Internal(String::from("Cart total is too large")))?;

        Ok(CartResponse {
            items: items,
            total_cost: total_cost,
        })
    }
}

pub struct ClearCartCommandHandler {
    ctx: ShopContext,
}

impl ClearCartCommandHandler {
    pub fn new(ctx: ShopContext) -> Self {
        ClearCartCommandHandler {
            ctx: ctx
        }
    }
}

impl CommandHandler<ClearCartCommand, CartResponse> for ClearCartCommandHandler {
    async fn handle(&self, _input: &ClearCartCommand) -> Result<CartResponse, AppError> {
        self.ctx.cart.clear().await;

        Ok(CartResponse {
            items: Vec::new(),
            total_cost: 0,
        })
    }
}

pub struct GetCartQueryHandler {
    ctx: ShopContext,
    footer: Arc<Mutex<CheckoutFooter>>,
}

impl GetCartQueryHandler {
    pub fn new(ctx: ShopContext, footer: Arc<Mutex<CheckoutFooter>>) -> Self {
        GetCartQueryHandler {
            ctx: ctx,
            footer: footer,
        }
    }
}

impl QueryHandler<GetCartQuery, CartFooterResponse> for GetCartQueryHandler {
    async fn handle(&self, input_option: Option<GetCartQuery>) -> Result<CartFooterResponse, AppError> {
        let balance = input_option.map(|q| q.balance).unwrap_or(0);
        let items = self.ctx.cart.items().await;
        let total_cost = cart_total(&items)
            .ok_or_else(|| AppError::Internal(String::from("Cart total is too large")))?;

        let footer = self.footer.lock().await.render(&self.ctx, total_cost, balance).await;

        Ok(CartFooterResponse {
            items: items,
            total_cost: total_cost,
            voucher_balance: balance,
            footer: footer,
        })
    }
}

pub struct ConfirmPurchaseCommandHandler {
    ctx: ShopContext,
    footer: Arc<Mutex<CheckoutFooter>>,
    metrics: CheckoutMetrics,
}

impl ConfirmPurchaseCommandHandler {
    pub fn new(ctx: ShopContext, footer: Arc<Mutex<CheckoutFooter>>, metrics: CheckoutMetrics) -> Self {
        ConfirmPurchaseCommandHandler {
            ctx: ctx,
            footer: footer,
            metrics: metrics,
        }
    }
}

impl CommandHandler<ConfirmPurchaseCommand, ConfirmPurchaseResponse> for ConfirmPurchaseCommandHandler {
    async fn handle(&self, input: &ConfirmPurchaseCommand) -> Result<ConfirmPurchaseResponse, AppError> {
        // the footer lock is released while the mutation is outstanding
        let pending = {
            let mut footer = self.footer.lock().await;
            match footer.begin_from_cart(&self.ctx, input.voucher_balance).await {
                Ok(p) => p,
                Err(e) => {
                    self.metrics.record("rejected");
                    return Err(e.into());
                }
            }
        };

        let ctx = self.ctx.clone();
        let footer = self.footer.clone();
        let metrics = self.metrics.clone();

        // runs to completion even when the request is dropped, so the footer always leaves Submitting
        let submission = tokio::spawn(async move {
            let result = ctx.client.confirm_purchase(&pending.snapshot).await;

            let mut footer = footer.lock().await;
            match footer.complete(&ctx, pending, result).await {
                Ok(confirmation) => {
                    metrics.record("confirmed");
                    Ok(ConfirmPurchaseResponse {
                        confirmation: confirmation,
                        notice: footer.notice().unwrap_or_default().to_string(),
                        redirect: Route::LANDING.path().to_string(),
                    })
                },
                Err(e) => {
                    metrics.record("failed");
                    Err(AppError::Checkout(e))
                }
            }
        });

        submission.await.map_err(|e| {
            event!(Level::ERROR, "Purchase submission task failed: {}", e);
            AppError::Internal(e.to_string())
        })?
    }
}
