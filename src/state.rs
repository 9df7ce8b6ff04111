use std::sync::Arc;

use crate::{
    cqrs::{
        AddProductToCartCommandHandler, ClearCartCommandHandler, ConfirmPurchaseCommandHandler, GetCartQueryHandler,
        GetRequestLogsQueryHandler, RemoveProductFromCartCommandHandler, ReplaceRequestsCommandHandler,
    },
    metrics::CheckoutMetrics,
};

#[derive(Clone)]
pub struct AppState {
    pub get_request_logs_query_handler: Arc<GetRequestLogsQueryHandler>,
    pub replace_requests_command_handler: Arc<ReplaceRequestsCommandHandler>,
    pub get_cart_query_handler: Arc<GetCartQueryHandler>,
    pub add_product_to_cart_command_handler: Arc<AddProductToCartCommandHandler>,
    pub remove_product_from_cart_command_handler: Arc<RemoveProductFromCartCommandHandler>,
    pub clear_cart_command_handler: Arc<ClearCartCommandHandler>,
    pub confirm_purchase_command_handler: Arc<ConfirmPurchaseCommandHandler>,
    pub checkout_metrics: CheckoutMetrics,
}
