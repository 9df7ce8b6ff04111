use std::sync::Arc;

use axum::{http::Method, routing::get};
use axum_prometheus::PrometheusMetricLayer;
use minimart::{
    checkout::CheckoutFooter,
    client::{GraphQlClient, GraphQlVoucherRequestRepository},
    config::Config,
    context::ShopContext,
    cqrs::{AddProductToCartCommandHandler, ClearCartCommandHandler, ConfirmPurchaseCommandHandler, GetCartQueryHandler, GetRequestLogsQueryHandler, RemoveProductFromCartCommandHandler, ReplaceRequestsCommandHandler},
    metrics::CheckoutMetrics,
    navigation::HistoryNavigator,
    repositories::{InMemoryCartRepository, InMemoryVoucherRequestRepository, VoucherRequestRepository},
    routes::router,
    state::AppState,
};
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{event, Level};
use dotenv::dotenv;

fn voucher_requests(config: &Config, client: Arc<GraphQlClient>) -> Arc<dyn VoucherRequestRepository + Send + Sync> {
    match &config.requests_path {
        Some(path) => match InMemoryVoucherRequestRepository::from_file(path) {
            Ok(repository) => Arc::new(repository),
            Err(e) => {
                event!(Level::WARN, "{}, starting with an empty request list", e);
                Arc::new(InMemoryVoucherRequestRepository::new(Vec::new()))
            }
        },
        None => Arc::new(GraphQlVoucherRequestRepository::new(client)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    let config = Config::load();

    tracing_subscriber::
    fmt()
    .with_max_level(tracing::Level::DEBUG)
    .with_target(false)
    .with_ansi(false)
    .json()
    .with_file(true)
    .with_line_number(true)
    .with_current_span(true)
    .with_writer(config.log_writer())
    .init();

    event!(Level::INFO, "config loaded: port {}, requests from {}, logs to {}",
        config.port,
        config.requests_path.as_deref().unwrap_or("GraphQL"),
        config.log_path.as_deref().unwrap_or("stdout"));

    let graphql_client = Arc::new(GraphQlClient::new(&config.graphql_uri));
    event!(Level::INFO, "using GraphQL endpoint {}", graphql_client.endpoint());

    let requests = voucher_requests(&config, graphql_client.clone());
    let ctx = ShopContext::new(
        Arc::new(InMemoryCartRepository::new()),
        graphql_client.clone(),
        Arc::new(HistoryNavigator::new()),
    );
    let footer = Arc::new(Mutex::new(CheckoutFooter::new()));
    let checkout_metrics = CheckoutMetrics::new()?;

    let state = Arc::new(AppState {
        get_request_logs_query_handler: Arc::new(GetRequestLogsQueryHandler::new(requests.clone())),
        replace_requests_command_handler: Arc::new(ReplaceRequestsCommandHandler::new(requests)),
        get_cart_query_handler: Arc::new(GetCartQueryHandler::new(ctx.clone(), footer.clone())),
        add_product_to_cart_command_handler: Arc::new(AddProductToCartCommandHandler::new(ctx.clone())),
        remove_product_from_cart_command_handler: Arc::new(RemoveProductFromCartCommandHandler::new(ctx.clone())),
        clear_cart_command_handler: Arc::new(ClearCartCommandHandler::new(ctx.clone())),
        confirm_purchase_command_handler: Arc::new(ConfirmPurchaseCommandHandler::new(ctx, footer, checkout_metrics.clone())),
        checkout_metrics: checkout_metrics,
    });

    let (prometheus_layer, metrics_handle) = PrometheusMetricLayer::pair();
    let metrics_state = state.clone();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    event!(Level::INFO, "listening on port {}", config.port);

    axum::serve(listener, router(state)
        .route("/metrics", get(|| async move {
            format!("{}{}", metrics_handle.render(), metrics_state.checkout_metrics.render())
        }))

        .layer(prometheus_layer)
        .layer(
            ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::very_permissive().allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]))
        )).await?;

    Ok(())
}
