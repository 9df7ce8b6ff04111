use std::sync::Arc;

use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{delete, get, post}, Json, Router};
use serde_json::{json, Value};

use crate::{
    cqrs::{
        AddProductToCartCommand, ClearCartCommand, CommandHandler, ConfirmPurchaseCommand, GetCartQuery,
        GetRequestLogsQuery, QueryHandler, RemoveProductFromCartCommand, ReplaceRequestsCommand,
    },
    dtos::{ApiError, RouteEntry, RouteTableResponse},
    error::AppError,
    navigation::Route,
    state::AppState,
};

/// Page routes without the metrics and middleware layers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))

        .route("/admin/requests",
            get(get_request_logs)
            .put(replace_requests))

        .route("/cart",
            get(get_cart)
            .delete(clear_cart))

        .route("/cart/items", post(add_product_to_cart))

        .route("/cart/items/{name}", delete(remove_product_from_cart))

        .route("/cart/confirm", post(confirm_purchase))

        .with_state(state)
}

fn error_response(e: AppError) -> (StatusCode, Json<Value>) {
    (e.status_code(), Json(json!(ApiError{error: e.to_string()})))
}

pub async fn index() -> (StatusCode, Json<Value>) {
    let routes = Route::ALL
        .iter()
        .map(|r| RouteEntry {
            name: format!("{:?}", r),
            path: r.path().to_string(),
        })
        .collect();

    (StatusCode::OK, Json(json!(RouteTableResponse{routes: routes})))
}

pub async fn get_request_logs(Query(query): Query<GetRequestLogsQuery>, State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.get_request_logs_query_handler.handle(Some(query)).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(e) => error_response(e)
    }
}

pub async fn replace_requests(state: State<Arc<AppState>>, Json(replace_requests_command): Json<ReplaceRequestsCommand>) -> (StatusCode, Json<Value>) {
    match state.replace_requests_command_handler.handle(&replace_requests_command).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(e) => error_response(e)
    }
}

pub async fn get_cart(Query(query): Query<GetCartQuery>, State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.get_cart_query_handler.handle(Some(query)).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(e) => error_response(e)
    }
}

pub async fn add_product_to_cart(state: State<Arc<AppState>>, Json(add_product_to_cart_command): Json<AddProductToCartCommand>) -> (StatusCode, Json<Value>) {
    match state.add_product_to_cart_command_handler.handle(&add_product_to_cart_command).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(e) => error_response(e)
    }
}

pub async fn remove_product_from_cart(state: State<Arc<AppState>>, Path(name): Path<String>) -> (StatusCode, Json<Value>) {
    let command = RemoveProductFromCartCommand { product_name: name };
    match state.remove_product_from_cart_command_handler.handle(&command).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(e) => error_response(e)
    }
}

pub async fn clear_cart(state: State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    match state.clear_cart_command_handler.handle(&ClearCartCommand{}).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(e) => error_response(e)
    }
}

pub async fn confirm_purchase(state: State<Arc<AppState>>, Json(confirm_purchase_command): Json<ConfirmPurchaseCommand>) -> (StatusCode, Json<Value>) {
    match state.confirm_purchase_command_handler.handle(&confirm_purchase_command).await {
        Ok(response) => (StatusCode::OK, Json(json!(response))),
        Err(e) => error_response(e)
    }
}
