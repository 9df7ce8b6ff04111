//! GraphQL client for the minimart backend.
//!
//! Results of queries are kept in a store keyed by operation and variables so
//! repeated page loads do not refetch. The store is dropped wholesale after a
//! successful purchase.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tracing::{event, Level};

use crate::{domain::{CartSnapshot, VoucherRequest}, error::ClientError, repositories::VoucherRequestRepository};

pub const CONFIRM_SHOPPING_CART: &str = "mutation ConfirmShoppingCart($shoppingCart: [CartItemInput!]!) {
  confirmShoppingCart(shoppingCart: $shoppingCart)
}";

pub const GET_VOUCHER_REQUESTS: &str = "query GetVoucherRequests {
  voucherRequests {
    requestId
    userName
    taskDescription
    voucherAmount
    requestDate
    responseDate
    status
  }
}";

/// The network collaborator used by checkout.
#[async_trait]
pub trait PurchaseClient {
    async fn confirm_purchase(&self, snapshot: &CartSnapshot) -> Result<Value, ClientError>;
    async fn reset_store(&self);
}

pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    store: Mutex<HashMap<String, Value>>,
}

impl GraphQlClient {
    pub fn new(endpoint: &str) -> Self {
        GraphQlClient {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            store: Mutex::new(HashMap::new()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn execute(&self, operation: &str, variables: Value) -> Result<Value, ClientError> {
        let body = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "query": operation, "variables": variables }))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        extract_data(body)
    }

    /// Runs a query, serving it from the store when already fetched.
    pub async fn query<T: DeserializeOwned>(&self, operation: &str, variables: Value, field: &str) -> Result<T, ClientError> {
        let key = store_key(operation, &variables);

        let cached = self.store.lock().await.get(&key).cloned();
        let data = match cached {
            Some(data) => {
                event!(Level::DEBUG, "serving {} from store", field);
                data
            },
            None => {
                let data = self.execute(operation, variables).await?;
                self.store.lock().await.insert(key, data.clone());
                data
            }
        };

        select_field(data, field)
    }

    pub async fn stored_entries(&self) -> usize {
        self.store.lock().await.len()
    }
}

#[async_trait]
impl PurchaseClient for GraphQlClient {
    async fn confirm_purchase(&self, snapshot: &CartSnapshot) -> Result<Value, ClientError> {
        let data = self
            .execute(CONFIRM_SHOPPING_CART, json!({ "shoppingCart": snapshot }))
            .await?;

        select_field(data, "confirmShoppingCart")
    }

    async fn reset_store(&self) {
        let mut lock = self.store.lock().await;
        event!(Level::DEBUG, "resetting store with {} entries", lock.len());
        lock.clear();
    }
}

/// Voucher requests read through the GraphQL backend.
pub struct GraphQlVoucherRequestRepository {
    client: std::sync::Arc<GraphQlClient>,
}

impl GraphQlVoucherRequestRepository {
    pub fn new(client: std::sync::Arc<GraphQlClient>) -> Self {
        GraphQlVoucherRequestRepository { client: client }
    }
}

#[async_trait]
impl VoucherRequestRepository for GraphQlVoucherRequestRepository {
    async fn read_all(&self) -> Result<Vec<VoucherRequest>, String> {
        self.client
            .query(GET_VOUCHER_REQUESTS, json!({}), "voucherRequests")
            .await
            .map_err(|e| e.to_string())
    }

    async fn replace_all(&self, _requests: Vec<VoucherRequest>) -> Result<(), String> {
        Err(String::from("Voucher requests are owned by the backend and cannot be replaced"))
    }
}

fn store_key(operation: &str, variables: &Value) -> String {
    format!("{}|{}", operation, variables)
}

/// Splits a GraphQL response body into its data or its joined error messages.
fn extract_data(body: Value) -> Result<Value, ClientError> {
    if let Some(errors) = body.get("errors").and_then(Value::as_array) {
        if !errors.is_empty() {
            let message = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect::<Vec<&str>>()
                .join("; ");
            return Err(ClientError::GraphQl(message));
        }
    }

    match body.get("data") {
        Some(data) if !data.is_null() => Ok(data.clone()),
        _ => Err(ClientError::MalformedResponse(String::from("response has no data"))),
    }
}

fn select_field<T: DeserializeOwned>(data: Value, field: &str) -> Result<T, ClientError> {
    match data.get(field) {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| ClientError::MalformedResponse(format!("{}: {}", field, e))),
        None => Err(ClientError::MalformedResponse(format!("missing field {}", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_errors_become_client_errors() {
        let body = json!({ "data": null, "errors": [{ "message": "Not enough vouchers" }, { "message": "try later" }] });

        match extract_data(body) {
            Err(ClientError::GraphQl(msg)) => assert_eq!(msg, "Not enough vouchers; try later"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn missing_data_is_malformed() {
        assert!(matches!(extract_data(json!({})), Err(ClientError::MalformedResponse(_))));
    }

    #[test]
    fn selects_typed_field() {
        let data = extract_data(json!({ "data": { "confirmShoppingCart": true } })).unwrap();
        let confirmed: bool = select_field(data, "confirmShoppingCart").unwrap();

        assert!(confirmed);
    }

    #[tokio::test]
    async fn reset_store_drops_cached_results() {
        let client = GraphQlClient::new("http://localhost:4000/graphql");
        client
            .store
            .lock()
            .await
            .insert(store_key(GET_VOUCHER_REQUESTS, &json!({})), json!({ "voucherRequests": [] }));

        let cached: Vec<VoucherRequest> = client.query(GET_VOUCHER_REQUESTS, json!({}), "voucherRequests").await.unwrap();
        assert!(cached.is_empty());

        client.reset_store().await;
        assert_eq!(client.stored_entries().await, 0);
    }

    #[test]
    fn snapshot_serializes_as_plain_list() {
        let snapshot = CartSnapshot::capture(&[crate::domain::CartItem {
            product: crate::domain::tests::product("chips", 3),
            quantity: 2,
        }]);
        let variables = json!({ "shoppingCart": snapshot });

        assert_eq!(variables["shoppingCart"][0]["quantity"], 2);
        assert_eq!(variables["shoppingCart"][0]["product"]["name"], "chips");
    }
}
