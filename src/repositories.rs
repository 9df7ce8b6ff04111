use std::{fs::read_to_string, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{event, Level};

use crate::domain::{cart_total, CartItem, VoucherRequest};

/// The shared cart state the shop pages mutate and checkout reads.
#[async_trait]
pub trait CartRepository {
    async fn items(&self) -> Vec<CartItem>;
    async fn add(&self, item: CartItem) -> Result<Vec<CartItem>, String>;
    async fn remove(&self, product_name: &str) -> Result<Vec<CartItem>, String>;
    async fn clear(&self);
}

/// Source of the voucher request list shown in the admin logs.
#[async_trait]
pub trait VoucherRequestRepository {
    async fn read_all(&self) -> Result<Vec<VoucherRequest>, String>;
    async fn replace_all(&self, requests: Vec<VoucherRequest>) -> Result<(), String>;
}

#[derive(Clone)]
pub struct InMemoryCartRepository {
    items: Arc<Mutex<Vec<CartItem>>>,
}

impl InMemoryCartRepository {
    pub fn new() -> Self {
        InMemoryCartRepository {
            items: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn items(&self) -> Vec<CartItem> {
        self.items.lock().await.clone()
    }

    async fn add(&self, item: CartItem) -> Result<Vec<CartItem>, String> {
        if item.product.name.is_empty() {
            return Err(String::from("Product name cannot be empty!"));
        }

        if item.product.price < 0 {
            return Err(format!("Price for {} cannot be negative", item.product.name));
        }

        if item.quantity <= 0 {
            return Err(format!("Quantity for {} must be positive", item.product.name));
        }

        let mut lock = self.items.lock().await;
        let mut updated = lock.clone();
        match updated.iter_mut().find(|i| i.product.name == item.product.name) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| format!("Quantity for {} is too large", item.product.name))?;
            },
            None => {
                updated.push(item);
            }
        }

        if cart_total(&updated).is_none() {
            return Err(String::from("Cart total is too large"));
        }

        *lock = updated;
        Ok(lock.clone())
    }

    async fn remove(&self, product_name: &str) -> Result<Vec<CartItem>, String> {
        let mut lock = self.items.lock().await;
        let before = lock.len();
        lock.retain(|i| i.product.name != product_name);

        if lock.len() == before {
            return Err(format!("Product {} is not in the cart", product_name));
        }

        Ok(lock.clone())
    }

    async fn clear(&self) {
        let mut lock = self.items.lock().await;
        lock.clear();
        event!(Level::DEBUG, "cart cleared");
    }
}

#[derive(Clone)]
pub struct InMemoryVoucherRequestRepository {
    requests: Arc<Mutex<Vec<VoucherRequest>>>,
}

impl InMemoryVoucherRequestRepository {
    pub fn new(requests: Vec<VoucherRequest>) -> Self {
        InMemoryVoucherRequestRepository {
            requests: Arc::new(Mutex::new(requests)),
        }
    }

    /// Seeds the repository from a JSON array of voucher requests.
    pub fn from_file(path: &str) -> Result<Self, String> {
        let raw = read_to_string(path)
            .map_err(|e| format!("Failed to read voucher requests from {}: {}", path, e))?;
        let requests: Vec<VoucherRequest> = serde_json::from_str(&raw)
            .map_err(|e| format!("Failed to parse voucher requests from {}: {}", path, e))?;

        event!(Level::INFO, "loaded {} voucher requests from {}", requests.len(), path);
        Ok(InMemoryVoucherRequestRepository::new(requests))
    }
}

#[async_trait]
impl VoucherRequestRepository for InMemoryVoucherRequestRepository {
    async fn read_all(&self) -> Result<Vec<VoucherRequest>, String> {
        Ok(self.requests.lock().await.clone())
    }

    async fn replace_all(&self, requests: Vec<VoucherRequest>) -> Result<(), String> {
        let mut lock = self.requests.lock().await;
        *lock = requests;
        Ok(())
    }
}
