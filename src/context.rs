use std::sync::Arc;

use crate::{client::PurchaseClient, navigation::Navigator, repositories::CartRepository};

/// Collaborators a page needs, handed in explicitly instead of read from globals.
#[derive(Clone)]
pub struct ShopContext {
    pub cart: Arc<dyn CartRepository + Send + Sync>,
    pub client: Arc<dyn PurchaseClient + Send + Sync>,
    pub navigator: Arc<dyn Navigator + Send + Sync>,
}

impl ShopContext {
    pub fn new(
        cart: Arc<dyn CartRepository + Send + Sync>,
        client: Arc<dyn PurchaseClient + Send + Sync>,
        navigator: Arc<dyn Navigator + Send + Sync>,
    ) -> ShopContext {
        ShopContext {
            cart: cart,
            client: client,
            navigator: navigator,
        }
    }
}
