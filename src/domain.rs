use serde::{Deserialize, Serialize};

/// A voucher request as the backend reports it. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoucherRequest {
    pub request_id: String,
    pub user_name: String,
    pub task_description: String,
    pub voucher_amount: i64,
    pub request_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_date: Option<String>,
    pub status: String,
}

impl VoucherRequest {
    /// Case-insensitive exact match against a backend status string.
    pub fn has_status(&self, status: &str) -> bool {
        self.status.to_lowercase() == status.to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub tag: String,
    pub link: String,
    pub price: i64,
    pub quantity: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i64,
}

impl CartItem {
    /// `None` when price times quantity does not fit in an `i64`.
    pub fn line_cost(&self) -> Option<i64> {
        self.product.price.checked_mul(self.quantity)
    }
}

/// Owned copy of the cart lines taken when a purchase is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartSnapshot {
    items: Vec<CartItem>,
}

impl CartSnapshot {
    pub fn capture(items: &[CartItem]) -> Self {
        CartSnapshot {
            items: items
                .iter()
                .map(|item| CartItem {
                    product: Product {
                        name: item.product.name.clone(),
                        tag: item.product.tag.clone(),
                        link: item.product.link.clone(),
                        price: item.product.price,
                        quantity: item.product.quantity,
                        description: item.product.description.clone(),
                    },
                    quantity: item.quantity,
                })
                .collect(),
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sum of all line costs, `None` on overflow.
pub fn cart_total(items: &[CartItem]) -> Option<i64> {
    items
        .iter()
        .try_fold(0i64, |total, item| item.line_cost().and_then(|cost| total.checked_add(cost)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub fn product(name: &str, price: i64) -> Product {
        Product {
            name: name.to_string(),
            tag: "snacks".to_string(),
            link: format!("https://minimart.local/{}.png", name),
            price: price,
            quantity: 10,
            description: format!("{} from the minimart", name),
        }
    }

    pub fn request(id: usize, user: &str, task: &str, status: &str) -> VoucherRequest {
        VoucherRequest {
            request_id: format!("req-{}", id),
            user_name: user.to_string(),
            task_description: task.to_string(),
            voucher_amount: 10,
            request_date: "2024-03-01T10:00:00Z".to_string(),
            response_date: None,
            status: status.to_string(),
        }
    }

    #[test]
    fn cart_total_sums_price_times_quantity() {
        let items = vec![
            CartItem { product: product("chips", 20), quantity: 2 },
            CartItem { product: product("soda", 15), quantity: 4 },
        ];

        assert_eq!(cart_total(&items), Some(100));
        assert_eq!(cart_total(&[]), Some(0));
    }

    #[test]
    fn line_cost_overflow_is_detected() {
        let item = CartItem { product: product("gold", i64::MAX / 2 + 1), quantity: 2 };

        assert_eq!(item.line_cost(), None);
        assert_eq!(cart_total(&[item]), None);
    }

    #[test]
    fn total_overflow_across_lines_is_detected() {
        let items = vec![
            CartItem { product: product("gold", i64::MAX - 1), quantity: 1 },
            CartItem { product: product("silver", 2), quantity: 1 },
        ];

        assert_eq!(cart_total(&items), None);
    }

    #[test]
    fn snapshot_is_detached_from_live_cart() {
        let mut items = vec![CartItem { product: product("chips", 20), quantity: 2 }];
        let snapshot = CartSnapshot::capture(&items);

        items[0].quantity = 9;
        items[0].product.name = "renamed".to_string();
        items.push(CartItem { product: product("soda", 15), quantity: 1 });

        assert_eq!(snapshot.items().len(), 1);
        assert_eq!(snapshot.items()[0].quantity, 2);
        assert_eq!(snapshot.items()[0].product.name, "chips");
    }

    #[test]
    fn status_match_ignores_case() {
        let r = request(1, "ana", "clean shelves", "Approved");

        assert!(r.has_status("approved"));
        assert!(r.has_status("APPROVED"));
        assert!(!r.has_status("approve"));
    }

    #[test]
    fn voucher_request_uses_camel_case_wire_names() {
        let json = serde_json::json!({
            "requestId": "r1",
            "userName": "ana",
            "taskDescription": "stocktake",
            "voucherAmount": 25,
            "requestDate": "2024-03-01",
            "status": "pending"
        });

        let parsed: VoucherRequest = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.request_id, "r1");
        assert_eq!(parsed.response_date, None);
    }
}
