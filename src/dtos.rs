use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{checkout::FooterView, domain::CartItem, logs::LogPage};

pub trait Response{}

impl Response for LogPage{}

#[derive(Serialize, Deserialize)]
pub struct ReplaceRequestsResponse {
    pub count: usize
}
impl Response for ReplaceRequestsResponse{}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<CartItem>,
    pub total_cost: i64,
}
impl Response for CartResponse{}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartFooterResponse {
    pub items: Vec<CartItem>,
    pub total_cost: i64,
    pub voucher_balance: i64,
    pub footer: FooterView,
}
impl Response for CartFooterResponse{}

#[derive(Serialize, Deserialize)]
pub struct ConfirmPurchaseResponse {
    pub confirmation: Value,
    pub notice: String,
    pub redirect: String,
}
impl Response for ConfirmPurchaseResponse{}

#[derive(Serialize, Deserialize)]
pub struct RouteEntry {
    pub name: String,
    pub path: String,
}

#[derive(Serialize, Deserialize)]
pub struct RouteTableResponse {
    pub routes: Vec<RouteEntry>
}
impl Response for RouteTableResponse{}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String
}
impl Response for ApiError{}
