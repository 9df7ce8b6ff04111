//! Voucher minimart front-end service: the admin request log viewer and the
//! cart checkout footer, served as JSON view models.

pub mod checkout;
pub mod client;
pub mod config;
pub mod context;
pub mod cqrs;
pub mod domain;
pub mod dtos;
pub mod error;
pub mod logs;
pub mod metrics;
pub mod navigation;
pub mod repositories;
pub mod routes;
pub mod state;
