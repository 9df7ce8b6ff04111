use std::sync::Mutex;

use serde::Serialize;
use tracing::{event, Level};

/// Pages of the minimart front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    Login,
    SignUp,
    Dashboard,
    Profile,
    TransactionHistory,
    VoucherRequest,
    Shop,
    Cart,
    Admin,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Login,
        Route::SignUp,
        Route::Dashboard,
        Route::Profile,
        Route::TransactionHistory,
        Route::VoucherRequest,
        Route::Shop,
        Route::Cart,
        Route::Admin,
    ];

    /// Where users land after a completed checkout.
    pub const LANDING: Route = Route::Dashboard;

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::SignUp => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::TransactionHistory => "/transaction-history",
            Route::VoucherRequest => "/voucher-request",
            Route::Shop => "/shop",
            Route::Cart => "/cart",
            Route::Admin => "/admin",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|r| r.path() == path)
    }
}

pub trait Navigator {
    fn navigate(&self, route: Route);
}

/// Records visited routes in order.
pub struct HistoryNavigator {
    history: Mutex<Vec<Route>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        HistoryNavigator {
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn history(&self) -> Vec<Route> {
        match self.history.lock() {
            Ok(h) => h.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn current(&self) -> Option<Route> {
        self.history().last().copied()
    }
}

impl Navigator for HistoryNavigator {
    fn navigate(&self, route: Route) {
        event!(Level::INFO, "navigating to {}", route.path());
        match self.history.lock() {
            Ok(mut h) => h.push(route),
            Err(poisoned) => poisoned.into_inner().push(route),
        }
    }
}
