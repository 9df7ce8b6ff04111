//! Voucher request log viewer.
//!
//! Holds the request list handed down by the data layer and derives a filtered,
//! paginated table from it. The source list is never modified; every read
//! recomputes the view from the full list.

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::domain::VoucherRequest;

pub const PAGE_SIZE: usize = 5;

pub const TITLE: &str = "Voucher Requests Logs";
pub const SEARCH_PLACEHOLDER: &str = "Search by user name, task description, or request ID...";
pub const COLUMNS: [&str; 7] = [
    "Request ID",
    "User Name",
    "Task Description",
    "Voucher Amount",
    "Request Date",
    "Response Date",
    "Status",
];

/// Returns true when `request` passes both the status and the text filter.
pub fn matches(request: &VoucherRequest, search: &str, status: Option<&str>) -> bool {
    let matches_status = match status {
        Some(s) => request.has_status(s),
        None => true,
    };

    let needle = search.to_lowercase();
    let matches_search = needle.is_empty()
        || request.user_name.to_lowercase().contains(&needle)
        || request.task_description.to_lowercase().contains(&needle);

    matches_status && matches_search
}

pub fn total_pages(match_count: usize) -> usize {
    match_count.div_ceil(PAGE_SIZE).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRow {
    pub request_id: String,
    pub user_name: String,
    pub task_description: String,
    pub voucher_amount: String,
    pub request_date: String,
    pub response_date: String,
    pub status: String,
}

impl LogRow {
    fn from_request(request: &VoucherRequest) -> Self {
        LogRow {
            request_id: request.request_id.clone(),
            user_name: request.user_name.clone(),
            task_description: request.task_description.clone(),
            voucher_amount: format!("{} 💳", request.voucher_amount),
            request_date: format_date(&request.request_date),
            response_date: match &request.response_date {
                Some(d) => format_date(d),
                None => String::from("Pending"),
            },
            status: request.status.clone(),
        }
    }
}

/// Renders a backend timestamp as a calendar date, falling back to the raw text.
fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPage {
    pub title: String,
    pub search_placeholder: String,
    pub search: String,
    pub selected_status: Option<String>,
    pub status_options: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<LogRow>,
    pub match_count: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub page_label: String,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

#[derive(Debug, Clone)]
pub struct RequestLogView {
    requests: Vec<VoucherRequest>,
    search: String,
    current_page: usize,
    selected_status: Option<String>,
}

impl RequestLogView {
    pub fn new(requests: Vec<VoucherRequest>) -> Self {
        RequestLogView {
            requests: requests,
            search: String::new(),
            current_page: 1,
            selected_status: None,
        }
    }

    /// Swaps in a freshly fetched list. Filter and page state are kept.
    pub fn replace_requests(&mut self, requests: Vec<VoucherRequest>) {
        self.requests = requests;
    }

    pub fn requests(&self) -> &[VoucherRequest] {
        &self.requests
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selected_status(&self) -> Option<&str> {
        self.selected_status.as_deref()
    }

    /// The stored page index. May exceed `total_pages()` after a search change.
    pub fn stored_page(&self) -> usize {
        self.current_page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    pub fn set_status(&mut self, status: Option<String>) {
        self.selected_status = status.filter(|s| !s.is_empty());
        self.current_page = 1;
    }

    pub fn filtered(&self) -> Vec<&VoucherRequest> {
        self.requests
            .iter()
            .filter(|r| matches(r, &self.search, self.selected_status.as_deref()))
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered().len())
    }

    /// The page actually shown: the stored page clamped into `[1, total_pages]`.
    pub fn current_page(&self) -> usize {
        self.current_page.clamp(1, self.total_pages())
    }

    pub fn prev_disabled(&self) -> bool {
        self.current_page() == 1
    }

    pub fn next_disabled(&self) -> bool {
        self.current_page() == self.total_pages()
    }

    pub fn prev(&mut self) {
        if !self.prev_disabled() {
            self.current_page = self.current_page() - 1;
        }
    }

    pub fn next(&mut self) {
        if !self.next_disabled() {
            self.current_page = self.current_page() + 1;
        }
    }

    /// Jumps to `page`, clamped into the valid range.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    pub fn page_rows(&self) -> Vec<&VoucherRequest> {
        let start = (self.current_page() - 1) * PAGE_SIZE;
        self.filtered().into_iter().skip(start).take(PAGE_SIZE).collect()
    }

    /// Distinct statuses found in the source list, first-seen order.
    pub fn status_options(&self) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for request in self.requests.iter() {
            if !options.iter().any(|o| request.has_status(o)) {
                options.push(request.status.clone());
            }
        }
        options
    }

    pub fn render(&self) -> LogPage {
        let match_count = self.filtered().len();
        let current_page = self.current_page();
        let total_pages = total_pages(match_count);

        LogPage {
            title: TITLE.to_string(),
            search_placeholder: SEARCH_PLACEHOLDER.to_string(),
            search: self.search.clone(),
            selected_status: self.selected_status.clone(),
            status_options: self.status_options(),
            columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: self.page_rows().into_iter().map(LogRow::from_request).collect(),
            match_count: match_count,
            current_page: current_page,
            total_pages: total_pages,
            page_label: format!("Page {} of {}", current_page, total_pages),
            prev_disabled: current_page == 1,
            next_disabled: current_page == total_pages,
        }
    }
}
