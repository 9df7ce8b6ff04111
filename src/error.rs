use axum::http::StatusCode;
use thiserror::Error;

/// Why the confirm action is currently disabled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    #[error("Insufficient vouchers!")]
    InsufficientVouchers,

    #[error("Cart is empty")]
    EmptyCart,

    #[error("A purchase is already being processed")]
    SubmissionInFlight,
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Purchase not allowed: {0}")]
    Ineligible(Ineligibility),

    #[error("Error confirming purchase: {0}")]
    SubmissionFailed(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Checkout(CheckoutError::Ineligible(_)) => StatusCode::CONFLICT,
            AppError::Checkout(CheckoutError::SubmissionFailed(_)) => StatusCode::BAD_GATEWAY,
            AppError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_errors_map_to_distinct_statuses() {
        let ineligible = AppError::from(CheckoutError::Ineligible(Ineligibility::EmptyCart));
        let failed = AppError::from(CheckoutError::SubmissionFailed("boom".to_string()));

        assert_eq!(ineligible.status_code(), StatusCode::CONFLICT);
        assert_eq!(failed.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::MalformedPayload("page".to_string()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("chips".to_string()).status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn insufficient_vouchers_message_matches_footer_text() {
        assert_eq!(Ineligibility::InsufficientVouchers.to_string(), "Insufficient vouchers!");
    }

    #[test]
    fn ineligibility_nests_in_checkout_error_message() {
        let error = CheckoutError::Ineligible(Ineligibility::SubmissionInFlight);

        assert_eq!(error.to_string(), "Purchase not allowed: A purchase is already being processed");
        assert_eq!(Ineligibility::EmptyCart.to_string(), "Cart is empty");
    }
}
