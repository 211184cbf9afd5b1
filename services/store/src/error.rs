use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Store service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum StoreServiceError {
    #[error("product not found")]
    ProductNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("order has no items")]
    EmptyOrder,
    #[error("invalid price")]
    InvalidPrice,
    #[error("invalid rating")]
    InvalidRating,
    #[error("invalid quantity")]
    InvalidQuantity,
    #[error("invalid status")]
    InvalidStatus,
    #[error("invalid status transition")]
    InvalidTransition,
    #[error("order already paid")]
    AlreadyPaid,
    #[error("payment verification failed")]
    PaymentVerificationFailed,
    #[error("unsupported image type")]
    UnsupportedImageType,
    #[error("image too large")]
    ImageTooLarge,
    #[error("missing data")]
    MissingData,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl StoreServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::EmptyOrder => "EMPTY_ORDER",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::InvalidRating => "INVALID_RATING",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::AlreadyPaid => "ALREADY_PAID",
            Self::PaymentVerificationFailed => "PAYMENT_VERIFICATION_FAILED",
            Self::UnsupportedImageType => "UNSUPPORTED_IMAGE_TYPE",
            Self::ImageTooLarge => "IMAGE_TOO_LARGE",
            Self::MissingData => "MISSING_DATA",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for StoreServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ProductNotFound | Self::OrderNotFound => StatusCode::NOT_FOUND,
            Self::EmptyOrder
            | Self::InvalidPrice
            | Self::InvalidRating
            | Self::InvalidQuantity
            | Self::InvalidStatus
            | Self::PaymentVerificationFailed
            | Self::UnsupportedImageType
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::InvalidTransition | Self::AlreadyPaid => StatusCode::CONFLICT,
            Self::ImageTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
