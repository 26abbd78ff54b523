use std::path::PathBuf;

use reqwest::{Method, StatusCode};
use stockroom_common::product::{ProductId, StockId, ValidationError};

/// Errors from talking to the catalog store or handling the local session.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog store URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("catalog store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("catalog store answered {status} to {method} {path}")]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
    },

    #[error("invalid authentication key")]
    InvalidKey,

    #[error("quantity must be zero or more, got {0}")]
    InvalidQuantity(i64),

    #[error("quantity {0} is larger than a stock can hold")]
    QuantityTooLarge(i64),

    #[error("product {product} has no stock location {stock}")]
    StockNotFound { product: ProductId, stock: StockId },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("session file {}: {source}", path.display())]
    SessionIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {} is unreadable: {source}", path.display())]
    SessionFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl CatalogError {
    /// Failures of the network round trip, as opposed to rejected input.
    pub fn is_transport(&self) -> bool {
        matches!(self, CatalogError::Http(_) | CatalogError::Status { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}
