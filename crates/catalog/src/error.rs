use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while loading or validating catalog data.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid SKU: {0}")]
    InvalidSku(String),

    #[error("product {sku}: {reason}")]
    InvalidProduct { sku: String, reason: String },

    #[error("coin {sku}: {reason}")]
    InvalidCoin { sku: String, reason: String },

    #[error("duplicate SKU in catalog: {0}")]
    DuplicateSku(String),

    #[error("spot price fallback must be positive, got {0}")]
    InvalidSpotPrice(Decimal),
}

impl CatalogError {
    pub fn invalid_product(sku: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProduct {
            sku: sku.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_coin(sku: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCoin {
            sku: sku.into(),
            reason: reason.into(),
        }
    }
}
