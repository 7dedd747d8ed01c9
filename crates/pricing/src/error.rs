use rust_decimal::Decimal;
use thiserror::Error;

use bullion_catalog::Sku;
use bullion_core::DomainError;

pub type PricingResult<T> = Result<T, PricingError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    #[error("quantity must be a positive integer, got {0}")]
    InvalidQuantity(i64),

    #[error("spot price must be positive, got {0}")]
    InvalidSpotPrice(Decimal),

    #[error("product {0} has no premium tiers configured")]
    EmptyTierList(Sku),

    /// The tier schedule does not cover the quantity (configuration gap).
    #[error("no premium tier of product {sku} covers quantity {quantity}")]
    NoMatchingTier { sku: Sku, quantity: u32 },

    /// An intermediate amount does not fit the decimal range.
    #[error("amount out of range while computing {0}")]
    Overflow(&'static str),

    #[error("unknown product: {0}")]
    UnknownProduct(Sku),

    #[error("unknown coin: {0}")]
    UnknownCoin(Sku),

    /// The coin is sold by phone only and has no online price.
    #[error("coin {0} is priced on request; please contact us")]
    CallForPrice(Sku),
}

impl From<PricingError> for DomainError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::InvalidQuantity(_) | PricingError::InvalidSpotPrice(_) => {
                DomainError::validation(err.to_string())
            }
            PricingError::EmptyTierList(_) | PricingError::NoMatchingTier { .. } => {
                DomainError::configuration(err.to_string())
            }
            PricingError::Overflow(_) | PricingError::CallForPrice(_) => {
                DomainError::invariant(err.to_string())
            }
            PricingError::UnknownProduct(sku) => DomainError::not_found(format!("product {sku}")),
            PricingError::UnknownCoin(sku) => DomainError::not_found(format!("coin {sku}")),
        }
    }
}
