use thiserror::Error;

use bullion_catalog::Sku;
use bullion_core::DomainError;
use bullion_pricing::PricingError;

use crate::validation::ValidationErrors;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("invalid order data: {0}")]
    Invalid(ValidationErrors),

    #[error("unknown product: {0}")]
    UnknownProduct(Sku),

    #[error("product {0} is out of stock")]
    OutOfStock(Sku),

    #[error("unknown coin: {0}")]
    UnknownCoin(Sku),

    /// Sold, on hold, not yet listed, or fewer pieces than requested.
    #[error("coin {0} is not available for reservation")]
    CoinUnavailable(Sku),

    #[error(transparent)]
    Pricing(PricingError),
}

impl From<ValidationErrors> for OrderError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Invalid(errors)
    }
}

impl From<PricingError> for OrderError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::UnknownProduct(sku) => Self::UnknownProduct(sku),
            PricingError::UnknownCoin(sku) => Self::UnknownCoin(sku),
            other => Self::Pricing(other),
        }
    }
}

impl From<OrderError> for DomainError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Invalid(errors) => DomainError::validation(errors.to_string()),
            OrderError::UnknownProduct(sku) => DomainError::not_found(format!("product {sku}")),
            OrderError::OutOfStock(sku) => DomainError::conflict(format!("product {sku} is out of stock")),
            OrderError::UnknownCoin(sku) => DomainError::not_found(format!("coin {sku}")),
            OrderError::CoinUnavailable(sku) => {
                DomainError::conflict(format!("coin {sku} is not available"))
            }
            OrderError::Pricing(err) => err.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_onto_domain_error_kinds() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Please enter a valid email address");
        assert_eq!(
            DomainError::from(OrderError::Invalid(errors)),
            DomainError::validation("email: Please enter a valid email address")
        );

        let sku = Sku::parse("MORGAN-BU").unwrap();
        assert_eq!(
            DomainError::from(OrderError::UnknownProduct(sku.clone())),
            DomainError::not_found("product MORGAN-BU")
        );
        assert!(matches!(
            DomainError::from(OrderError::OutOfStock(sku.clone())),
            DomainError::Conflict(_)
        ));
        assert_eq!(
            DomainError::from(OrderError::UnknownCoin(sku.clone())),
            DomainError::not_found("coin MORGAN-BU")
        );
        assert!(matches!(
            DomainError::from(OrderError::CoinUnavailable(sku.clone())),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            DomainError::from(OrderError::Pricing(PricingError::NoMatchingTier { sku, quantity: 5 })),
            DomainError::Configuration(_)
        ));
    }

    #[test]
    fn unknown_product_from_pricing_is_lifted() {
        let sku = Sku::parse("PEACE-BU").unwrap();
        assert_eq!(
            OrderError::from(PricingError::UnknownProduct(sku.clone())),
            OrderError::UnknownProduct(sku)
        );
    }
}
