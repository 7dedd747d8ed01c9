//! Spot price value and sources.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bullion_catalog::CatalogRepository;
use bullion_core::{Money, ValueObject};

use crate::error::{PricingError, PricingResult};

/// Positive USD-per-troy-ounce price of silver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct SpotPrice(Decimal);

impl ValueObject for SpotPrice {}

impl SpotPrice {
    pub fn new(per_oz: Decimal) -> PricingResult<Self> {
        if per_oz <= Decimal::ZERO {
            return Err(PricingError::InvalidSpotPrice(per_oz));
        }
        Ok(Self(per_oz))
    }

    pub fn per_oz(&self) -> Decimal {
        self.0
    }

    pub fn as_money(&self) -> Money {
        Money::new(self.0)
    }
}

impl TryFrom<Decimal> for SpotPrice {
    type Error = PricingError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpotPrice> for Decimal {
    fn from(value: SpotPrice) -> Self {
        value.0
    }
}

impl core::fmt::Display for SpotPrice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.as_money(), f)
    }
}

/// A spot price together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotQuote {
    pub spot_price: SpotPrice,
    pub currency: String,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub is_fallback: bool,
}

/// Supplier of the current spot price.
///
/// Implementations do not cache or judge freshness; callers ask per request.
pub trait SpotPriceSource: Send + Sync {
    fn current(&self) -> SpotQuote;
}

impl<S> SpotPriceSource for std::sync::Arc<S>
where
    S: SpotPriceSource + ?Sized,
{
    fn current(&self) -> SpotQuote {
        (**self).current()
    }
}

/// Fixed, configured spot price used in the absence of a market-data feed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FallbackSpotPrice {
    price: SpotPrice,
}

impl FallbackSpotPrice {
    pub const SOURCE: &'static str = "fallback";

    pub fn new(price: SpotPrice) -> Self {
        Self { price }
    }

    /// Use the fallback recorded in the catalog document.
    pub fn from_catalog(catalog: &impl CatalogRepository) -> PricingResult<Self> {
        Ok(Self::new(SpotPrice::new(catalog.spot_price_fallback())?))
    }

    pub fn price(&self) -> SpotPrice {
        self.price
    }
}

impl SpotPriceSource for FallbackSpotPrice {
    fn current(&self) -> SpotQuote {
        tracing::debug!(spot_price = %self.price.per_oz(), "spot price requested (fallback)");
        SpotQuote {
            spot_price: self.price,
            currency: "USD".to_string(),
            source: Self::SOURCE.to_string(),
            timestamp: Utc::now(),
            is_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bullion_catalog::InMemoryCatalog;
    use rust_decimal_macros::dec;

    #[test]
    fn spot_price_must_be_positive() {
        assert_eq!(
            SpotPrice::new(dec!(0)),
            Err(PricingError::InvalidSpotPrice(dec!(0)))
        );
        assert!(SpotPrice::new(dec!(-1.5)).is_err());
        assert_eq!(SpotPrice::new(dec!(90)).unwrap().per_oz(), dec!(90));
    }

    #[test]
    fn deserialization_rejects_non_positive_values() {
        assert!(serde_json::from_str::<SpotPrice>("0").is_err());
        let spot: SpotPrice = serde_json::from_str("31.25").unwrap();
        assert_eq!(spot.per_oz(), dec!(31.25));
    }

    #[test]
    fn fallback_quote_is_flagged_as_fallback() {
        let source = FallbackSpotPrice::new(SpotPrice::new(dec!(90)).unwrap());
        let quote = source.current();
        assert_eq!(quote.spot_price.per_oz(), dec!(90));
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.source, "fallback");
        assert!(quote.is_fallback);
    }

    #[test]
    fn fallback_can_come_from_catalog() {
        let catalog = InMemoryCatalog::builtin().unwrap();
        let source = FallbackSpotPrice::from_catalog(&catalog).unwrap();
        assert_eq!(source.price().per_oz(), dec!(90));
    }

    #[test]
    fn quote_serializes_in_camel_case() {
        let source = FallbackSpotPrice::new(SpotPrice::new(dec!(90)).unwrap());
        let json = serde_json::to_value(source.current()).unwrap();
        assert_eq!(json["spotPrice"], serde_json::json!(90.0));
        assert_eq!(json["isFallback"], serde_json::json!(true));
    }
}
