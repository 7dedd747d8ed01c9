//! Catalog-aware pricing facade.
//!
//! Wires an injected [`CatalogRepository`] and [`SpotPriceSource`] to the pure
//! calculator functions. The presentation layer and the order endpoint both
//! price through this type, so a quote shown on a page and the one recomputed
//! at submission go through the same code.

use serde::{Deserialize, Serialize};

use bullion_catalog::{CatalogRepository, Product, Sku};
use bullion_core::Money;

use crate::calculator::{self, PriceBreakdown, TierRow};
use crate::error::{PricingError, PricingResult};
use crate::spot::{SpotPrice, SpotPriceSource, SpotQuote};

/// Quantity used for the "from" price on product cards.
pub const STARTING_QUANTITY: u32 = 1;
/// Quantity used for the bulk price on product cards.
pub const BULK_QUANTITY: u32 = 20;

/// Headline prices for a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPrices {
    pub starting_price: Money,
    pub bulk_price: Money,
}

#[derive(Debug, Clone)]
pub struct PricingService<C, S> {
    catalog: C,
    spot: S,
}

impl<C, S> PricingService<C, S>
where
    C: CatalogRepository,
    S: SpotPriceSource,
{
    pub fn new(catalog: C, spot: S) -> Self {
        Self { catalog, spot }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn spot_quote(&self) -> SpotQuote {
        self.spot.current()
    }

    pub fn spot_price(&self) -> SpotPrice {
        self.spot.current().spot_price
    }

    pub fn product(&self, sku: &Sku) -> PricingResult<&Product> {
        self.catalog
            .get(sku)
            .ok_or_else(|| PricingError::UnknownProduct(sku.clone()))
    }

    pub fn quote(&self, sku: &Sku, quantity: u32) -> PricingResult<PriceBreakdown> {
        let product = self.product(sku)?;
        let breakdown = calculator::price_breakdown(self.spot_price(), product, quantity)?;
        tracing::debug!(
            %sku,
            quantity,
            tier = %breakdown.tier.label,
            price_per_unit = %breakdown.price_per_unit.amount(),
            "priced quote"
        );
        Ok(breakdown)
    }

    pub fn tier_schedule(&self, sku: &Sku) -> PricingResult<Vec<TierRow>> {
        let product = self.product(sku)?;
        calculator::tier_schedule_for_display(product, self.spot_price())
    }

    pub fn card_prices(&self, product: &Product) -> PricingResult<CardPrices> {
        let spot = self.spot_price();
        Ok(CardPrices {
            starting_price: calculator::sale_price_per_unit(spot, product, STARTING_QUANTITY)?,
            bulk_price: calculator::sale_price_per_unit(spot, product, BULK_QUANTITY)?,
        })
    }
}
