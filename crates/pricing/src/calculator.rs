//! Melt value, per-unit price, order total and tier tables.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bullion_catalog::{PremiumTier, Product, Sku};
use bullion_core::Money;

use crate::error::{PricingError, PricingResult};
use crate::spot::SpotPrice;
use crate::tier::select_tier;

/// Raw metal value: `spot × weight_oz`, unrounded.
pub fn melt_value(spot: SpotPrice, weight_oz: Decimal) -> PricingResult<Money> {
    spot.per_oz()
        .checked_mul(weight_oz)
        .map(Money::new)
        .ok_or(PricingError::Overflow("melt value"))
}

fn with_premium(melt: Money, premium: Money) -> PricingResult<Money> {
    melt.checked_add(premium)
        .ok_or(PricingError::Overflow("price per unit"))
}

fn extend(unit: Money, quantity: u32) -> PricingResult<Money> {
    unit.checked_times(quantity)
        .ok_or(PricingError::Overflow("order total"))
}

/// Displayed per-coin price: melt value plus the premium of the tier chosen by
/// the total order quantity.
pub fn sale_price_per_unit(spot: SpotPrice, product: &Product, quantity: u32) -> PricingResult<Money> {
    let tier = select_tier(product, quantity)?;
    with_premium(melt_value(spot, product.weight_oz)?, tier.premium)
}

/// Every unit is priced at the same tier rate; there is no blending across
/// tier boundaries.
pub fn order_total(spot: SpotPrice, product: &Product, quantity: u32) -> PricingResult<Money> {
    extend(sale_price_per_unit(spot, product, quantity)?, quantity)
}

/// One row of a volume-discount table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierRow {
    pub label: String,
    pub min_qty: u32,
    pub max_qty: Option<u32>,
    pub premium: Money,
    pub price_per_unit: Money,
    pub formatted_price: String,
}

/// Per-unit price at `spot` for every configured tier, in configuration order.
pub fn tier_schedule_for_display(product: &Product, spot: SpotPrice) -> PricingResult<Vec<TierRow>> {
    if product.premium_tiers.is_empty() {
        return Err(PricingError::EmptyTierList(product.sku.clone()));
    }

    let melt = melt_value(spot, product.weight_oz)?;
    product
        .premium_tiers
        .iter()
        .map(|tier| {
            let price_per_unit = with_premium(melt, tier.premium)?;
            Ok(TierRow {
                label: tier.label.clone(),
                min_qty: tier.min_qty,
                max_qty: tier.max_qty,
                premium: tier.premium,
                price_per_unit,
                formatted_price: price_per_unit.format_usd(),
            })
        })
        .collect()
}

/// Everything the price calculator widget shows for one `(product, quantity)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub sku: Sku,
    pub quantity: u32,
    pub spot_price: SpotPrice,
    pub melt_value: Money,
    pub tier: PremiumTier,
    pub price_per_unit: Money,
    pub total: Money,
}

pub fn price_breakdown(spot: SpotPrice, product: &Product, quantity: u32) -> PricingResult<PriceBreakdown> {
    let tier = select_tier(product, quantity)?;
    let melt = melt_value(spot, product.weight_oz)?;
    let price_per_unit = with_premium(melt, tier.premium)?;

    Ok(PriceBreakdown {
        sku: product.sku.clone(),
        quantity,
        spot_price: spot,
        melt_value: melt,
        tier: tier.clone(),
        price_per_unit,
        total: extend(price_per_unit, quantity)?,
    })
}
