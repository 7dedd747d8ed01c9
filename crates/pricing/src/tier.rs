//! Premium tier selection.

use bullion_catalog::{PremiumTier, Product};

use crate::error::{PricingError, PricingResult};

pub(crate) fn ensure_quantity(quantity: u32) -> PricingResult<u32> {
    if quantity == 0 {
        return Err(PricingError::InvalidQuantity(0));
    }
    Ok(quantity)
}

/// First tier (in configuration order) whose range contains `quantity`.
///
/// A validated catalog guarantees exactly one match for every `quantity >= 1`;
/// a gap in hand-built data surfaces as [`PricingError::NoMatchingTier`].
pub fn select_tier(product: &Product, quantity: u32) -> PricingResult<&PremiumTier> {
    ensure_quantity(quantity)?;

    if product.premium_tiers.is_empty() {
        return Err(PricingError::EmptyTierList(product.sku.clone()));
    }

    product
        .premium_tiers
        .iter()
        .find(|tier| tier.contains(quantity))
        .ok_or_else(|| PricingError::NoMatchingTier {
            sku: product.sku.clone(),
            quantity,
        })
}

/// Lenient variant of [`select_tier`] for display-only callers: a schedule gap
/// falls back to the last configured tier (logged), other errors still fail.
pub fn select_tier_or_last(product: &Product, quantity: u32) -> PricingResult<&PremiumTier> {
    match select_tier(product, quantity) {
        Err(PricingError::NoMatchingTier { sku, quantity }) => {
            tracing::warn!(%sku, quantity, "no premium tier matches; using last tier");
            product
                .premium_tiers
                .last()
                .ok_or(PricingError::EmptyTierList(sku))
        }
        other => other,
    }
}
