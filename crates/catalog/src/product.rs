use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bullion_core::{Money, ValueObject};

use crate::error::CatalogError;

/// Stock-keeping unit identifier (e.g. `MORGAN-BU`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sku(String);

impl ValueObject for Sku {}

impl Sku {
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidSku("SKU cannot be empty".to_string()));
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(CatalogError::InvalidSku(format!(
                "{trimmed:?} contains unsupported character {bad:?}"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Sku {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Sku {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sku> for String {
    fn from(value: Sku) -> Self {
        value.0
    }
}

impl core::fmt::Display for Sku {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A quantity range mapped to a flat per-coin premium.
///
/// `max_qty == None` marks the unbounded top tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumTier {
    pub min_qty: u32,
    pub max_qty: Option<u32>,
    pub premium: Money,
    pub label: String,
}

impl ValueObject for PremiumTier {}

impl PremiumTier {
    /// Inclusive range check; an unbounded tier matches anything `>= min_qty`.
    pub fn contains(&self, quantity: u32) -> bool {
        quantity >= self.min_qty && self.max_qty.is_none_or(|max| quantity <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_qty.is_none()
    }
}

/// Catalog entry for a spot-priced coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: Sku,
    pub name: String,
    pub short_name: String,
    #[serde(default)]
    pub description: String,
    /// Troy ounces of silver per coin.
    pub weight_oz: Decimal,
    /// Fineness as a fraction (0.90 for 90% silver).
    pub purity: Decimal,
    pub premium_tiers: Vec<PremiumTier>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Product {
    /// Check the reference-data invariants that pricing relies on.
    ///
    /// The tier schedule must partition the positive integers: it starts at 1,
    /// every bounded tier is followed by one starting right after it, and only
    /// the last tier is unbounded.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let fail = |reason: String| Err(CatalogError::invalid_product(self.sku.as_str(), reason));

        if self.name.trim().is_empty() {
            return fail("name cannot be empty".to_string());
        }
        if self.weight_oz <= Decimal::ZERO {
            return fail(format!("weightOz must be positive, got {}", self.weight_oz));
        }
        if self.purity <= Decimal::ZERO || self.purity > Decimal::ONE {
            return fail(format!("purity must be in (0, 1], got {}", self.purity));
        }

        let tiers = &self.premium_tiers;
        let Some(first) = tiers.first() else {
            return fail("premium tier list is empty".to_string());
        };
        if first.min_qty != 1 {
            return fail(format!("first tier must start at 1, starts at {}", first.min_qty));
        }

        for (idx, tier) in tiers.iter().enumerate() {
            if tier.premium.is_negative() {
                return fail(format!("tier {:?} has a negative premium", tier.label));
            }
            if let Some(max) = tier.max_qty {
                if max < tier.min_qty {
                    return fail(format!(
                        "tier {:?} has maxQty {} below minQty {}",
                        tier.label, max, tier.min_qty
                    ));
                }
            }

            let Some(next) = tiers.get(idx + 1) else {
                continue;
            };
            match tier.max_qty {
                None => {
                    return fail(format!(
                        "only the last tier may be unbounded, {:?} is not last",
                        tier.label
                    ));
                }
                Some(max) if next.min_qty != max.saturating_add(1) => {
                    return fail(format!(
                        "tiers {:?} and {:?} leave a gap or overlap ({} -> {})",
                        tier.label, next.label, max, next.min_qty
                    ));
                }
                Some(_) => {}
            }
        }

        if tiers.last().is_some_and(|t| !t.is_unbounded()) {
            return fail("last tier must be unbounded".to_string());
        }

        Ok(())
    }
}
