//! Individually listed numismatic coins (the rare-coin shop).
//!
//! Unlike [`Product`](crate::Product), a coin is a single graded piece with its
//! own price and status. Coins are loaded from their own JSON document.

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bullion_core::Money;

use crate::error::CatalogError;
use crate::product::Sku;

const BUILTIN_COINS: &str = include_str!("../data/coins.json");

/// How many related coins a detail page shows.
pub const RELATED_COINS_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MintMark {
    P,
    O,
    S,
    Cc,
    D,
    W,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoinType {
    Morgan,
    Peace,
    WalkingLiberty,
    Barber,
    CappedBust,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GradingService {
    Pcgs,
    Ngc,
    Anacs,
    Icg,
    #[serde(rename = "raw")]
    Raw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rarity {
    Common,
    BetterDate,
    SemiKey,
    KeyDate,
    UltraRare,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CoinStatus {
    Available,
    Reserved,
    Sold,
    ComingSoon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceType {
    Fixed,
    /// Melt value at the current spot plus the standard coin premium.
    SpotBased,
    Negotiable,
    /// Sold by phone only.
    Call,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    pub service: GradingService,
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_numeric: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinImages {
    pub obverse: String,
    pub reverse: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slab: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub sku: Sku,
    pub name: String,
    pub short_name: String,
    pub year: u16,
    pub mint_mark: MintMark,
    #[serde(rename = "type")]
    pub coin_type: CoinType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variety: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mintage: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<String>,
    /// Silver content; spot-based pricing assumes a silver dollar when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_oz: Option<Decimal>,
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certification: Option<Certification>,
    pub price: Money,
    pub price_type: PriceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    pub rarity: Rarity,
    #[serde(default)]
    pub featured: bool,
    /// Category slugs.
    #[serde(rename = "category")]
    pub categories: Vec<String>,
    pub images: CoinImages,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<String>,
    pub status: CoinStatus,
    pub quantity: u32,
    #[serde(default)]
    pub date_added: String,
    #[serde(default)]
    pub last_updated: String,
}

impl Coin {
    /// Shown in the shop: available or on hold for another buyer.
    pub fn is_listed(&self) -> bool {
        matches!(self.status, CoinStatus::Available | CoinStatus::Reserved)
    }

    /// Can `quantity` pieces be reserved right now?
    pub fn can_reserve(&self, quantity: u32) -> bool {
        self.status == CoinStatus::Available && quantity <= self.quantity
    }

    /// "Call for Price": explicitly call-only, or a fixed price left unset.
    pub fn is_call_for_price(&self) -> bool {
        match self.price_type {
            PriceType::Call => true,
            PriceType::Fixed => !self.price.is_positive(),
            PriceType::SpotBased | PriceType::Negotiable => false,
        }
    }

    pub fn in_category(&self, slug: &str) -> bool {
        self.categories.iter().any(|c| c == slug)
    }

    fn validate(&self, known_categories: &HashSet<&str>) -> Result<(), CatalogError> {
        let fail = |reason: String| Err(CatalogError::invalid_coin(self.sku.as_str(), reason));

        if self.name.trim().is_empty() {
            return fail("name cannot be empty".to_string());
        }
        if self.price.is_negative() {
            return fail(format!("price cannot be negative, got {}", self.price.amount()));
        }
        if self.original_price.is_some_and(|p| p.is_negative()) {
            return fail("originalPrice cannot be negative".to_string());
        }
        if self.weight_oz.is_some_and(|w| w <= Decimal::ZERO) {
            return fail("weightOz must be positive".to_string());
        }
        if let Some(unknown) = self
            .categories
            .iter()
            .find(|c| !known_categories.contains(c.as_str()))
        {
            return fail(format!("unknown category {unknown:?}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinCategory {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Shop listing filter. With no status, only listed coins match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoinFilter {
    #[serde(default)]
    pub status: Option<CoinStatus>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl CoinFilter {
    pub fn matches(&self, coin: &Coin) -> bool {
        let status_ok = match self.status {
            Some(status) => coin.status == status,
            None => coin.is_listed(),
        };
        status_ok
            && self.category.as_deref().is_none_or(|slug| coin.in_category(slug))
            && (!self.featured || coin.featured)
    }
}

/// On-disk coin inventory document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinCatalog {
    pub coins: Vec<Coin>,
    #[serde(default)]
    pub categories: Vec<CoinCategory>,
    pub spot_price_fallback: Decimal,
    #[serde(default)]
    pub last_updated: String,
}

impl CoinCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: CoinCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            coins = catalog.coins.len(),
            categories = catalog.categories.len(),
            "coin inventory loaded"
        );
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_COINS)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.spot_price_fallback <= Decimal::ZERO {
            return Err(CatalogError::InvalidSpotPrice(self.spot_price_fallback));
        }

        let categories: HashSet<&str> = self.categories.iter().map(|c| c.slug.as_str()).collect();
        let mut seen = HashSet::new();
        for coin in &self.coins {
            coin.validate(&categories)?;
            if !seen.insert(&coin.sku) {
                return Err(CatalogError::DuplicateSku(coin.sku.to_string()));
            }
        }
        Ok(())
    }

    pub fn get(&self, sku: &Sku) -> Option<&Coin> {
        self.coins.iter().find(|c| &c.sku == sku)
    }

    pub fn category(&self, slug: &str) -> Option<&CoinCategory> {
        self.categories.iter().find(|c| c.slug == slug)
    }

    /// Coins matching `filter`, in inventory order.
    pub fn search(&self, filter: &CoinFilter) -> Vec<&Coin> {
        self.coins.iter().filter(|c| filter.matches(c)).collect()
    }

    /// Other available coins sharing at least one category with `coin`.
    pub fn related(&self, coin: &Coin, limit: usize) -> Vec<&Coin> {
        self.coins
            .iter()
            .filter(|other| {
                other.sku != coin.sku
                    && other.status == CoinStatus::Available
                    && other.categories.iter().any(|c| coin.in_category(c))
            })
            .take(limit)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sku(raw: &str) -> Sku {
        Sku::parse(raw).unwrap()
    }

    fn skus(coins: &[&Coin]) -> Vec<String> {
        coins.iter().map(|c| c.sku.to_string()).collect()
    }

    #[test]
    fn builtin_inventory_loads_and_validates() {
        let catalog = CoinCatalog::builtin().unwrap();
        assert_eq!(catalog.spot_price_fallback, dec!(90));
        assert!(catalog.category("carson-city").is_some());

        let cc = catalog.get(&sku("MORGAN-1893-CC-MS63")).unwrap();
        assert_eq!(cc.mint_mark, MintMark::Cc);
        assert_eq!(cc.coin_type, CoinType::Morgan);
        assert_eq!(cc.price, Money::from_cents(425_000));
        assert_eq!(
            cc.certification.as_ref().map(|c| c.service),
            Some(GradingService::Pcgs)
        );
    }

    #[test]
    fn default_listing_shows_available_and_reserved_only() {
        let catalog = CoinCatalog::builtin().unwrap();
        let listed = catalog.search(&CoinFilter::default());
        assert!(listed.iter().all(|c| c.is_listed()));
        assert!(listed.iter().any(|c| c.status == CoinStatus::Reserved));
        assert!(!skus(&listed).contains(&"MORGAN-1889-CC-VF20".to_string()));
        assert!(!skus(&listed).contains(&"PEACE-1934-S-AU58".to_string()));
    }

    #[test]
    fn filters_combine_status_category_and_featured() {
        let catalog = CoinCatalog::builtin().unwrap();

        let sold = catalog.search(&CoinFilter {
            status: Some(CoinStatus::Sold),
            ..CoinFilter::default()
        });
        assert_eq!(skus(&sold), ["MORGAN-1889-CC-VF20"]);

        let carson = catalog.search(&CoinFilter {
            category: Some("carson-city".to_string()),
            ..CoinFilter::default()
        });
        assert_eq!(skus(&carson), ["MORGAN-1893-CC-MS63"]);

        let featured = catalog.search(&CoinFilter {
            featured: true,
            ..CoinFilter::default()
        });
        assert!(!featured.is_empty());
        assert!(featured.iter().all(|c| c.featured && c.is_listed()));
    }

    #[test]
    fn related_coins_share_a_category_and_are_available() {
        let catalog = CoinCatalog::builtin().unwrap();
        let coin = catalog.get(&sku("MORGAN-1893-CC-MS63")).unwrap();
        let related = catalog.related(coin, RELATED_COINS_LIMIT);

        assert_eq!(skus(&related), ["MORGAN-1881-S-MS65", "MORGAN-1895-P-PR62"]);
        assert_eq!(catalog.related(coin, 1).len(), 1);
    }

    #[test]
    fn call_for_price_covers_call_type_and_unpriced_fixed() {
        let catalog = CoinCatalog::builtin().unwrap();
        assert!(catalog.get(&sku("MORGAN-1895-P-PR62")).unwrap().is_call_for_price());
        assert!(!catalog.get(&sku("PEACE-1922-VF")).unwrap().is_call_for_price());

        let mut fixed = catalog.get(&sku("MORGAN-1881-S-MS65")).unwrap().clone();
        assert!(!fixed.is_call_for_price());
        fixed.price = Money::ZERO;
        assert!(fixed.is_call_for_price());
    }

    #[test]
    fn reservation_needs_available_status_and_stock() {
        let catalog = CoinCatalog::builtin().unwrap();
        let common = catalog.get(&sku("MORGAN-1881-S-MS65")).unwrap();
        assert!(common.can_reserve(3));
        assert!(!common.can_reserve(4));

        let on_hold = catalog.get(&sku("PEACE-1928-MS62")).unwrap();
        assert!(!on_hold.can_reserve(1));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut catalog = CoinCatalog::builtin().unwrap();
        catalog.coins[0].categories.push("bullion".to_string());
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("unknown category"));
    }

    #[test]
    fn duplicate_coin_skus_are_rejected() {
        let mut catalog = CoinCatalog::builtin().unwrap();
        let copy = catalog.coins[0].clone();
        catalog.coins.push(copy);
        assert!(matches!(
            catalog.validate(),
            Err(CatalogError::DuplicateSku(sku)) if sku == "MORGAN-1893-CC-MS63"
        ));
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut catalog = CoinCatalog::builtin().unwrap();
        catalog.coins[1].price = Money::from_cents(-100);
        assert!(matches!(catalog.validate(), Err(CatalogError::InvalidCoin { .. })));
    }

    #[test]
    fn wire_names_match_the_shop_format() {
        let catalog = CoinCatalog::builtin().unwrap();
        let json = serde_json::to_value(catalog.get(&sku("MORGAN-1893-CC-MS63")).unwrap()).unwrap();
        assert_eq!(json["mintMark"], "CC");
        assert_eq!(json["type"], "morgan");
        assert_eq!(json["priceType"], "fixed");
        assert_eq!(json["rarity"], "semi-key");
        assert_eq!(json["category"][1], "carson-city");
        assert_eq!(json["certification"]["service"], "PCGS");
    }
}
