//! Catalog domain module.
//!
//! Products are immutable reference data loaded once from a JSON catalog and
//! validated at load time. Callers receive the catalog through the
//! [`CatalogRepository`] trait rather than a module-level constant.
//!
//! Graded numismatic coins live in a separate [`CoinCatalog`] document.

pub mod catalog;
pub mod coin;
pub mod error;
pub mod product;

pub use catalog::{CatalogRepository, InMemoryCatalog, ProductCatalog};
pub use coin::{
    Certification, Coin, CoinCatalog, CoinCategory, CoinFilter, CoinImages, CoinStatus, CoinType,
    GradingService, MintMark, PriceType, Rarity, RELATED_COINS_LIMIT,
};
pub use error::CatalogError;
pub use product::{PremiumTier, Product, Sku};
