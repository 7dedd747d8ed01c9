use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::product::{Product, Sku};

/// Catalog shipped with the binary (used when no file is configured).
const BUILTIN_CATALOG: &str = include_str!("../data/products.json");

/// On-disk catalog document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCatalog {
    pub products: Vec<Product>,
    /// USD per troy ounce used when no live quote is available.
    pub spot_price_fallback: Decimal,
    #[serde(default)]
    pub last_updated: String,
}

impl ProductCatalog {
    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: ProductCatalog = serde_json::from_str(json)?;
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
            products = catalog.products.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.spot_price_fallback <= Decimal::ZERO {
            return Err(CatalogError::InvalidSpotPrice(self.spot_price_fallback));
        }

        let mut seen = HashSet::new();
        for product in &self.products {
            product.validate()?;
            if !seen.insert(product.sku.clone()) {
                return Err(CatalogError::DuplicateSku(product.sku.to_string()));
            }
        }
        Ok(())
    }
}

/// Read-only access to catalog reference data.
///
/// Pricing and order code take this as an explicit dependency so tests can
/// inject synthetic catalogs and a live source can be swapped in later.
pub trait CatalogRepository: Send + Sync {
    fn get(&self, sku: &Sku) -> Option<&Product>;

    /// All products in catalog order.
    fn list(&self) -> &[Product];

    fn spot_price_fallback(&self) -> Decimal;

    fn featured(&self) -> Vec<&Product> {
        self.list().iter().filter(|p| p.featured).collect()
    }
}

impl<C> CatalogRepository for Arc<C>
where
    C: CatalogRepository + ?Sized,
{
    fn get(&self, sku: &Sku) -> Option<&Product> {
        (**self).get(sku)
    }

    fn list(&self) -> &[Product] {
        (**self).list()
    }

    fn spot_price_fallback(&self) -> Decimal {
        (**self).spot_price_fallback()
    }

    fn featured(&self) -> Vec<&Product> {
        (**self).featured()
    }
}

/// Immutable in-memory catalog indexed by SKU.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
    index: HashMap<Sku, usize>,
    spot_price_fallback: Decimal,
    last_updated: String,
}

impl InMemoryCatalog {
    pub fn new(catalog: ProductCatalog) -> Result<Self, CatalogError> {
        catalog.validate()?;

        let index = catalog
            .products
            .iter()
            .enumerate()
            .map(|(i, p)| (p.sku.clone(), i))
            .collect();

        Ok(Self {
            products: catalog.products,
            index,
            spot_price_fallback: catalog.spot_price_fallback,
            last_updated: catalog.last_updated,
        })
    }

    pub fn builtin() -> Result<Self, CatalogError> {
        Self::new(ProductCatalog::builtin()?)
    }

    pub fn last_updated(&self) -> &str {
        &self.last_updated
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn get(&self, sku: &Sku) -> Option<&Product> {
        self.index.get(sku).and_then(|&i| self.products.get(i))
    }

    fn list(&self) -> &[Product] {
        &self.products
    }

    fn spot_price_fallback(&self) -> Decimal {
        self.spot_price_fallback
    }
}
