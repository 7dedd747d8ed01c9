//! Service wiring: catalogs, spot source, pricing and notifications.

use std::sync::Arc;

use anyhow::Context;

use bullion_catalog::{CatalogRepository, CoinCatalog, InMemoryCatalog, ProductCatalog};
use bullion_orders::{LogNotifier, MailSettings, Notifier, ReservationPolicy};
use bullion_pricing::{FallbackSpotPrice, PricingService, SpotPrice};

use crate::config::ApiConfig;

pub type Pricing = PricingService<Arc<InMemoryCatalog>, FallbackSpotPrice>;

/// Shared state handed to every handler.
pub struct AppServices {
    pub pricing: Pricing,
    pub coins: CoinCatalog,
    pub notifier: Arc<dyn Notifier>,
    pub mail: MailSettings,
    pub policy: ReservationPolicy,
}

impl AppServices {
    pub fn new(
        catalog: InMemoryCatalog,
        coins: CoinCatalog,
        spot: FallbackSpotPrice,
        notifier: Arc<dyn Notifier>,
        mail: MailSettings,
        policy: ReservationPolicy,
    ) -> Self {
        Self {
            pricing: PricingService::new(Arc::new(catalog), spot),
            coins,
            notifier,
            mail,
            policy,
        }
    }
}

/// Build services from configuration.
///
/// Catalog and coin inventory come from `CATALOG_PATH` / `COINS_PATH` or the
/// embedded documents. The spot price comes from `SPOT_PRICE_FALLBACK` or the
/// catalog's own fallback.
pub fn build_services(config: &ApiConfig) -> anyhow::Result<AppServices> {
    let document = match &config.catalog_path {
        Some(path) => ProductCatalog::load(path)
            .with_context(|| format!("failed to load catalog from {}", path.display()))?,
        None => ProductCatalog::builtin().context("embedded catalog is invalid")?,
    };
    let catalog = InMemoryCatalog::new(document).context("catalog rejected")?;

    let coins = match &config.coins_path {
        Some(path) => CoinCatalog::load(path)
            .with_context(|| format!("failed to load coin inventory from {}", path.display()))?,
        None => CoinCatalog::builtin().context("embedded coin inventory is invalid")?,
    };

    let spot = match config.spot_price_fallback {
        Some(price) => FallbackSpotPrice::new(
            SpotPrice::new(price).context("SPOT_PRICE_FALLBACK is not a valid spot price")?,
        ),
        None => FallbackSpotPrice::from_catalog(&catalog)
            .context("catalog spot price fallback is not a valid spot price")?,
    };

    tracing::info!(
        products = catalog.list().len(),
        coins = coins.coins.len(),
        spot_price = %spot.price(),
        shipping = %config.shipping,
        "services ready"
    );

    Ok(AppServices::new(
        catalog,
        coins,
        spot,
        Arc::new(LogNotifier),
        config.mail.clone(),
        ReservationPolicy {
            shipping: config.shipping,
            ..ReservationPolicy::default()
        },
    ))
}
