//! Environment-driven API configuration.
//!
//! Every setting has a default; an unparsable value is logged and replaced by
//! its default rather than aborting startup.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use bullion_core::Money;
use bullion_orders::MailSettings;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_FROM_EMAIL: &str = "orders@example.com";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@example.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    /// Overrides the catalog's fallback spot price when set.
    pub spot_price_fallback: Option<Decimal>,
    /// Catalog JSON file; the embedded catalog is used when unset.
    pub catalog_path: Option<PathBuf>,
    /// Coin inventory JSON file; the embedded inventory is used when unset.
    pub coins_path: Option<PathBuf>,
    pub mail: MailSettings,
    /// Flat shipping added to every order.
    pub shipping: Money,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            spot_price_fallback: None,
            catalog_path: None,
            coins_path: None,
            mail: MailSettings::new(DEFAULT_FROM_EMAIL, DEFAULT_ADMIN_EMAIL),
            shipping: Money::ZERO,
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = var("BIND_ADDR")
            .and_then(|raw| parse_or_warn::<SocketAddr>("BIND_ADDR", &raw))
            .unwrap_or(defaults.bind_addr);

        let spot_price_fallback = var("SPOT_PRICE_FALLBACK")
            .and_then(|raw| parse_or_warn::<Decimal>("SPOT_PRICE_FALLBACK", &raw))
            .and_then(|price| {
                if price > Decimal::ZERO {
                    Some(price)
                } else {
                    tracing::warn!(%price, "SPOT_PRICE_FALLBACK must be positive; using catalog value");
                    None
                }
            });

        let shipping = var("SHIPPING_FLAT")
            .and_then(|raw| parse_or_warn::<Decimal>("SHIPPING_FLAT", &raw))
            .and_then(|amount| {
                if amount < Decimal::ZERO {
                    tracing::warn!(%amount, "SHIPPING_FLAT cannot be negative; using 0");
                    None
                } else {
                    Some(Money::new(amount))
                }
            })
            .unwrap_or(defaults.shipping);

        Self {
            bind_addr,
            spot_price_fallback,
            catalog_path: var("CATALOG_PATH").map(PathBuf::from),
            coins_path: var("COINS_PATH").map(PathBuf::from),
            mail: MailSettings::new(
                var("FROM_EMAIL").unwrap_or(defaults.mail.from),
                var("ADMIN_EMAIL").unwrap_or(defaults.mail.admin),
            ),
            shipping,
        }
    }
}

fn parse_or_warn<T>(key: &str, raw: &str) -> Option<T>
where
    T: FromStr,
    T::Err: core::fmt::Display,
{
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, value = raw, error = %err, "invalid configuration value; using default");
            None
        }
    }
}
