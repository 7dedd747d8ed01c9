//! Spot-based coin pricing.
//!
//! Every function here is a pure, deterministic computation over immutable
//! inputs: spot price, catalog product and order quantity in, money out.
//!
//! Pricing model: `price_per_unit = spot × weight_oz + tier.premium`, where the
//! tier is chosen by the **total** order quantity and applies to every unit.
//! Individually listed coins are priced separately (see [`coin`]).

pub mod calculator;
pub mod coin;
pub mod error;
pub mod format;
pub mod service;
pub mod spot;
pub mod tier;

pub use calculator::{
    melt_value, order_total, price_breakdown, sale_price_per_unit, tier_schedule_for_display,
    PriceBreakdown, TierRow,
};
pub use coin::{
    coin_price_label, coin_quote, CoinQuote, CALL_FOR_PRICE_LABEL, DEFAULT_COIN_PREMIUM,
    DEFAULT_COIN_WEIGHT_OZ,
};
pub use error::{PricingError, PricingResult};
pub use format::{format_currency, format_price};
pub use service::{CardPrices, PricingService, BULK_QUANTITY, STARTING_QUANTITY};
pub use spot::{FallbackSpotPrice, SpotPrice, SpotPriceSource, SpotQuote};
pub use tier::{select_tier, select_tier_or_last};
