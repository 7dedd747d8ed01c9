use serde::{Deserialize, Serialize};

use bullion_catalog::{Coin, CoinCategory, Product, Sku};
use bullion_core::Money;
use bullion_orders::{OrderId, OrderSummary, Reservation, WireInstructions};
use bullion_pricing::{CardPrices, CoinQuote, SpotPrice, SpotQuote, TierRow};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct QuoteParams {
    pub quantity: i64,
}

/// Optional quantity whose tier the schedule should highlight.
#[derive(Debug, Default, Deserialize)]
pub struct TierScheduleParams {
    #[serde(default)]
    pub quantity: Option<i64>,
}

// -------------------------
// Response DTOs
// -------------------------

/// Catalog entry with its headline prices at the current spot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard<'a> {
    #[serde(flatten)]
    pub product: &'a Product,
    pub starting_price: Money,
    pub bulk_price: Money,
    pub formatted_starting_price: String,
    pub formatted_bulk_price: String,
}

impl<'a> ProductCard<'a> {
    pub fn new(product: &'a Product, prices: CardPrices) -> Self {
        Self {
            product,
            starting_price: prices.starting_price,
            bulk_price: prices.bulk_price,
            formatted_starting_price: prices.starting_price.format_usd(),
            formatted_bulk_price: prices.bulk_price.format_usd(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<'a, T> {
    pub items: Vec<T>,
    pub last_updated: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotPriceResponse {
    #[serde(flatten)]
    pub quote: SpotQuote,
    /// Two decimals, no symbol (e.g. `"90.00"`).
    pub formatted_spot_price: String,
}

/// Shop entry: the coin plus its price at the current spot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinCard<'a> {
    #[serde(flatten)]
    pub coin: &'a Coin,
    /// Absent for call-for-price coins.
    pub quote: Option<CoinQuote>,
    pub price_label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinListResponse<'a> {
    pub items: Vec<CoinCard<'a>>,
    pub categories: &'a [CoinCategory],
    pub last_updated: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinDetailResponse<'a> {
    #[serde(flatten)]
    pub card: CoinCard<'a>,
    pub related: Vec<CoinCard<'a>>,
}

pub const ORDER_RECEIVED_MESSAGE: &str =
    "Your reservation has been received! Check your email for wire/ACH payment instructions.";
pub const CONTACT_RECEIVED_MESSAGE: &str =
    "Thank you for your message! We'll get back to you soon.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub success: bool,
    pub order_id: OrderId,
    pub message: &'static str,
    pub wire_instructions: WireInstructions,
    pub order_summary: OrderSummary,
    pub formatted_total: String,
}

impl From<Reservation> for OrderResponse {
    fn from(r: Reservation) -> Self {
        Self {
            success: true,
            formatted_total: r.summary.total.format_usd(),
            order_id: r.order_id,
            message: ORDER_RECEIVED_MESSAGE,
            wire_instructions: r.wire_instructions,
            order_summary: r.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierScheduleResponse {
    pub sku: Sku,
    pub spot_price: SpotPrice,
    pub tiers: Vec<TierRow>,
    /// Label of the row covering the requested quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_tier: Option<String>,
}
