//! Pricing for individually listed coins.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bullion_catalog::{Coin, PriceType, Sku};
use bullion_core::Money;

use crate::calculator::melt_value;
use crate::error::{PricingError, PricingResult};
use crate::spot::SpotPrice;

/// Silver content assumed for a spot-based coin without `weightOz`.
pub const DEFAULT_COIN_WEIGHT_OZ: Decimal = Decimal::from_parts(77_344, 0, 0, false, 5);

/// Premium over melt for spot-based coins.
pub const DEFAULT_COIN_PREMIUM: Money = Money::new(Decimal::from_parts(22, 0, 0, false, 0));

pub const CALL_FOR_PRICE_LABEL: &str = "Call for Price";

/// Current asking price of one coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinQuote {
    pub sku: Sku,
    pub price_type: PriceType,
    pub price: Money,
    /// Spot-based coins only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub melt_value: Option<Money>,
    /// Spot-based coins only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premium: Option<Money>,
    /// Previous price, present only when it is above the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    pub formatted_price: String,
}

/// Price one coin at `spot`. Call-for-price coins have no online price and
/// are rejected with [`PricingError::CallForPrice`].
pub fn coin_quote(spot: SpotPrice, coin: &Coin) -> PricingResult<CoinQuote> {
    if coin.is_call_for_price() {
        return Err(PricingError::CallForPrice(coin.sku.clone()));
    }

    let (price, melt, premium) = match coin.price_type {
        PriceType::SpotBased => {
            let melt = melt_value(spot, coin.weight_oz.unwrap_or(DEFAULT_COIN_WEIGHT_OZ))?;
            let price = melt
                .checked_add(DEFAULT_COIN_PREMIUM)
                .ok_or(PricingError::Overflow("coin price"))?;
            (price, Some(melt), Some(DEFAULT_COIN_PREMIUM))
        }
        PriceType::Fixed | PriceType::Negotiable | PriceType::Call => (coin.price, None, None),
    };

    Ok(CoinQuote {
        sku: coin.sku.clone(),
        price_type: coin.price_type,
        price,
        melt_value: melt,
        premium,
        original_price: coin.original_price.filter(|original| *original > price),
        formatted_price: price.format_usd(),
    })
}

/// Display text for a coin's price: the formatted amount or "Call for Price".
pub fn coin_price_label(spot: SpotPrice, coin: &Coin) -> PricingResult<String> {
    match coin_quote(spot, coin) {
        Ok(quote) => Ok(quote.formatted_price),
        Err(PricingError::CallForPrice(_)) => Ok(CALL_FOR_PRICE_LABEL.to_string()),
        Err(err) => Err(err),
    }
}
