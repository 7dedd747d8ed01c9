use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use bullion_catalog::{Coin, CoinFilter, RELATED_COINS_LIMIT};
use bullion_pricing::{coin_price_label, coin_quote, PricingError, PricingResult, SpotPrice};

use crate::app::routes::products::parse_sku;
use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_coins))
        .route("/:sku", get(get_coin))
}

fn coin_card(spot: SpotPrice, coin: &Coin) -> PricingResult<dto::CoinCard<'_>> {
    let quote = match coin_quote(spot, coin) {
        Ok(quote) => Some(quote),
        Err(PricingError::CallForPrice(_)) => None,
        Err(err) => return Err(err),
    };
    Ok(dto::CoinCard {
        coin,
        quote,
        price_label: coin_price_label(spot, coin)?,
    })
}

/// Shop listing. Defaults to available and reserved coins; `status`,
/// `category` and `featured` narrow it.
pub async fn list_coins(
    Extension(services): Extension<Arc<AppServices>>,
    filter: Result<Query<CoinFilter>, QueryRejection>,
) -> Response {
    let Query(filter) = match filter {
        Ok(filter) => filter,
        Err(rejection) => return errors::bad_query(rejection),
    };

    let spot = services.pricing.spot_price();
    let items: PricingResult<Vec<_>> = services
        .coins
        .search(&filter)
        .into_iter()
        .map(|coin| coin_card(spot, coin))
        .collect();
    let items = match items {
        Ok(items) => items,
        Err(e) => return errors::domain_error_to_response(e.into()),
    };

    tracing::debug!(count = items.len(), ?filter, "coin listing");
    Json(dto::CoinListResponse {
        items,
        categories: &services.coins.categories,
        last_updated: &services.coins.last_updated,
    })
    .into_response()
}

pub async fn get_coin(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
) -> Response {
    let sku = match parse_sku(&sku, "coin") {
        Ok(sku) => sku,
        Err(resp) => return resp,
    };
    let Some(coin) = services.coins.get(&sku) else {
        return errors::domain_error_to_response(PricingError::UnknownCoin(sku).into());
    };

    let spot = services.pricing.spot_price();
    let detail = coin_card(spot, coin).and_then(|card| {
        let related = services
            .coins
            .related(coin, RELATED_COINS_LIMIT)
            .into_iter()
            .map(|other| coin_card(spot, other))
            .collect::<PricingResult<Vec<_>>>()?;
        Ok(dto::CoinDetailResponse { card, related })
    });

    match detail {
        Ok(detail) => Json(detail).into_response(),
        Err(e) => errors::domain_error_to_response(e.into()),
    }
}
