use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

use bullion_catalog::{CatalogRepository, Sku};
use bullion_core::DomainError;
use bullion_pricing::{select_tier_or_last, tier_schedule_for_display, PricingError};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products))
        .route("/:sku", get(get_product))
        .route("/:sku/tiers", get(get_tier_schedule))
        .route("/:sku/quote", get(get_quote))
}

/// A path segment that cannot be a SKU names no product.
pub(crate) fn parse_sku(raw: &str, kind: &str) -> Result<Sku, Response> {
    Sku::parse(raw)
        .map_err(|_| errors::domain_error_to_response(DomainError::not_found(format!("{kind} {raw}"))))
}

fn parse_quantity(raw: i64) -> Result<u32, Response> {
    u32::try_from(raw)
        .map_err(|_| errors::domain_error_to_response(PricingError::InvalidQuantity(raw).into()))
}

pub async fn list_products(Extension(services): Extension<Arc<AppServices>>) -> Response {
    let pricing = &services.pricing;
    let mut items = Vec::new();
    for product in pricing.catalog().list() {
        match pricing.card_prices(product) {
            Ok(prices) => items.push(dto::ProductCard::new(product, prices)),
            Err(e) => return errors::domain_error_to_response(e.into()),
        }
    }
    Json(dto::ListResponse {
        items,
        last_updated: pricing.catalog().last_updated(),
    })
    .into_response()
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
) -> Response {
    let sku = match parse_sku(&sku, "product") {
        Ok(sku) => sku,
        Err(resp) => return resp,
    };
    match services.pricing.product(&sku) {
        Ok(product) => Json(product).into_response(),
        Err(e) => errors::domain_error_to_response(e.into()),
    }
}

/// Tier table at the current spot; `?quantity=N` marks the row covering `N`.
pub async fn get_tier_schedule(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
    params: Result<Query<dto::TierScheduleParams>, QueryRejection>,
) -> Response {
    let sku = match parse_sku(&sku, "product") {
        Ok(sku) => sku,
        Err(resp) => return resp,
    };
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return errors::bad_query(rejection),
    };
    let quantity = match params.quantity.map(parse_quantity).transpose() {
        Ok(quantity) => quantity,
        Err(resp) => return resp,
    };

    let product = match services.pricing.product(&sku) {
        Ok(product) => product,
        Err(e) => return errors::domain_error_to_response(e.into()),
    };
    // Read the spot once so every row and the echoed price agree.
    let spot_price = services.pricing.spot_price();
    let tiers = match tier_schedule_for_display(product, spot_price) {
        Ok(tiers) => tiers,
        Err(e) => return errors::domain_error_to_response(e.into()),
    };
    let active_tier = match quantity.map(|q| select_tier_or_last(product, q)).transpose() {
        Ok(tier) => tier.map(|t| t.label.clone()),
        Err(e) => return errors::domain_error_to_response(e.into()),
    };

    Json(dto::TierScheduleResponse {
        sku,
        spot_price,
        tiers,
        active_tier,
    })
    .into_response()
}

pub async fn get_quote(
    Extension(services): Extension<Arc<AppServices>>,
    Path(sku): Path<String>,
    params: Result<Query<dto::QuoteParams>, QueryRejection>,
) -> Response {
    let sku = match parse_sku(&sku, "product") {
        Ok(sku) => sku,
        Err(resp) => return resp,
    };
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => return errors::bad_query(rejection),
    };
    let quantity = match parse_quantity(params.quantity) {
        Ok(q) => q,
        Err(resp) => return resp,
    };

    match services.pricing.quote(&sku, quantity) {
        Ok(breakdown) => Json(breakdown).into_response(),
        Err(e) => errors::domain_error_to_response(e.into()),
    }
}
