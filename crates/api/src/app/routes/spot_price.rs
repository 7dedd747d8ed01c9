use std::sync::Arc;

use axum::{extract::Extension, Json};

use bullion_pricing::format_price;

use crate::app::dto::SpotPriceResponse;
use crate::app::services::AppServices;

pub async fn current(Extension(services): Extension<Arc<AppServices>>) -> Json<SpotPriceResponse> {
    let quote = services.pricing.spot_quote();
    tracing::info!(
        spot_price = %quote.spot_price,
        source = %quote.source,
        is_fallback = quote.is_fallback,
        "spot price requested"
    );
    Json(SpotPriceResponse {
        formatted_spot_price: format_price(quote.spot_price.per_oz()),
        quote,
    })
}
