use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use bullion_orders::{reserve, Notifier, OrderRequest};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

/// Reserve a product or listed-coin order; payment follows by wire transfer.
///
/// The order is repriced from the current spot quote. Email delivery failures
/// are logged and do not affect the response.
pub async fn submit_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::malformed_body("Invalid order data", rejection),
    };

    let reservation = match reserve(
        &services.pricing,
        &services.coins,
        &request,
        &services.policy,
        Utc::now(),
    ) {
        Ok(r) => r,
        Err(e) => {
            tracing::info!(
                error = %e,
                product = %request.product,
                coin_sku = request.coin_sku.as_deref(),
                "order rejected"
            );
            return errors::order_error_to_response(e);
        }
    };

    services
        .notifier
        .send_or_log(&services.mail.order_admin_notification(&reservation));
    services
        .notifier
        .send_or_log(&services.mail.order_customer_confirmation(&reservation));

    Json(dto::OrderResponse::from(reservation)).into_response()
}
