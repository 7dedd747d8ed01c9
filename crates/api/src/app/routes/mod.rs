use axum::{
    routing::{get, post},
    Router,
};

pub mod coins;
pub mod contact;
pub mod orders;
pub mod products;
pub mod spot_price;
pub mod system;

/// Router for the public `/api` endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/spot-price", get(spot_price::current))
        .nest("/products", products::router())
        .nest("/coins", coins::router())
        .route("/orders", post(orders::submit_order))
        .route("/contact", post(contact::submit_contact))
}
