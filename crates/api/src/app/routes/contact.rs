use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    response::{IntoResponse, Response},
    Json,
};

use bullion_orders::{ContactRequest, Notifier};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn submit_contact(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ContactRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::malformed_body("Invalid contact data", rejection),
    };

    let contact = match request.validate() {
        Ok(contact) => contact,
        Err(errs) => return errors::validation_error("Invalid contact data", &errs),
    };

    tracing::info!(from = %contact.email, subject = %contact.subject, "contact message received");
    services
        .notifier
        .send_or_log(&services.mail.contact_notification(&contact));

    Json(dto::ContactResponse {
        success: true,
        message: dto::CONTACT_RECEIVED_MESSAGE,
    })
    .into_response()
}
