use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use bullion_core::DomainError;
use bullion_orders::{OrderError, ValidationErrors};

pub fn domain_error_to_response(err: DomainError) -> Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::NotFound(what) => {
            json_error(StatusCode::NOT_FOUND, "not_found", format!("unknown {what}"))
        }
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::Configuration(msg) => {
            tracing::error!(error = %msg, "reference data cannot serve request");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "configuration_error", msg)
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 400 for a form that failed field validation.
pub fn validation_error(message: &str, errors: &ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        axum::Json(json!({
            "success": false,
            "error": "validation_error",
            "message": message,
            "errors": errors,
        })),
    )
        .into_response()
}

/// 400 for a body that is not the expected JSON shape.
pub fn malformed_body(message: &str, rejection: JsonRejection) -> Response {
    let mut errors = ValidationErrors::new();
    errors.add("body", rejection.body_text());
    validation_error(message, &errors)
}

pub fn bad_query(rejection: QueryRejection) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_query", rejection.body_text())
}

/// Field errors keep their per-field shape; everything else maps by kind.
pub fn order_error_to_response(err: OrderError) -> Response {
    match err {
        OrderError::Invalid(errors) => validation_error("Invalid order data", &errors),
        other => domain_error_to_response(other.into()),
    }
}
