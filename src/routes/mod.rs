use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use serde::Serialize;

use crate::services::ServiceError;

pub mod catalog;
pub mod categories;
pub mod dashboard;
pub mod orders;
pub mod products;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            code: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Body of successful deletions.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Translate a service failure into its HTTP response.
///
/// `action` describes what was attempted and is used for 500 responses.
pub fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            HttpResponse::Unauthorized().json(ErrorBody::new("Unauthorized"))
        }
        ServiceError::Form(message) => HttpResponse::BadRequest()
            .json(ErrorBody::new("Validation failed").with_details(message)),
        ServiceError::InvalidRequest(message) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        ServiceError::NotFound(message) => HttpResponse::NotFound().json(ErrorBody::new(message)),
        ServiceError::Conflict(message) => HttpResponse::Conflict().json(ErrorBody::new(message)),
        ServiceError::Repository(err) => {
            log::error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody {
                error: format!("Failed to {action}"),
                details: Some(err.to_string()),
                code: err.diagnostic_code().map(str::to_string),
            })
        }
    }
}

/// Malformed JSON bodies answer with the JSON error body instead of plain text.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ErrorBody::new("Invalid request body").with_details(err.to_string()));
    InternalError::from_response(err, response).into()
}

/// Non-numeric ids answer with 400 instead of 404.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response =
        HttpResponse::BadRequest().json(ErrorBody::new("Invalid id").with_details(err.to_string()));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = HttpResponse::BadRequest()
        .json(ErrorBody::new("Invalid query string").with_details(err.to_string()));
    InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    use crate::repository::RepositoryError;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (
                ServiceError::Form("name: length".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::InvalidRequest("product 3 is referenced".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::NotFound("missing".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::Conflict("taken".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::Repository(RepositoryError::MissingSchema(
                    "no such table".to_string(),
                )),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(error_response(err, "load").status(), status);
        }
    }

    #[test]
    fn error_body_omits_empty_fields() {
        let body = serde_json::to_value(ErrorBody::new("Category not found"))
            .expect("serializable body");
        assert_eq!(body, serde_json::json!({ "error": "Category not found" }));
    }
}
