use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder, Response};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Serialize;

/// Wire shape of every error the API produces: `{error, details?}`.
#[derive(Serialize, Debug)]
pub struct ApiError {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl ApiError {
    pub(crate) fn new(error: String) -> ApiError {
        ApiError {
            error,
            details: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ErrorResponse {
    json: Json<ApiError>,
    status: Status,
}

impl ErrorResponse {
    pub(crate) fn new(status: Status, error: String) -> ErrorResponse {
        ErrorResponse {
            json: Json(ApiError::new(error)),
            status,
        }
    }

    pub(crate) fn with_details(status: Status, error: &str, details: String) -> ErrorResponse {
        ErrorResponse {
            json: Json(ApiError {
                error: error.to_string(),
                details: Some(details),
            }),
            status,
        }
    }

    pub(crate) fn validation(message: &str) -> ErrorResponse {
        ErrorResponse::new(Status::BadRequest, message.to_string())
    }

    pub(crate) fn unauthorized(message: &str) -> ErrorResponse {
        ErrorResponse::new(Status::Unauthorized, message.to_string())
    }

    pub(crate) fn forbidden(message: &str) -> ErrorResponse {
        ErrorResponse::new(Status::Forbidden, message.to_string())
    }

    pub(crate) fn not_found(message: &str) -> ErrorResponse {
        ErrorResponse::new(Status::NotFound, message.to_string())
    }

    /// Persistence capability is unconfigured. Still a 500 on the wire,
    /// but with a message distinct from any store fault.
    pub(crate) fn service_unavailable(message: &str) -> ErrorResponse {
        ErrorResponse::new(Status::InternalServerError, message.to_string())
    }

    pub(crate) fn internal(message: &str) -> ErrorResponse {
        ErrorResponse::new(Status::InternalServerError, message.to_string())
    }
}

impl<'r> Responder<'r, 'r> for ErrorResponse {
    fn respond_to(self, req: &'r Request) -> response::Result<'r> {
        Response::build_from(self.json.respond_to(req)?)
            .status(self.status)
            .header(ContentType::JSON)
            .ok()
    }
}

/// Requests that never reach a handler (bad routes, failed data guards)
/// still get a JSON error body.
#[catch(default)]
pub(crate) fn default_catcher(status: Status, _req: &Request) -> ErrorResponse {
    ErrorResponse::new(status, status.reason_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_serializes_without_empty_details() {
        let body = serde_json::to_string(&ApiError::new("Name is required".to_string())).unwrap();
        assert_eq!(body, r#"{"error":"Name is required"}"#);
    }

    #[test]
    fn api_error_serializes_details_when_present() {
        let err = ApiError {
            error: "Failed to add item".to_string(),
            details: Some("connection reset".to_string()),
        };
        let body = serde_json::to_string(&err).unwrap();
        assert_eq!(
            body,
            r#"{"error":"Failed to add item","details":"connection reset"}"#
        );
    }
}
