use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

/// API failure modes. Every variant renders as HTTP 200 with a
/// `{"success": false, "error": ...}` body; clients branch on the
/// `success` flag, not the transport status.
#[derive(Debug, Display)]
pub enum ApiError {
    /// Missing or malformed input (fields, ids, dates, file types).
    #[display(fmt = "{}", _0)]
    Validation(String),

    /// Rejected login credentials.
    #[display(fmt = "{}", _0)]
    Unauthorized(String),

    /// A unique column is already taken.
    #[display(fmt = "{}", _0)]
    Conflict(String),

    /// Lookup, scoped update or delete matched no row.
    #[display(fmt = "{}", _0)]
    NotFound(String),

    /// Anything unexpected. Logged at the call site; the body never
    /// carries internal detail.
    #[display(fmt = "An internal server error occurred.")]
    Internal,
}

pub type ApiResult = Result<HttpResponse, ApiError>;

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "success": false,
            "error": self.to_string(),
        }))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        ApiError::Internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn error_response_is_http_200_with_flat_envelope() {
        let resp = ApiError::Validation("Name and title are required".into()).error_response();
        assert_eq!(resp.status(), actix_web::http::StatusCode::OK);

        let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Name and title are required");
    }

    #[test]
    fn internal_error_hides_detail() {
        assert_eq!(
            ApiError::Internal.to_string(),
            "An internal server error occurred."
        );
    }
}
