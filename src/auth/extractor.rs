use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};

use crate::error::ApiError;
use crate::utils::forms::FormData;

pub const EMPLOYEE_ID_HEADER: &str = "X-Employee-ID";

const MISSING: &str = "Authentication required: Employee ID missing.";
const INVALID: &str = "Invalid Employee ID format.";

fn query_param(query: &str, name: &str) -> Option<String> {
    serde_urlencoded::from_str::<Vec<(String, String)>>(query)
        .ok()?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// Header takes precedence over the `employee_id` query parameter.
/// `Ok(None)` means no id was supplied anywhere.
fn employee_id_from_parts(header: Option<&str>, query: &str) -> Result<Option<i64>, ApiError> {
    let raw = header
        .map(str::to_string)
        .filter(|value| !value.trim().is_empty())
        .or_else(|| query_param(query, "employee_id").filter(|value| !value.trim().is_empty()));

    match raw {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::Validation(INVALID.to_string())),
        None => Ok(None),
    }
}

fn header_value<'r>(req: &'r HttpRequest) -> Option<&'r str> {
    req.headers()
        .get(EMPLOYEE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// The authenticated employee for portal endpoints. Rejects the request
/// before the handler runs when the id is absent or malformed.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeId(pub i64);

impl FromRequest for EmployeeId {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved = employee_id_from_parts(header_value(req), req.query_string())
            .and_then(|id| id.ok_or_else(|| ApiError::Validation(MISSING.to_string())))
            .map(EmployeeId);
        ready(resolved)
    }
}

/// Like [`EmployeeId`], but tolerates an absent id so the handler can fall
/// back to an `employee_id` form field. A malformed id still fails fast.
#[derive(Debug, Clone, Copy)]
pub struct EmployeeHint(pub Option<i64>);

impl EmployeeHint {
    pub fn resolve(&self, form: &FormData) -> Result<i64, ApiError> {
        if let Some(id) = self.0 {
            return Ok(id);
        }

        let raw = form.value("employee_id").trim();
        if raw.is_empty() {
            return Err(ApiError::Validation(MISSING.to_string()));
        }
        raw.parse::<i64>()
            .map_err(|_| ApiError::Validation(INVALID.to_string()))
    }
}

impl FromRequest for EmployeeHint {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let resolved =
            employee_id_from_parts(header_value(req), req.query_string()).map(EmployeeHint);
        ready(resolved)
    }
}
