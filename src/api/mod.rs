use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::ApiError;

pub mod admin_auth;
pub mod attendance;
pub mod careers;
pub mod contacts;
pub mod documents;
pub mod education;
pub mod employee_admin;
pub mod employee_auth;
pub mod handbook;
pub mod leave;
pub mod products;
pub mod profile;
pub mod resources;
pub mod tasks;
pub mod team;

/// `?id=` query parameter shared by the record-level endpoints.
#[derive(Debug, Deserialize, IntoParams)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    /// The id arrives as text; each endpoint owns its missing/invalid wording.
    pub fn require(&self, missing: &str, invalid: &str) -> Result<i64, ApiError> {
        let raw = self.id.as_deref().unwrap_or("").trim();
        if raw.is_empty() {
            return Err(ApiError::Validation(missing.to_string()));
        }
        raw.parse::<i64>()
            .map_err(|_| ApiError::Validation(invalid.to_string()))
    }
}
