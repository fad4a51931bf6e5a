use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Full education row, returned after an insert or update.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EducationRecord {
    pub id: i64,
    pub employee_id: i64,

    #[schema(example = "University of Dhaka")]
    pub institution_name: String,

    #[schema(example = "BSc in Computer Science")]
    pub degree: String,

    #[schema(example = 2018, nullable = true)]
    pub year_of_completion: Option<i64>,

    #[schema(nullable = true)]
    pub details: Option<String>,
}

/// List shape: the owning employee is implied by the request identity.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EducationEntry {
    pub id: i64,
    pub institution_name: String,
    pub degree: String,
    pub year_of_completion: Option<i64>,
    pub details: Option<String>,
}
