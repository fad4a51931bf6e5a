use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The single current company handbook. Uploading a replacement removes any
/// previous rows and files.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct HandbookFile {
    pub id: i64,

    #[schema(example = "Employee_Handbook_2024.pdf")]
    pub file_name: String,

    #[schema(example = "/uploads/company_handbook/4c1d2e.pdf")]
    pub file_path: String,

    #[schema(value_type = Option<String>, example = "2024-01-10T09:00:00")]
    pub uploaded_at: Option<NaiveDateTime>,
}
