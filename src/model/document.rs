use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeDocument {
    pub id: i64,

    #[schema(example = "NID")]
    pub document_type: String,

    #[schema(example = "national_id.pdf")]
    pub file_name: String,

    #[schema(example = "/uploads/employee_documents/7/NID_9f8e7d.pdf")]
    pub file_path: String,

    #[schema(value_type = Option<String>, example = "2024-01-10T09:00:00")]
    pub uploaded_at: Option<NaiveDateTime>,
}
