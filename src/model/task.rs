use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Task {
    pub id: i64,

    #[schema(example = "Prepare quarterly pentest report")]
    pub title: String,

    #[schema(nullable = true)]
    pub description: Option<String>,

    #[schema(value_type = Option<String>, format = "date", example = "2024-03-31")]
    pub due_date: Option<NaiveDate>,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(value_type = Option<String>)]
    pub created_at: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>)]
    pub updated_at: Option<NaiveDateTime>,
}
