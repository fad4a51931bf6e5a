use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveRequest {
    pub id: i64,

    #[schema(value_type = String, format = "date", example = "2024-02-01")]
    pub start_date: NaiveDate,

    #[schema(value_type = String, format = "date", example = "2024-02-05")]
    pub end_date: NaiveDate,

    #[schema(example = "Family vacation")]
    pub reason: String,

    #[schema(example = "Pending")]
    pub status: String,

    #[schema(value_type = Option<String>, example = "2024-01-20T10:15:00")]
    pub requested_at: Option<NaiveDateTime>,
}
