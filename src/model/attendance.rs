use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One employee-day punch record. `punch_out_time` stays null until the
/// employee punches out.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: i64,

    #[schema(value_type = Option<String>, example = "2024-01-10T09:00:00")]
    pub punch_in_time: Option<NaiveDateTime>,

    #[schema(value_type = Option<String>, example = "2024-01-10T18:00:00")]
    pub punch_out_time: Option<NaiveDateTime>,

    #[schema(value_type = String, format = "date", example = "2024-01-10")]
    pub date: NaiveDate,
}
