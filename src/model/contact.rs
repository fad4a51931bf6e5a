use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Jane Doe",
        "email": "jane.doe@example.com",
        "phone": "+8801712345678",
        "company": "Acme Corp",
        "subject": "Partnership inquiry",
        "message": "We would like to discuss a security assessment.",
        "timestamp": "2024-01-10T09:00:00"
    })
)]
pub struct Contact {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Jane Doe")]
    pub name: String,

    #[schema(example = "jane.doe@example.com")]
    pub email: String,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = "Acme Corp", nullable = true)]
    pub company: Option<String>,

    #[schema(example = "Partnership inquiry", nullable = true)]
    pub subject: Option<String>,

    #[schema(example = "We would like to discuss a security assessment.")]
    pub message: String,

    #[schema(value_type = Option<String>, example = "2024-01-10T09:00:00")]
    pub timestamp: Option<NaiveDateTime>,
}
