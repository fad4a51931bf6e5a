use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "title": "Senior Cybersecurity Analyst",
        "description": "Join our threat intelligence team.",
        "experience_required": 5,
        "location": "Remote"
    })
)]
pub struct Career {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Senior Cybersecurity Analyst")]
    pub title: String,

    pub description: String,

    #[schema(example = 5, nullable = true)]
    pub experience_required: Option<i64>,

    #[schema(example = "Remote")]
    pub location: String,
}
