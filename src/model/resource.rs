use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A published knowledge-base entry. `type` is one of `Blog`, `Case Study`
/// or `Technical Aspect`.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "title": "Understanding MITRE ATT&CK Framework",
        "type": "Blog",
        "content": "Comprehensive guide to implementing MITRE ATT&CK.",
        "file_path": "/uploads/resources/9f8e7d.pdf"
    })
)]
pub struct Resource {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Understanding MITRE ATT&CK Framework")]
    pub title: String,

    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    #[schema(example = "Blog")]
    pub resource_type: String,

    pub content: String,

    #[schema(nullable = true)]
    pub file_path: Option<String>,
}
