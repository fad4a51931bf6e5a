use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "ThreatScope Pro")]
    pub name: String,

    #[schema(example = "Advanced threat intelligence platform.")]
    pub description: String,

    #[schema(nullable = true)]
    pub logo_url: Option<String>,
}
