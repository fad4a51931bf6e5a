use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "John Smith",
        "title": "CEO & Founder",
        "bio": "Cybersecurity expert with 15+ years experience",
        "photo_url": "/uploads/profile_pictures/a1b2c3.jpg"
    })
)]
pub struct TeamMember {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "John Smith")]
    pub name: String,

    #[schema(example = "CEO & Founder")]
    pub title: String,

    #[schema(nullable = true)]
    pub bio: Option<String>,

    #[schema(nullable = true)]
    pub photo_url: Option<String>,
}
