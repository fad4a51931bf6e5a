use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public shape of an employee row. The password hash never leaves the
/// database layer.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "full_name": "John Doe",
        "username": "jdoe",
        "designation": "Security Analyst",
        "profile_picture_url": "/uploads/profile_pictures/a1b2c3.png",
        "email": "john.doe@matricanetworks.com",
        "phone": "+8801712345678"
    })
)]
pub struct EmployeeProfile {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "John Doe")]
    pub full_name: String,

    #[schema(example = "jdoe")]
    pub username: String,

    #[schema(example = "Security Analyst", nullable = true)]
    pub designation: Option<String>,

    #[schema(nullable = true)]
    pub profile_picture_url: Option<String>,

    #[schema(example = "john.doe@matricanetworks.com", nullable = true)]
    pub email: Option<String>,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,
}
