use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;

/// Admin panel login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body(content = Object, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login accepted", body = Object, example = json!({
            "success": true,
            "message": "Login successful",
            "user": {"username": "psychy", "role": "admin"}
        })),
        (status = 200, description = "Login rejected", body = Object, example = json!({
            "success": false,
            "error": "Invalid username or password"
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "admin_login", skip(config, form))]
pub async fn admin_login(config: web::Data<Config>, form: FormData) -> ApiResult {
    info!("Admin login request received");

    let username = escape_html(form.value("username"));
    let password = form.value("password");

    if username.is_empty() || password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ApiError::Validation(
            "Username and password are required".to_string(),
        ));
    }

    if username != config.admin_username || password != config.admin_password {
        info!("Invalid credentials: admin login rejected");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    info!("Admin login successful");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Login successful",
        "user": {
            "username": username,
            "role": "admin"
        }
    })))
}
