use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument};

use crate::auth::password::verify_password;
use crate::error::{ApiError, ApiResult};
use crate::utils::forms::FormData;

/// Employee row as fetched for authentication. The hash stays in this
/// module; the response is built from the remaining fields.
#[derive(sqlx::FromRow)]
struct EmployeeAuthRow {
    id: i64,
    full_name: String,
    username: String,
    password_hash: String,
    designation: Option<String>,
    profile_picture_url: Option<String>,
    email: Option<String>,
    phone: Option<String>,
}

/// Employee portal login
#[utoipa::path(
    post,
    path = "/api/employee/login",
    request_body(content = Object, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login accepted", body = Object, example = json!({
            "success": true,
            "employee": {
                "id": 1,
                "full_name": "John Doe",
                "username": "jdoe",
                "designation": "Security Analyst",
                "profile_picture_url": null,
                "email": "john@matricanetworks.com",
                "phone": null
            }
        })),
        (status = 200, description = "Login rejected", body = Object, example = json!({
            "success": false,
            "error": "Invalid username or password."
        }))
    ),
    tag = "Auth"
)]
#[instrument(name = "employee_login", skip(pool, form))]
pub async fn employee_login(pool: web::Data<SqlitePool>, form: FormData) -> ApiResult {
    info!("Employee login request received");

    // 1️⃣ Basic validation
    let username = form.value("username").trim().to_string();
    let password = form.value("password").trim().to_string();

    if username.is_empty() || password.is_empty() {
        info!("Validation failed: empty username or password");
        return Err(ApiError::Validation(
            "Username and password are required.".to_string(),
        ));
    }

    // 2️⃣ Fetch employee
    debug!(%username, "Fetching employee from database");

    let row = sqlx::query_as::<_, EmployeeAuthRow>(
        "SELECT id, full_name, username, password_hash, designation, profile_picture_url, \
         email, phone FROM employees WHERE username = ?",
    )
    .bind(&username)
    .fetch_optional(pool.get_ref())
    .await?;

    let Some(employee) = row else {
        info!("Invalid credentials: employee not found");
        return Err(ApiError::Unauthorized(
            "Invalid username or password.".to_string(),
        ));
    };

    // 3️⃣ Verify password
    debug!(employee_id = employee.id, "Verifying password");

    if !verify_password(&password, &employee.password_hash) {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized(
            "Invalid username or password.".to_string(),
        ));
    }

    info!(employee_id = employee.id, "Employee authenticated successfully");

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "employee": {
            "id": employee.id,
            "full_name": employee.full_name,
            "username": employee.username,
            "designation": employee.designation,
            "profile_picture_url": employee.profile_picture_url,
            "email": employee.email,
            "phone": employee.phone
        }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, insert_employee, setup_test_db};
    use actix_web::web::Data;

    fn login_form(username: &str, password: &str) -> FormData {
        let mut form = FormData::default();
        form.insert_text("username", username);
        form.insert_text("password", password);
        form
    }

    #[actix_web::test]
    async fn valid_credentials_return_employee_without_hash() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "secret123").await;

        let body = body_json(
            employee_login(Data::new(pool), login_form("jdoe", "secret123"))
                .await
                .unwrap(),
        )
        .await;

        assert_eq!(body["success"], true);
        assert_eq!(body["employee"]["id"], id);
        assert_eq!(body["employee"]["username"], "jdoe");
        assert!(body["employee"].get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn unknown_user_and_bad_password_read_the_same() {
        let pool = setup_test_db().await;
        insert_employee(&pool, "jdoe", "secret123").await;

        let err = employee_login(Data::new(pool.clone()), login_form("ghost", "secret123"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password.");

        let err = employee_login(Data::new(pool), login_form("jdoe", "wrong"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid username or password.");
    }

    #[actix_web::test]
    async fn credentials_are_trimmed() {
        let pool = setup_test_db().await;
        insert_employee(&pool, "jdoe", "secret123").await;

        let body = body_json(
            employee_login(Data::new(pool), login_form("  jdoe  ", " secret123 "))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["success"], true);
    }

    #[actix_web::test]
    async fn missing_fields_are_rejected() {
        let pool = setup_test_db().await;

        let err = employee_login(Data::new(pool), login_form("jdoe", ""))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Username and password are required.");
    }
}
