use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use crate::auth::extractor::{EmployeeHint, EmployeeId};
use crate::error::{ApiError, ApiResult};
use crate::model::employee::EmployeeProfile;
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;
use crate::utils::uploads::{file_ext, FileStore, UploadKind};

const PICTURE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

async fn fetch_profile(
    pool: &SqlitePool,
    employee_id: i64,
) -> Result<Option<EmployeeProfile>, sqlx::Error> {
    sqlx::query_as::<_, EmployeeProfile>(
        "SELECT id, full_name, username, designation, profile_picture_url, email, phone \
         FROM employees WHERE id = ?",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

/// Own profile of the authenticated employee
#[utoipa::path(
    get,
    path = "/api/employee/profile",
    responses(
        (status = 200, description = "Profile for the requesting employee", body = Object, example = json!({
            "success": true,
            "data": {"id": 1, "full_name": "John Doe", "username": "jdoe"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn get_profile(identity: EmployeeId, pool: web::Data<SqlitePool>) -> ApiResult {
    let profile = fetch_profile(pool.get_ref(), identity.0).await?;

    match profile {
        Some(profile) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": profile }))),
        None => Err(ApiError::NotFound("Profile not found.".to_string())),
    }
}

/// Update name, contact details and optionally the profile picture
#[utoipa::path(
    put,
    path = "/api/employee/profile",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Profile updated", body = Object, example = json!({
            "success": true,
            "message": "Profile updated successfully.",
            "data": {"id": 1, "full_name": "John Doe"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn update_profile(
    identity: EmployeeHint,
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    form: FormData,
) -> ApiResult {
    let employee_id = identity.resolve(&form)?;

    let full_name = escape_html(form.value("full_name"));
    let email = escape_html(form.value("email"));
    let phone = escape_html(form.value("phone"));

    // The extension gate runs before anything touches the filesystem.
    let upload = form.file("profile_picture_file");
    let new_picture_ext = match upload {
        Some(file) => {
            let ext = file_ext(&file.file_name);
            if !PICTURE_EXTENSIONS.contains(&ext.as_str()) {
                return Err(ApiError::Validation(
                    "Invalid file type. Only JPG, PNG, GIF allowed.".to_string(),
                ));
            }
            Some(ext)
        }
        None => None,
    };

    if full_name.is_empty() || email.is_empty() {
        return Err(ApiError::Validation(
            "Full name and email are required.".to_string(),
        ));
    }

    // Old picture path is captured up front so it can be removed once the
    // row points at the replacement.
    let old_picture = match upload {
        Some(_) => fetch_profile(pool.get_ref(), employee_id)
            .await?
            .and_then(|p| p.profile_picture_url),
        None => None,
    };

    let new_picture = match (upload, new_picture_ext) {
        (Some(file), Some(ext)) => {
            let stored_name = format!("{}{}", Uuid::new_v4(), ext);
            let web_path = store
                .save(UploadKind::EmployeeProfile, &stored_name, &file.data)
                .map_err(|e| {
                    error!(error = %e, employee_id, "Failed to store profile picture");
                    ApiError::Internal
                })?;
            Some(web_path)
        }
        _ => None,
    };

    let result = match &new_picture {
        Some(web_path) => {
            sqlx::query(
                "UPDATE employees SET full_name = ?, email = ?, phone = ?, \
                 profile_picture_url = ? WHERE id = ?",
            )
            .bind(&full_name)
            .bind(&email)
            .bind(&phone)
            .bind(web_path)
            .bind(employee_id)
            .execute(pool.get_ref())
            .await
        }
        None if form.has_field("profile_picture_url") => {
            sqlx::query(
                "UPDATE employees SET full_name = ?, email = ?, phone = ?, \
                 profile_picture_url = ? WHERE id = ?",
            )
            .bind(&full_name)
            .bind(&email)
            .bind(&phone)
            .bind(escape_html(form.value("profile_picture_url")))
            .bind(employee_id)
            .execute(pool.get_ref())
            .await
        }
        None => {
            sqlx::query("UPDATE employees SET full_name = ?, email = ?, phone = ? WHERE id = ?")
                .bind(&full_name)
                .bind(&email)
                .bind(&phone)
                .bind(employee_id)
                .execute(pool.get_ref())
                .await
        }
    };

    let done = result.map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() && db_err.message().contains("employees.email") {
                return ApiError::Conflict("Email already exists for another user.".to_string());
            }
        }
        ApiError::from(e)
    })?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Failed to update profile.".to_string()));
    }

    if new_picture.is_some() {
        if let Some(old) = old_picture.as_deref() {
            if old.starts_with("/uploads/employee_profiles/") {
                store.remove_by_web_path(old);
            }
        }
    }

    info!(employee_id, "Profile updated successfully");

    let updated = fetch_profile(pool.get_ref(), employee_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Profile updated successfully.",
        "data": updated
    })))
}
