use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tracing::{debug, error, info};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::IdQuery;
use crate::auth::password::hash_password;
use crate::error::{ApiError, ApiResult};
use crate::model::employee::EmployeeProfile;
use crate::utils::db_utils::{build_update_sql, execute_update};
use crate::utils::forms::{FormData, UploadedFile};
use crate::utils::uploads::{file_ext, FileStore, UploadKind};

const PICTURE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif"];

/// `id` and `action` may ride in the query string or the form body; the
/// query string wins when both are present.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UpdateQuery {
    pub id: Option<String>,
    pub action: Option<String>,
}

fn store_picture(store: &FileStore, file: &UploadedFile) -> Result<String, ApiError> {
    let ext = file_ext(&file.file_name);
    if !PICTURE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::Validation(
            "Invalid file type for profile picture. Only JPG, PNG, GIF allowed.".to_string(),
        ));
    }

    let stored_name = format!("{}{}", Uuid::new_v4(), ext);
    store
        .save(UploadKind::ProfilePicture, &stored_name, &file.data)
        .map_err(|e| {
            error!(error = %e, file_name = %file.file_name, "Failed to store profile picture");
            ApiError::Internal
        })
}

/// Empty emails become NULL so the unique index only constrains real
/// addresses.
fn email_or_null(form: &FormData) -> Option<String> {
    let email = form.value("email").trim();
    (!email.is_empty()).then(|| email.to_string())
}

fn conflict_error(e: sqlx::Error, username_msg: &str, email_msg: &str) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if db_err.message().contains("employees.username") {
                return ApiError::Conflict(username_msg.to_string());
            }
            if db_err.message().contains("employees.email") {
                return ApiError::Conflict(email_msg.to_string());
            }
        }
    }
    ApiError::from(e)
}

// -------------------- Handlers --------------------

#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, sorted by name", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "full_name": "John Doe", "username": "jdoe"}]
        }))
    ),
    tag = "Employees"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> ApiResult {
    let employees = sqlx::query_as::<_, EmployeeProfile>(
        "SELECT id, full_name, username, designation, profile_picture_url, email, phone \
         FROM employees ORDER BY full_name",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": employees })))
}

#[utoipa::path(
    post,
    path = "/api/employees",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Employee created", body = Object, example = json!({
            "success": true,
            "id": 7,
            "message": "Employee added successfully."
        })),
        (status = 200, description = "Username taken", body = Object, example = json!({
            "success": false,
            "error": "Username already exists."
        }))
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    form: FormData,
) -> ApiResult {
    let full_name = form.value("full_name");
    let username = form.value("username");
    let password = form.value("password");

    if full_name.is_empty() || username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation(
            "Full name, username, and password are required.".to_string(),
        ));
    }

    // An uploaded picture takes precedence over a pasted URL.
    let profile_picture_url = match form.file("profile_picture_file") {
        Some(file) => store_picture(&store, file)?,
        None => form.value("profile_picture_url").to_string(),
    };

    debug!(%username, has_picture = form.file("profile_picture_file").is_some(), "Adding employee");

    let result = sqlx::query(
        "INSERT INTO employees \
         (full_name, username, password_hash, designation, profile_picture_url, email, phone) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(full_name)
    .bind(username)
    .bind(hash_password(password))
    .bind(form.value("designation"))
    .bind(&profile_picture_url)
    .bind(email_or_null(&form))
    .bind(form.value("phone"))
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) => {
            let id = done.last_insert_rowid();
            info!(employee_id = id, "Employee added successfully");
            Ok(HttpResponse::Ok().json(json!({
                "success": true,
                "id": id,
                "message": "Employee added successfully."
            })))
        }
        Err(e) => Err(conflict_error(
            e,
            "Username already exists.",
            "Email already exists.",
        )),
    }
}

async fn reset_password(pool: &SqlitePool, employee_id: i64, form: &FormData) -> ApiResult {
    let new_password = form.value("password");
    if new_password.is_empty() {
        return Err(ApiError::Validation(
            "New password is required for reset.".to_string(),
        ));
    }

    let done = sqlx::query("UPDATE employees SET password_hash = ? WHERE id = ?")
        .bind(hash_password(new_password))
        .bind(employee_id)
        .execute(pool)
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Failed to reset password.".to_string()));
    }

    info!(employee_id, "Password reset successfully");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Password reset successfully."
    })))
}

#[utoipa::path(
    put,
    path = "/api/employees",
    params(UpdateQuery),
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "success": true,
            "message": "Employee updated successfully."
        })),
        (status = 200, description = "Password reset via ?action=reset_password", body = Object, example = json!({
            "success": true,
            "message": "Password reset successfully."
        }))
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    query: web::Query<UpdateQuery>,
    form: FormData,
) -> ApiResult {
    let id_raw = query
        .id
        .clone()
        .filter(|v| !v.is_empty())
        .or_else(|| form.has_field("id").then(|| form.value("id").to_string()));

    let Some(id_raw) = id_raw else {
        return Err(ApiError::Validation(
            "Employee ID is required for update.".to_string(),
        ));
    };
    let employee_id: i64 = id_raw
        .trim()
        .parse()
        .map_err(|_| ApiError::Validation("Invalid Employee ID format.".to_string()))?;

    let action = query
        .action
        .clone()
        .filter(|v| !v.is_empty())
        .or_else(|| form.has_field("action").then(|| form.value("action").to_string()));

    if action.as_deref() == Some("reset_password") {
        return reset_password(pool.get_ref(), employee_id, &form).await;
    }

    if form.value("full_name").is_empty() || form.value("username").is_empty() {
        return Err(ApiError::Validation(
            "Full name and username are required for update.".to_string(),
        ));
    }

    let mut payload = serde_json::Map::new();
    payload.insert("full_name".to_string(), json!(form.value("full_name")));
    payload.insert("username".to_string(), json!(form.value("username")));
    payload.insert("designation".to_string(), json!(form.value("designation")));
    payload.insert(
        "email".to_string(),
        email_or_null(&form).map_or(Value::Null, Value::String),
    );
    payload.insert("phone".to_string(), json!(form.value("phone")));

    if let Some(file) = form.file("profile_picture_file") {
        payload.insert(
            "profile_picture_url".to_string(),
            json!(store_picture(&store, file)?),
        );
    } else if form.has_field("profile_picture_url") {
        payload.insert(
            "profile_picture_url".to_string(),
            json!(form.value("profile_picture_url")),
        );
    }

    if !form.value("password").is_empty() {
        payload.insert(
            "password_hash".to_string(),
            json!(hash_password(form.value("password"))),
        );
    }

    debug!(employee_id, fields = payload.len(), "Updating employee");

    let update = build_update_sql("employees", &Value::Object(payload), "id", employee_id)?;
    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        conflict_error(
            e,
            "Username already exists for another employee.",
            "Email already exists for another employee.",
        )
    })?;

    if affected == 0 {
        return Err(ApiError::NotFound(
            "Employee not found or no changes made.".to_string(),
        ));
    }

    info!(employee_id, "Employee updated successfully");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee updated successfully."
    })))
}

#[utoipa::path(
    delete,
    path = "/api/employees",
    params(IdQuery),
    responses(
        (status = 200, description = "Employee removed", body = Object, example = json!({
            "success": true,
            "message": "Employee deleted successfully."
        }))
    ),
    tag = "Employees"
)]
pub async fn delete_employee(pool: web::Data<SqlitePool>, query: web::Query<IdQuery>) -> ApiResult {
    let employee_id = query.require(
        "Employee ID is required for delete.",
        "Invalid Employee ID format.",
    )?;

    let done = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Employee not found.".to_string()));
    }

    info!(employee_id, "Employee deleted");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee deleted successfully."
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, setup_test_db, temp_store};
    use actix_web::web::Data;

    fn employee_form(full_name: &str, username: &str, password: &str) -> FormData {
        let mut form = FormData::default();
        form.insert_text("full_name", full_name);
        form.insert_text("username", username);
        form.insert_text("password", password);
        form
    }

    #[actix_web::test]
    async fn create_requires_core_fields() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();
        let mut form = FormData::default();
        form.insert_text("full_name", "Jane");

        let err = create_employee(pool, Data::new(store), form).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Full name, username, and password are required."
        );
    }

    #[actix_web::test]
    async fn duplicate_username_is_a_conflict() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();

        body_json(
            create_employee(
                pool.clone(),
                Data::new(store.clone()),
                employee_form("Jane", "jdoe", "pw"),
            )
            .await
            .unwrap(),
        )
        .await;

        let err = create_employee(
            pool,
            Data::new(store),
            employee_form("Other Jane", "jdoe", "pw2"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Username already exists.");
    }

    #[actix_web::test]
    async fn two_employees_without_email_coexist() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();

        for (name, user) in [("A", "a"), ("B", "b")] {
            let body = body_json(
                create_employee(
                    pool.clone(),
                    Data::new(store.clone()),
                    employee_form(name, user, "pw"),
                )
                .await
                .unwrap(),
            )
            .await;
            assert_eq!(body["success"], true);
        }

        let null_emails: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE email IS NULL")
                .fetch_one(pool.get_ref())
                .await
                .unwrap();
        assert_eq!(null_emails, 2);
    }

    #[actix_web::test]
    async fn duplicate_email_is_a_conflict() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();

        let mut form = employee_form("A", "a", "pw");
        form.insert_text("email", "same@acme.com");
        body_json(create_employee(pool.clone(), Data::new(store.clone()), form).await.unwrap())
            .await;

        let mut form = employee_form("B", "b", "pw");
        form.insert_text("email", "same@acme.com");
        let err = create_employee(pool, Data::new(store), form).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already exists.");
    }

    #[actix_web::test]
    async fn picture_extension_is_checked() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();
        let mut form = employee_form("Jane", "jdoe", "pw");
        form.attach_file("profile_picture_file", "pic.bmp", vec![0u8; 8]);

        let err = create_employee(pool, Data::new(store), form).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type for profile picture. Only JPG, PNG, GIF allowed."
        );
    }

    #[actix_web::test]
    async fn update_renames_and_keeps_password_when_blank() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();

        body_json(
            create_employee(
                pool.clone(),
                Data::new(store.clone()),
                employee_form("Jane", "jdoe", "pw"),
            )
            .await
            .unwrap(),
        )
        .await;
        let hash_before: String =
            sqlx::query_scalar("SELECT password_hash FROM employees WHERE id = 1")
                .fetch_one(pool.get_ref())
                .await
                .unwrap();

        let query = web::Query(UpdateQuery {
            id: Some("1".to_string()),
            action: None,
        });
        let mut form = FormData::default();
        form.insert_text("full_name", "Jane Smith");
        form.insert_text("username", "jdoe");

        let body = body_json(
            update_employee(pool.clone(), Data::new(store), query, form)
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["message"], "Employee updated successfully.");

        let (name, hash_after): (String, String) = sqlx::query_as(
            "SELECT full_name, password_hash FROM employees WHERE id = 1",
        )
        .fetch_one(pool.get_ref())
        .await
        .unwrap();
        assert_eq!(name, "Jane Smith");
        assert_eq!(hash_after, hash_before);
    }

    #[actix_web::test]
    async fn reset_password_action_changes_hash() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();

        body_json(
            create_employee(
                pool.clone(),
                Data::new(store.clone()),
                employee_form("Jane", "jdoe", "old-pw"),
            )
            .await
            .unwrap(),
        )
        .await;
        let hash_before: String =
            sqlx::query_scalar("SELECT password_hash FROM employees WHERE id = 1")
                .fetch_one(pool.get_ref())
                .await
                .unwrap();

        let query = web::Query(UpdateQuery {
            id: Some("1".to_string()),
            action: Some("reset_password".to_string()),
        });
        let mut form = FormData::default();
        form.insert_text("password", "new-pw");

        let body = body_json(
            update_employee(pool.clone(), Data::new(store), query, form)
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["message"], "Password reset successfully.");

        let hash_after: String =
            sqlx::query_scalar("SELECT password_hash FROM employees WHERE id = 1")
                .fetch_one(pool.get_ref())
                .await
                .unwrap();
        assert_ne!(hash_after, hash_before);
    }

    #[actix_web::test]
    async fn update_unknown_employee_is_reported() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();

        let query = web::Query(UpdateQuery {
            id: Some("42".to_string()),
            action: None,
        });
        let mut form = FormData::default();
        form.insert_text("full_name", "Ghost");
        form.insert_text("username", "ghost");

        let err = update_employee(pool, Data::new(store), query, form)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Employee not found or no changes made.");
    }

    #[actix_web::test]
    async fn delete_lifecycle() {
        let pool = Data::new(setup_test_db().await);
        let (store, _dir) = temp_store();

        body_json(
            create_employee(pool.clone(), Data::new(store), employee_form("J", "j", "pw"))
                .await
                .unwrap(),
        )
        .await;

        let query = web::Query(IdQuery {
            id: Some("1".to_string()),
        });
        let body = body_json(delete_employee(pool.clone(), query).await.unwrap()).await;
        assert_eq!(body["message"], "Employee deleted successfully.");

        let query = web::Query(IdQuery {
            id: Some("1".to_string()),
        });
        let err = delete_employee(pool, query).await.unwrap_err();
        assert_eq!(err.to_string(), "Employee not found.");
    }
}
