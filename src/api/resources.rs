use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;
use uuid::Uuid;

use crate::api::IdQuery;
use crate::error::{ApiError, ApiResult};
use crate::model::resource::Resource;
use crate::utils::forms::{FormData, UploadedFile};
use crate::utils::sanitize::escape_html;
use crate::utils::uploads::{file_ext, FileStore, UploadKind};

const ALLOWED_EXTENSIONS: &[&str] = &[".pdf", ".doc", ".docx", ".txt"];
const VALID_TYPES: &[&str] = &["Blog", "Case Study", "Technical Aspect"];

fn resource_fields(form: &FormData) -> Result<(String, String, String), ApiError> {
    let title = escape_html(form.value("title").trim());
    let resource_type = escape_html(form.value("type").trim());
    let content = escape_html(form.value("content").trim());

    if title.is_empty() || resource_type.is_empty() || content.is_empty() {
        return Err(ApiError::Validation(
            "Title, type, and content are required".to_string(),
        ));
    }

    Ok((title, resource_type, content))
}

fn store_attachment(store: &FileStore, file: &UploadedFile) -> Result<String, ApiError> {
    let ext = file_ext(&file.file_name);
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::Validation(
            "Only PDF, DOC, DOCX, and TXT files are allowed".to_string(),
        ));
    }

    let stored_name = format!("{}{}", Uuid::new_v4(), ext);
    store
        .save(UploadKind::Resource, &stored_name, &file.data)
        .map_err(|e| {
            error!(error = %e, file_name = %file.file_name, "Failed to store resource attachment");
            ApiError::Internal
        })
}

// -------------------- Handlers --------------------

#[utoipa::path(
    get,
    path = "/api/resources",
    responses(
        (status = 200, description = "All published resources", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "title": "Understanding MITRE ATT&CK Framework", "type": "Blog"}]
        }))
    ),
    tag = "Site"
)]
pub async fn list_resources(pool: web::Data<SqlitePool>) -> ApiResult {
    let resources = sqlx::query_as::<_, Resource>(
        "SELECT id, title, type, content, file_path FROM resources ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": resources })))
}

#[utoipa::path(
    post,
    path = "/api/resources",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Resource created", body = Object, example = json!({
            "success": true,
            "id": 4,
            "message": "Resource added successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn add_resource(
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    form: FormData,
) -> ApiResult {
    let (title, resource_type, content) = resource_fields(&form)?;

    let file_path = match form.file("file") {
        Some(file) => store_attachment(&store, file)?,
        None => String::new(),
    };

    let done = sqlx::query(
        "INSERT INTO resources (title, type, content, file_path) VALUES (?, ?, ?, ?)",
    )
    .bind(&title)
    .bind(&resource_type)
    .bind(&content)
    .bind(&file_path)
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "id": done.last_insert_rowid(),
        "message": "Resource added successfully"
    })))
}

#[utoipa::path(
    put,
    path = "/api/resources",
    params(IdQuery),
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Resource replaced", body = Object, example = json!({
            "success": true,
            "message": "Resource updated successfully"
        })),
        (status = 200, description = "Unknown id", body = Object, example = json!({
            "success": false,
            "error": "Resource not found"
        }))
    ),
    tag = "Site"
)]
pub async fn update_resource(
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    query: web::Query<IdQuery>,
    form: FormData,
) -> ApiResult {
    let resource_id = query.require("Resource ID required for update", "Invalid Resource ID format")?;
    let (title, resource_type, content) = resource_fields(&form)?;

    if !VALID_TYPES.contains(&resource_type.as_str()) {
        return Err(ApiError::Validation(format!(
            "Type must be one of: {}",
            VALID_TYPES.join(", ")
        )));
    }

    let old_path: Option<Option<String>> =
        sqlx::query_scalar("SELECT file_path FROM resources WHERE id = ?")
            .bind(resource_id)
            .fetch_optional(pool.get_ref())
            .await?;
    let Some(old_path) = old_path else {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    };

    // The old attachment is only removed once the row points at the new one.
    let replacement = match form.file("file") {
        Some(file) => Some(store_attachment(&store, file)?),
        None => None,
    };
    let file_path = replacement
        .clone()
        .or_else(|| old_path.clone())
        .unwrap_or_default();

    let done = sqlx::query(
        "UPDATE resources SET title = ?, type = ?, content = ?, file_path = ? WHERE id = ?",
    )
    .bind(&title)
    .bind(&resource_type)
    .bind(&content)
    .bind(&file_path)
    .bind(resource_id)
    .execute(pool.get_ref())
    .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }

    if replacement.is_some() {
        if let Some(old) = old_path.as_deref() {
            if old.starts_with("/uploads/") {
                store.remove_by_web_path(old);
            }
        }
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Resource updated successfully"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/resources",
    params(IdQuery),
    responses(
        (status = 200, description = "Resource removed", body = Object, example = json!({
            "success": true,
            "message": "Resource deleted successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn delete_resource(
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    query: web::Query<IdQuery>,
) -> ApiResult {
    let resource_id = query.require("Resource ID required", "Invalid Resource ID format")?;

    let old_path: Option<Option<String>> =
        sqlx::query_scalar("SELECT file_path FROM resources WHERE id = ?")
            .bind(resource_id)
            .fetch_optional(pool.get_ref())
            .await?;

    let done = sqlx::query("DELETE FROM resources WHERE id = ?")
        .bind(resource_id)
        .execute(pool.get_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }

    if let Some(Some(old)) = old_path {
        if old.starts_with("/uploads/") {
            store.remove_by_web_path(&old);
        }
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Resource deleted successfully"
    })))
}
