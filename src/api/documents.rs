use actix_web::{web, HttpResponse};
use chrono::{Local, SubsecRound};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::IdQuery;
use crate::auth::extractor::{EmployeeHint, EmployeeId};
use crate::error::{ApiError, ApiResult};
use crate::model::document::EmployeeDocument;
use crate::utils::forms::FormData;
use crate::utils::sanitize::{escape_html, sanitize_token};
use crate::utils::uploads::{file_ext, FileStore, UploadKind};

const DOCUMENT_EXTENSIONS: &[&str] = &[".pdf", ".jpg", ".jpeg", ".png"];

/// Documents of the authenticated employee, newest upload first
#[utoipa::path(
    get,
    path = "/api/employee/documents",
    responses(
        (status = 200, description = "Uploaded documents", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "document_type": "Passport", "file_name": "scan.pdf"}]
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn list_documents(identity: EmployeeId, pool: web::Data<SqlitePool>) -> ApiResult {
    let documents = sqlx::query_as::<_, EmployeeDocument>(
        "SELECT id, document_type, file_name, file_path, uploaded_at \
         FROM employee_documents WHERE employee_id = ? ORDER BY uploaded_at DESC",
    )
    .bind(identity.0)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": documents })))
}

/// Upload a document for the authenticated employee
#[utoipa::path(
    post,
    path = "/api/employee/documents",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Document stored", body = Object, example = json!({
            "success": true,
            "message": "Document uploaded successfully.",
            "data": {"id": 2, "document_type": "Passport", "file_name": "scan.pdf"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn upload_document(
    identity: EmployeeHint,
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    form: FormData,
) -> ApiResult {
    let employee_id = identity.resolve(&form)?;

    let document_type = escape_html(form.value("document_type"));
    let file = match form.file("document_file") {
        Some(file) if !file.file_name.is_empty() => file,
        _ => {
            return Err(ApiError::Validation(
                "Document type and file are required.".to_string(),
            ))
        }
    };
    if document_type.is_empty() {
        return Err(ApiError::Validation(
            "Document type and file are required.".to_string(),
        ));
    }

    let ext = file_ext(&file.file_name);
    if !DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        return Err(ApiError::Validation(
            "Invalid file type. Allowed: .pdf, .jpg, .jpeg, .png".to_string(),
        ));
    }

    let stored_name = format!("{}_{}{}", sanitize_token(&document_type), Uuid::new_v4(), ext);
    let web_path = store
        .save_scoped(UploadKind::EmployeeDocument, employee_id, &stored_name, &file.data)
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to store employee document");
            ApiError::Internal
        })?;

    let uploaded_at = Local::now().naive_local().trunc_subsecs(0);
    let inserted = sqlx::query(
        "INSERT INTO employee_documents \
         (employee_id, document_type, file_name, file_path, uploaded_at) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(employee_id)
    .bind(&document_type)
    .bind(&file.file_name)
    .bind(&web_path)
    .bind(uploaded_at)
    .execute(pool.get_ref())
    .await;

    let done = match inserted {
        Ok(done) => done,
        Err(e) => {
            // The stored file would otherwise be orphaned.
            store.remove_by_web_path(&web_path);
            return Err(ApiError::from(e));
        }
    };

    info!(employee_id, document_type = %document_type, "Document uploaded");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Document uploaded successfully.",
        "data": {
            "id": done.last_insert_rowid(),
            "document_type": document_type,
            "file_name": file.file_name,
            "file_path": web_path,
            "uploaded_at": uploaded_at
        }
    })))
}

/// Delete a document owned by the authenticated employee
#[utoipa::path(
    delete,
    path = "/api/employee/documents",
    params(IdQuery),
    responses(
        (status = 200, description = "Document deleted", body = Object, example = json!({
            "success": true,
            "message": "Document deleted successfully."
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn delete_document(
    identity: EmployeeId,
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    query: web::Query<IdQuery>,
) -> ApiResult {
    let document_id =
        query.require("Document ID required for delete.", "Invalid Document ID format.")?;

    let file_path: Option<String> = sqlx::query_scalar(
        "SELECT file_path FROM employee_documents WHERE id = ? AND employee_id = ?",
    )
    .bind(document_id)
    .bind(identity.0)
    .fetch_optional(pool.get_ref())
    .await?;

    let file_path = file_path.ok_or_else(|| {
        ApiError::NotFound("Document not found or access denied.".to_string())
    })?;

    sqlx::query("DELETE FROM employee_documents WHERE id = ? AND employee_id = ?")
        .bind(document_id)
        .bind(identity.0)
        .execute(pool.get_ref())
        .await?;

    if file_path.starts_with("/uploads/") {
        store.remove_by_web_path(&file_path);
    }

    info!(employee_id = identity.0, document_id, "Document deleted");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Document deleted successfully."
    })))
}
