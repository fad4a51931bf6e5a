use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::model::handbook::HandbookFile;
use crate::utils::forms::FormData;
use crate::utils::uploads::{file_ext, FileStore, UploadKind};

/// Swaps the stored handbook inside one transaction and reports the paths of
/// the rows it displaced.
async fn replace_handbook(
    pool: &SqlitePool,
    file_name: &str,
    web_path: &str,
    uploaded_at: NaiveDateTime,
) -> Result<Vec<String>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let old_paths: Vec<String> = sqlx::query_scalar("SELECT file_path FROM company_handbook")
        .fetch_all(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM company_handbook")
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO company_handbook (file_name, file_path, uploaded_at) VALUES (?, ?, ?)",
    )
    .bind(file_name)
    .bind(web_path)
    .bind(uploaded_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(old_paths)
}

/// Current company handbook, if one has been uploaded
#[utoipa::path(
    get,
    path = "/api/handbook",
    responses(
        (status = 200, description = "Latest handbook or null", body = Object, example = json!({
            "success": true,
            "data": {"id": 1, "file_name": "handbook.pdf", "file_path": "/uploads/company_handbook/abc.pdf"}
        }))
    ),
    tag = "Handbook"
)]
pub async fn get_handbook(pool: web::Data<SqlitePool>) -> ApiResult {
    let handbook = sqlx::query_as::<_, HandbookFile>(
        "SELECT id, file_name, file_path, uploaded_at \
         FROM company_handbook ORDER BY id DESC LIMIT 1",
    )
    .fetch_optional(pool.get_ref())
    .await?;

    match handbook {
        Some(handbook) => {
            Ok(HttpResponse::Ok().json(json!({ "success": true, "data": handbook })))
        }
        None => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": null,
            "message": "No handbook uploaded."
        }))),
    }
}

/// Upload a new handbook, replacing any previous one
#[utoipa::path(
    post,
    path = "/api/handbook",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Handbook stored", body = Object, example = json!({
            "success": true,
            "message": "Handbook uploaded successfully.",
            "data": {"file_name": "handbook.pdf", "file_path": "/uploads/company_handbook/abc.pdf"}
        }))
    ),
    tag = "Handbook"
)]
pub async fn upload_handbook(
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
    form: FormData,
) -> ApiResult {
    let file = match form.file("handbook_file") {
        Some(file) if !file.file_name.is_empty() => file,
        _ => return Err(ApiError::Validation("No handbook file provided.".to_string())),
    };

    let ext = file_ext(&file.file_name);
    if ext != ".pdf" {
        return Err(ApiError::Validation(
            "Invalid file type. Only PDF files are allowed for the handbook.".to_string(),
        ));
    }

    let stored_name = format!("{}{}", Uuid::new_v4(), ext);
    let web_path = store
        .save(UploadKind::CompanyHandbook, &stored_name, &file.data)
        .map_err(|e| {
            error!(error = %e, "Failed to store handbook file");
            ApiError::Internal
        })?;

    let uploaded_at = Local::now().naive_local().trunc_subsecs(0);
    let old_paths =
        match replace_handbook(pool.get_ref(), &file.file_name, &web_path, uploaded_at).await {
            Ok(paths) => paths,
            Err(e) => {
                // Roll back the file write, the table never saw the new row.
                store.remove_by_web_path(&web_path);
                return Err(ApiError::from(e));
            }
        };

    for old in &old_paths {
        if old.starts_with("/uploads/") {
            store.remove_by_web_path(old);
        }
    }

    info!(file_name = %file.file_name, "Handbook replaced");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Handbook uploaded successfully.",
        "data": {
            "file_name": file.file_name,
            "file_path": web_path,
            "uploaded_at": uploaded_at
        }
    })))
}

/// Remove the stored handbook
#[utoipa::path(
    delete,
    path = "/api/handbook",
    responses(
        (status = 200, description = "Handbook removed, or nothing to remove", body = Object, example = json!({
            "success": true,
            "message": "Handbook deleted successfully."
        }))
    ),
    tag = "Handbook"
)]
pub async fn delete_handbook(
    pool: web::Data<SqlitePool>,
    store: web::Data<FileStore>,
) -> ApiResult {
    let file_path: Option<String> = sqlx::query_scalar(
        "SELECT file_path FROM company_handbook ORDER BY id DESC LIMIT 1",
    )
    .fetch_optional(pool.get_ref())
    .await?;

    let done = sqlx::query("DELETE FROM company_handbook")
        .execute(pool.get_ref())
        .await?;

    if done.rows_affected() > 0 {
        if let Some(path) = file_path.as_deref() {
            if path.starts_with("/uploads/") {
                store.remove_by_web_path(path);
            }
        }
        info!("Handbook deleted");
        Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Handbook deleted successfully."
        })))
    } else {
        Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "No handbook found to delete or already deleted."
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, setup_test_db, temp_store};
    use actix_web::web::Data;

    fn handbook_form(file_name: &str) -> FormData {
        let mut form = FormData::default();
        form.attach_file("handbook_file", file_name, vec![0x25, 0x50, 0x44, 0x46]);
        form
    }

    #[actix_web::test]
    async fn empty_table_reads_as_null_data() {
        let pool = setup_test_db().await;

        let body = body_json(get_handbook(Data::new(pool)).await.unwrap()).await;
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());
        assert_eq!(body["message"], "No handbook uploaded.");
    }

    #[actix_web::test]
    async fn upload_rejects_non_pdf() {
        let pool = setup_test_db().await;
        let (store, _dir) = temp_store();

        let err = upload_handbook(Data::new(pool), Data::new(store), handbook_form("notes.txt"))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Only PDF files are allowed for the handbook."
        );
    }

    #[actix_web::test]
    async fn upload_replaces_previous_file_and_row() {
        let pool = setup_test_db().await;
        let (store, _dir) = temp_store();

        body_json(
            upload_handbook(
                Data::new(pool.clone()),
                Data::new(store.clone()),
                handbook_form("v1.pdf"),
            )
            .await
            .unwrap(),
        )
        .await;
        let first: String = sqlx::query_scalar("SELECT file_path FROM company_handbook")
            .fetch_one(&pool)
            .await
            .unwrap();
        let first_disk = store.disk_path(&first).unwrap();
        assert!(first_disk.exists());

        body_json(
            upload_handbook(
                Data::new(pool.clone()),
                Data::new(store.clone()),
                handbook_form("v2.pdf"),
            )
            .await
            .unwrap(),
        )
        .await;

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM company_handbook")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
        assert!(!first_disk.exists());

        let body = body_json(get_handbook(Data::new(pool)).await.unwrap()).await;
        assert_eq!(body["data"]["file_name"], "v2.pdf");
    }

    #[actix_web::test]
    async fn delete_twice_stays_successful() {
        let pool = setup_test_db().await;
        let (store, _dir) = temp_store();

        body_json(
            upload_handbook(
                Data::new(pool.clone()),
                Data::new(store.clone()),
                handbook_form("v1.pdf"),
            )
            .await
            .unwrap(),
        )
        .await;
        let path: String = sqlx::query_scalar("SELECT file_path FROM company_handbook")
            .fetch_one(&pool)
            .await
            .unwrap();
        let disk = store.disk_path(&path).unwrap();

        let body = body_json(
            delete_handbook(Data::new(pool.clone()), Data::new(store.clone()))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["message"], "Handbook deleted successfully.");
        assert!(!disk.exists());

        let body = body_json(delete_handbook(Data::new(pool), Data::new(store)).await.unwrap())
            .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "No handbook found to delete or already deleted.");
    }
}
