use actix_web::{web, HttpResponse};
use chrono::Local;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::error;

use crate::error::{ApiError, ApiResult};
use crate::model::contact::Contact;
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;

/// List contact submissions, newest first
#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "All contact submissions", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "name": "Jane Doe", "email": "jane@acme.com", "message": "Hello"}]
        }))
    ),
    tag = "Site"
)]
pub async fn list_contacts(pool: web::Data<SqlitePool>) -> ApiResult {
    let contacts = sqlx::query_as::<_, Contact>(
        "SELECT id, name, email, phone, company, subject, message, timestamp \
         FROM contacts ORDER BY timestamp DESC",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": contacts })))
}

/// Contact form submission
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body(content = Object, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Submission stored", body = Object, example = json!({
            "success": true,
            "message": "Thank you for your message! We will get back to you soon.",
            "id": 7
        })),
        (status = 200, description = "Validation failure", body = Object, example = json!({
            "success": false,
            "error": "Name, email, and message are required"
        }))
    ),
    tag = "Site"
)]
pub async fn submit_contact(pool: web::Data<SqlitePool>, form: FormData) -> ApiResult {
    // Markup is neutralized at write time so the admin views stay inert.
    let name = escape_html(form.value("name").trim());
    let email = form.value("email").trim().to_string();
    let phone = form.value("phone").trim().to_string();
    let company = escape_html(form.value("company").trim());
    let subject = escape_html(form.value("subject").trim());
    let message = escape_html(form.value("message").trim());

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ApiError::Validation(
            "Name, email, and message are required".to_string(),
        ));
    }

    if !email.contains('@') || !email.contains('.') {
        return Err(ApiError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }

    let result = sqlx::query(
        "INSERT INTO contacts (name, email, phone, company, subject, message, timestamp) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&name)
    .bind(&email)
    .bind(&phone)
    .bind(&company)
    .bind(&subject)
    .bind(&message)
    .bind(Local::now().naive_local())
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(done) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Thank you for your message! We will get back to you soon.",
            "id": done.last_insert_rowid()
        }))),
        Err(e) => {
            error!(error = %e, "Failed to store contact submission");
            Ok(HttpResponse::Ok().json(json!({
                "success": false,
                "error": "Failed to save your message. Please try again."
            })))
        }
    }
}
