use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::api::IdQuery;
use crate::error::{ApiError, ApiResult};
use crate::model::team_member::TeamMember;
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;

#[utoipa::path(
    get,
    path = "/api/team",
    responses(
        (status = 200, description = "All team members", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "name": "John Smith", "title": "CEO & Founder"}]
        }))
    ),
    tag = "Site"
)]
pub async fn list_team(pool: web::Data<SqlitePool>) -> ApiResult {
    let members = sqlx::query_as::<_, TeamMember>(
        "SELECT id, name, title, bio, photo_url FROM team ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": members })))
}

#[utoipa::path(
    post,
    path = "/api/team",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Team member created", body = Object, example = json!({
            "success": true,
            "id": 4,
            "message": "Team member added successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn add_team_member(pool: web::Data<SqlitePool>, form: FormData) -> ApiResult {
    let name = escape_html(form.value("name"));
    let title = escape_html(form.value("title"));
    let bio = escape_html(form.value("bio"));
    // photo_url is a plain URL, not display text
    let photo_url = form.value("photo_url").to_string();

    if name.is_empty() || title.is_empty() {
        return Err(ApiError::Validation(
            "Name and title are required".to_string(),
        ));
    }

    let done = sqlx::query("INSERT INTO team (name, title, bio, photo_url) VALUES (?, ?, ?, ?)")
        .bind(&name)
        .bind(&title)
        .bind(&bio)
        .bind(&photo_url)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "id": done.last_insert_rowid(),
        "message": "Team member added successfully"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/team",
    params(IdQuery),
    responses(
        (status = 200, description = "Team member removed", body = Object, example = json!({
            "success": true,
            "message": "Team member deleted successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn delete_team_member(
    pool: web::Data<SqlitePool>,
    query: web::Query<IdQuery>,
) -> ApiResult {
    let member_id = query.require("Member ID required", "Invalid Member ID format")?;

    let done = sqlx::query("DELETE FROM team WHERE id = ?")
        .bind(member_id)
        .execute(pool.get_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Team member not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Team member deleted successfully"
    })))
}
