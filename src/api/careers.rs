use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::api::IdQuery;
use crate::error::{ApiError, ApiResult};
use crate::model::career::Career;
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;

struct CareerFields {
    title: String,
    description: String,
    experience_required: i64,
    location: String,
}

/// Shared between create and update; a non-numeric experience value falls
/// back to zero rather than failing the whole submission.
fn career_fields(form: &FormData) -> Result<CareerFields, ApiError> {
    let title = escape_html(form.value("title"));
    let description = escape_html(form.value("description"));
    let location = escape_html(form.value("location"));
    let experience_required = form
        .value("experience_required")
        .trim()
        .parse::<i64>()
        .unwrap_or(0);

    if title.is_empty() || description.is_empty() || location.is_empty() {
        return Err(ApiError::Validation(
            "Title, description, and location are required".to_string(),
        ));
    }

    Ok(CareerFields {
        title,
        description,
        experience_required,
        location,
    })
}

#[utoipa::path(
    get,
    path = "/api/careers",
    responses(
        (status = 200, description = "All career openings", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "title": "Penetration Tester", "location": "Hybrid"}]
        }))
    ),
    tag = "Site"
)]
pub async fn list_careers(pool: web::Data<SqlitePool>) -> ApiResult {
    let careers = sqlx::query_as::<_, Career>(
        "SELECT id, title, description, experience_required, location FROM careers ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": careers })))
}

#[utoipa::path(
    post,
    path = "/api/careers",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Career opening created", body = Object, example = json!({
            "success": true,
            "id": 4,
            "message": "Career opportunity added successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn add_career(pool: web::Data<SqlitePool>, form: FormData) -> ApiResult {
    let fields = career_fields(&form)?;

    let done = sqlx::query(
        "INSERT INTO careers (title, description, experience_required, location) \
         VALUES (?, ?, ?, ?)",
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.experience_required)
    .bind(&fields.location)
    .execute(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "id": done.last_insert_rowid(),
        "message": "Career opportunity added successfully"
    })))
}

#[utoipa::path(
    put,
    path = "/api/careers",
    params(IdQuery),
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Career opening replaced", body = Object, example = json!({
            "success": true,
            "id": 4,
            "message": "Career opportunity updated successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn update_career(
    pool: web::Data<SqlitePool>,
    query: web::Query<IdQuery>,
    form: FormData,
) -> ApiResult {
    // The id is checked before the payload so a bad URL fails fast.
    let career_id = query.require(
        "Career ID required for update",
        "Invalid Career ID format for update",
    )?;
    let fields = career_fields(&form)?;

    let done = sqlx::query(
        "UPDATE careers SET title = ?, description = ?, experience_required = ?, location = ? \
         WHERE id = ?",
    )
    .bind(&fields.title)
    .bind(&fields.description)
    .bind(fields.experience_required)
    .bind(&fields.location)
    .bind(career_id)
    .execute(pool.get_ref())
    .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "Failed to update career opportunity or not found".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "id": career_id,
        "message": "Career opportunity updated successfully"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/careers",
    params(IdQuery),
    responses(
        (status = 200, description = "Career opening removed", body = Object, example = json!({
            "success": true,
            "message": "Career opportunity deleted successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn delete_career(pool: web::Data<SqlitePool>, query: web::Query<IdQuery>) -> ApiResult {
    let career_id = query.require(
        "Career ID required for delete",
        "Invalid Career ID format for delete",
    )?;

    let done = sqlx::query("DELETE FROM careers WHERE id = ?")
        .bind(career_id)
        .execute(pool.get_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "Career opportunity not found".to_string(),
        ));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Career opportunity deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, setup_test_db};
    use actix_web::web::Data;

    fn career_form(title: &str) -> FormData {
        let mut form = FormData::default();
        form.insert_text("title", title);
        form.insert_text("description", "Do security things");
        form.insert_text("location", "Remote");
        form.insert_text("experience_required", "4");
        form
    }

    #[actix_web::test]
    async fn create_then_update_round_trip() {
        let pool = Data::new(setup_test_db().await);

        let body = body_json(add_career(pool.clone(), career_form("Analyst")).await.unwrap()).await;
        let id = body["id"].as_i64().unwrap();

        let query = web::Query(IdQuery {
            id: Some(id.to_string()),
        });
        let body = body_json(
            update_career(pool.clone(), query, career_form("Senior Analyst"))
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["message"], "Career opportunity updated successfully");

        let title: String = sqlx::query_scalar("SELECT title FROM careers WHERE id = ?")
            .bind(id)
            .fetch_one(pool.get_ref())
            .await
            .unwrap();
        assert_eq!(title, "Senior Analyst");
    }

    #[actix_web::test]
    async fn malformed_experience_defaults_to_zero() {
        let pool = Data::new(setup_test_db().await);
        let mut form = FormData::default();
        form.insert_text("title", "Intern");
        form.insert_text("description", "Learn");
        form.insert_text("location", "Office");
        form.insert_text("experience_required", "lots");

        body_json(add_career(pool.clone(), form).await.unwrap()).await;

        let experience: i64 =
            sqlx::query_scalar("SELECT experience_required FROM careers WHERE id = 1")
                .fetch_one(pool.get_ref())
                .await
                .unwrap();
        assert_eq!(experience, 0);
    }

    #[actix_web::test]
    async fn update_requires_numeric_id() {
        let pool = Data::new(setup_test_db().await);
        let query = web::Query(IdQuery {
            id: Some("abc".to_string()),
        });

        let err = update_career(pool, query, career_form("X")).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid Career ID format for update");
    }

    #[actix_web::test]
    async fn delete_unknown_career_is_reported() {
        let pool = Data::new(setup_test_db().await);
        let query = web::Query(IdQuery {
            id: Some("123".to_string()),
        });

        let err = delete_career(pool, query).await.unwrap_err();
        assert_eq!(err.to_string(), "Career opportunity not found");
    }
}
