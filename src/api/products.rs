use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::api::IdQuery;
use crate::error::{ApiError, ApiResult};
use crate::model::product::Product;
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "name": "ThreatScope Pro", "logo_url": ""}]
        }))
    ),
    tag = "Site"
)]
pub async fn list_products(pool: web::Data<SqlitePool>) -> ApiResult {
    let products = sqlx::query_as::<_, Product>(
        "SELECT id, name, description, logo_url FROM products ORDER BY id",
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": products })))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body(content = Object, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Product created", body = Object, example = json!({
            "success": true,
            "id": 4,
            "message": "Product added successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn add_product(pool: web::Data<SqlitePool>, form: FormData) -> ApiResult {
    let name = escape_html(form.value("name"));
    let description = escape_html(form.value("description"));
    let logo_url = form.value("logo_url").to_string();

    if name.is_empty() || description.is_empty() {
        return Err(ApiError::Validation(
            "Name and description are required".to_string(),
        ));
    }

    let done =
        sqlx::query("INSERT INTO products (name, description, logo_url) VALUES (?, ?, ?)")
            .bind(&name)
            .bind(&description)
            .bind(&logo_url)
            .execute(pool.get_ref())
            .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "id": done.last_insert_rowid(),
        "message": "Product added successfully"
    })))
}

#[utoipa::path(
    delete,
    path = "/api/products",
    params(IdQuery),
    responses(
        (status = 200, description = "Product removed", body = Object, example = json!({
            "success": true,
            "message": "Product deleted successfully"
        }))
    ),
    tag = "Site"
)]
pub async fn delete_product(pool: web::Data<SqlitePool>, query: web::Query<IdQuery>) -> ApiResult {
    let product_id = query.require("Product ID required", "Invalid Product ID format")?;

    let done = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(product_id)
        .execute(pool.get_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound("Product not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Product deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, setup_test_db};
    use actix_web::web::Data;

    #[actix_web::test]
    async fn requires_name_and_description() {
        let pool = Data::new(setup_test_db().await);
        let form = FormData::default();

        let err = add_product(pool, form).await.unwrap_err();
        assert_eq!(err.to_string(), "Name and description are required");
    }

    #[actix_web::test]
    async fn add_and_delete_round_trip() {
        let pool = Data::new(setup_test_db().await);
        let mut form = FormData::default();
        form.insert_text("name", "NetTrace");
        form.insert_text("description", "Traffic analysis");

        let body = body_json(add_product(pool.clone(), form).await.unwrap()).await;
        let id = body["id"].as_i64().unwrap();

        let query = web::Query(IdQuery {
            id: Some(id.to_string()),
        });
        let body = body_json(delete_product(pool.clone(), query).await.unwrap()).await;
        assert_eq!(body["message"], "Product deleted successfully");

        let remaining = body_json(list_products(pool).await.unwrap()).await;
        assert_eq!(remaining["data"].as_array().unwrap().len(), 0);
    }
}
