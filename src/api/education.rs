use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;

use crate::api::IdQuery;
use crate::auth::extractor::{EmployeeHint, EmployeeId};
use crate::error::{ApiError, ApiResult};
use crate::model::education::{EducationEntry, EducationRecord};
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;

struct EducationFields {
    institution_name: String,
    degree: String,
    year_of_completion: Option<i64>,
    details: String,
}

fn education_fields(form: &FormData) -> Result<EducationFields, ApiError> {
    let institution_name = escape_html(form.value("institution_name"));
    let degree = escape_html(form.value("degree"));
    let details = escape_html(form.value("details"));

    if institution_name.is_empty() || degree.is_empty() {
        return Err(ApiError::Validation(
            "Institution name and degree are required.".to_string(),
        ));
    }

    let year_raw = form.value("year_of_completion").trim().to_string();
    let year_of_completion = if year_raw.is_empty() {
        None
    } else {
        match year_raw.parse::<i64>() {
            Ok(year) => Some(year),
            Err(_) => return Err(ApiError::Validation("Invalid year format.".to_string())),
        }
    };

    Ok(EducationFields {
        institution_name,
        degree,
        year_of_completion,
        details,
    })
}

async fn fetch_record(
    pool: &SqlitePool,
    record_id: i64,
) -> Result<Option<EducationRecord>, sqlx::Error> {
    sqlx::query_as::<_, EducationRecord>("SELECT * FROM education_history WHERE id = ?")
        .bind(record_id)
        .fetch_optional(pool)
        .await
}

/// Education history of the authenticated employee, newest degree first
#[utoipa::path(
    get,
    path = "/api/employee/education",
    responses(
        (status = 200, description = "Education records", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "institution_name": "MIT", "degree": "BSc", "year_of_completion": 2019}]
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn list_education(identity: EmployeeId, pool: web::Data<SqlitePool>) -> ApiResult {
    let records = sqlx::query_as::<_, EducationEntry>(
        "SELECT id, institution_name, degree, year_of_completion, details \
         FROM education_history WHERE employee_id = ? \
         ORDER BY year_of_completion DESC, id DESC",
    )
    .bind(identity.0)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": records })))
}

/// Add an education record
#[utoipa::path(
    post,
    path = "/api/employee/education",
    request_body(content = Object, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Record created", body = Object, example = json!({
            "success": true,
            "message": "Education record added.",
            "data": {"id": 3, "institution_name": "MIT", "degree": "BSc"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn add_education(
    identity: EmployeeHint,
    pool: web::Data<SqlitePool>,
    form: FormData,
) -> ApiResult {
    let employee_id = identity.resolve(&form)?;
    let fields = education_fields(&form)?;

    let done = sqlx::query(
        "INSERT INTO education_history \
         (employee_id, institution_name, degree, year_of_completion, details) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(employee_id)
    .bind(&fields.institution_name)
    .bind(&fields.degree)
    .bind(fields.year_of_completion)
    .bind(&fields.details)
    .execute(pool.get_ref())
    .await?;

    let record_id = done.last_insert_rowid();
    info!(employee_id, record_id, "Education record added");

    let record = fetch_record(pool.get_ref(), record_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Education record added.",
        "data": record
    })))
}

/// Update an education record owned by the authenticated employee
#[utoipa::path(
    put,
    path = "/api/employee/education",
    request_body(content = Object, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Record updated", body = Object, example = json!({
            "success": true,
            "message": "Education record updated.",
            "data": {"id": 3, "degree": "MSc"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn update_education(
    identity: EmployeeHint,
    pool: web::Data<SqlitePool>,
    form: FormData,
) -> ApiResult {
    let employee_id = identity.resolve(&form)?;

    let id_raw = form.value("id").trim().to_string();
    if id_raw.is_empty() {
        return Err(ApiError::Validation(
            "Record ID is required for update.".to_string(),
        ));
    }
    let record_id: i64 = id_raw
        .parse()
        .map_err(|_| ApiError::Validation("Invalid Record ID format.".to_string()))?;

    let fields = education_fields(&form)?;

    // Ownership is enforced in the WHERE clause rather than a separate lookup.
    let done = sqlx::query(
        "UPDATE education_history SET institution_name = ?, degree = ?, \
         year_of_completion = ?, details = ? WHERE id = ? AND employee_id = ?",
    )
    .bind(&fields.institution_name)
    .bind(&fields.degree)
    .bind(fields.year_of_completion)
    .bind(&fields.details)
    .bind(record_id)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "Record not found or not owned by user.".to_string(),
        ));
    }

    let record = fetch_record(pool.get_ref(), record_id).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Education record updated.",
        "data": record
    })))
}

/// Delete an education record owned by the authenticated employee
#[utoipa::path(
    delete,
    path = "/api/employee/education",
    params(IdQuery),
    responses(
        (status = 200, description = "Record deleted", body = Object, example = json!({
            "success": true,
            "message": "Education record deleted."
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn delete_education(
    identity: EmployeeId,
    pool: web::Data<SqlitePool>,
    query: web::Query<IdQuery>,
) -> ApiResult {
    let record_id = query.require("Record ID required for delete.", "Invalid Record ID format.")?;

    let done = sqlx::query("DELETE FROM education_history WHERE id = ? AND employee_id = ?")
        .bind(record_id)
        .bind(identity.0)
        .execute(pool.get_ref())
        .await?;

    if done.rows_affected() == 0 {
        return Err(ApiError::NotFound(
            "Record not found or not owned by user.".to_string(),
        ));
    }

    info!(employee_id = identity.0, record_id, "Education record deleted");
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Education record deleted."
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, insert_employee, setup_test_db};
    use actix_web::web::Data;

    fn education_form(institution: &str, degree: &str, year: &str) -> FormData {
        let mut form = FormData::default();
        form.insert_text("institution_name", institution);
        form.insert_text("degree", degree);
        form.insert_text("year_of_completion", year);
        form.insert_text("details", "Graduated with honors");
        form
    }

    #[actix_web::test]
    async fn add_then_list_orders_by_year_desc() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        for (degree, year) in [("BSc", "2015"), ("MSc", "2019")] {
            body_json(
                add_education(
                    EmployeeHint(Some(id)),
                    Data::new(pool.clone()),
                    education_form("MIT", degree, year),
                )
                .await
                .unwrap(),
            )
            .await;
        }

        let body = body_json(
            list_education(EmployeeId(id), Data::new(pool))
                .await
                .unwrap(),
        )
        .await;
        let rows = body["data"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["degree"], "MSc");
        assert_eq!(rows[1]["degree"], "BSc");
    }

    #[actix_web::test]
    async fn add_rejects_non_numeric_year() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let err = add_education(
            EmployeeHint(Some(id)),
            Data::new(pool),
            education_form("MIT", "BSc", "soon"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid year format.");
    }

    #[actix_web::test]
    async fn blank_year_is_stored_as_null() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let body = body_json(
            add_education(
                EmployeeHint(Some(id)),
                Data::new(pool),
                education_form("MIT", "BSc", ""),
            )
            .await
            .unwrap(),
        )
        .await;
        assert!(body["data"]["year_of_completion"].is_null());
    }

    #[actix_web::test]
    async fn update_rejects_other_employees_record() {
        let pool = setup_test_db().await;
        let owner = insert_employee(&pool, "owner", "pw").await;
        let intruder = insert_employee(&pool, "intruder", "pw").await;

        let created = body_json(
            add_education(
                EmployeeHint(Some(owner)),
                Data::new(pool.clone()),
                education_form("MIT", "BSc", "2015"),
            )
            .await
            .unwrap(),
        )
        .await;
        let record_id = created["data"]["id"].as_i64().unwrap();

        let mut form = education_form("Evil U", "PhD", "2020");
        form.insert_text("id", &record_id.to_string());
        let err = update_education(EmployeeHint(Some(intruder)), Data::new(pool), form)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Record not found or not owned by user.");
    }

    #[actix_web::test]
    async fn update_returns_refreshed_record() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let created = body_json(
            add_education(
                EmployeeHint(Some(id)),
                Data::new(pool.clone()),
                education_form("MIT", "BSc", "2015"),
            )
            .await
            .unwrap(),
        )
        .await;
        let record_id = created["data"]["id"].as_i64().unwrap();

        let mut form = education_form("MIT", "MSc", "2019");
        form.insert_text("id", &record_id.to_string());
        let body = body_json(
            update_education(EmployeeHint(Some(id)), Data::new(pool), form)
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["message"], "Education record updated.");
        assert_eq!(body["data"]["degree"], "MSc");
    }

    #[actix_web::test]
    async fn delete_is_scoped_to_owner() {
        let pool = setup_test_db().await;
        let owner = insert_employee(&pool, "owner", "pw").await;
        let intruder = insert_employee(&pool, "intruder", "pw").await;

        let created = body_json(
            add_education(
                EmployeeHint(Some(owner)),
                Data::new(pool.clone()),
                education_form("MIT", "BSc", "2015"),
            )
            .await
            .unwrap(),
        )
        .await;
        let record_id = created["data"]["id"].as_i64().unwrap();

        let query = web::Query(IdQuery {
            id: Some(record_id.to_string()),
        });
        let err = delete_education(EmployeeId(intruder), Data::new(pool.clone()), query)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Record not found or not owned by user.");

        let query = web::Query(IdQuery {
            id: Some(record_id.to_string()),
        });
        let body = body_json(
            delete_education(EmployeeId(owner), Data::new(pool), query)
                .await
                .unwrap(),
        )
        .await;
        assert_eq!(body["message"], "Education record deleted.");
    }
}
