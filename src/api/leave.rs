use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDate, SubsecRound};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::extractor::{EmployeeHint, EmployeeId};
use crate::error::{ApiError, ApiResult};
use crate::model::leave_request::LeaveRequest;
use crate::utils::forms::FormData;
use crate::utils::sanitize::escape_html;

fn parse_leave_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        ApiError::Validation("Invalid date format. Please use YYYY-MM-DD.".to_string())
    })
}

/// Leave requests of the authenticated employee, newest first
#[utoipa::path(
    get,
    path = "/api/employee/leave",
    responses(
        (status = 200, description = "Leave history", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "start_date": "2024-02-01", "end_date": "2024-02-05", "status": "Pending"}]
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn list_leave(identity: EmployeeId, pool: web::Data<SqlitePool>) -> ApiResult {
    let requests = sqlx::query_as::<_, LeaveRequest>(
        "SELECT id, start_date, end_date, reason, status, requested_at \
         FROM leave_requests WHERE employee_id = ? ORDER BY requested_at DESC",
    )
    .bind(identity.0)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": requests })))
}

/// Submit a leave request
#[utoipa::path(
    post,
    path = "/api/employee/leave",
    request_body(content = Object, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Request recorded as Pending", body = Object, example = json!({
            "success": true,
            "message": "Leave request submitted.",
            "data": {"id": 2, "start_date": "2024-02-01", "end_date": "2024-02-05", "status": "Pending"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn submit_leave(
    identity: EmployeeHint,
    pool: web::Data<SqlitePool>,
    form: FormData,
) -> ApiResult {
    let employee_id = identity.resolve(&form)?;

    let start_raw = form.value("start_date").trim().to_string();
    let end_raw = form.value("end_date").trim().to_string();
    let reason = escape_html(form.value("reason"));

    if start_raw.is_empty() || end_raw.is_empty() || reason.is_empty() {
        return Err(ApiError::Validation(
            "Start date, end date, and reason are required.".to_string(),
        ));
    }

    let start_date = parse_leave_date(&start_raw)?;
    let end_date = parse_leave_date(&end_raw)?;

    if end_date < start_date {
        return Err(ApiError::Validation(
            "End date cannot be before start date.".to_string(),
        ));
    }
    if start_date < Local::now().date_naive() {
        return Err(ApiError::Validation(
            "Start date cannot be in the past.".to_string(),
        ));
    }

    let requested_at = Local::now().naive_local().trunc_subsecs(0);
    let done = sqlx::query(
        "INSERT INTO leave_requests \
         (employee_id, start_date, end_date, reason, status, requested_at) \
         VALUES (?, ?, ?, ?, 'Pending', ?)",
    )
    .bind(employee_id)
    .bind(start_date)
    .bind(end_date)
    .bind(&reason)
    .bind(requested_at)
    .execute(pool.get_ref())
    .await?;

    let request_id = done.last_insert_rowid();
    info!(employee_id, request_id, "Leave request submitted");

    let request = sqlx::query_as::<_, LeaveRequest>(
        "SELECT id, start_date, end_date, reason, status, requested_at \
         FROM leave_requests WHERE id = ?",
    )
    .bind(request_id)
    .fetch_optional(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Leave request submitted.",
        "data": request
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{body_json, insert_employee, setup_test_db};
    use actix_web::web::Data;

    fn leave_form(start: &str, end: &str, reason: &str) -> FormData {
        let mut form = FormData::default();
        form.insert_text("start_date", start);
        form.insert_text("end_date", end);
        form.insert_text("reason", reason);
        form
    }

    #[actix_web::test]
    async fn submit_then_list_round_trip() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let today = Local::now().date_naive();
        let next_week = today + chrono::Days::new(7);
        let body = body_json(
            submit_leave(
                EmployeeHint(Some(id)),
                Data::new(pool.clone()),
                leave_form(
                    &today.format("%Y-%m-%d").to_string(),
                    &next_week.format("%Y-%m-%d").to_string(),
                    "Family trip",
                ),
            )
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(body["message"], "Leave request submitted.");
        assert_eq!(body["data"]["status"], "Pending");

        let listed = body_json(list_leave(EmployeeId(id), Data::new(pool)).await.unwrap()).await;
        assert_eq!(listed["data"].as_array().unwrap().len(), 1);
        assert_eq!(listed["data"][0]["reason"], "Family trip");
    }

    #[actix_web::test]
    async fn submit_requires_all_fields() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let err = submit_leave(
            EmployeeHint(Some(id)),
            Data::new(pool),
            leave_form("2030-01-01", "", "Vacation"),
        )
        .await
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Start date, end date, and reason are required."
        );
    }

    #[actix_web::test]
    async fn submit_rejects_malformed_dates() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let err = submit_leave(
            EmployeeHint(Some(id)),
            Data::new(pool),
            leave_form("01/02/2030", "2030-02-05", "Vacation"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid date format. Please use YYYY-MM-DD.");
    }

    #[actix_web::test]
    async fn submit_rejects_inverted_range() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let err = submit_leave(
            EmployeeHint(Some(id)),
            Data::new(pool),
            leave_form("2030-02-05", "2030-02-01", "Vacation"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "End date cannot be before start date.");
    }

    #[actix_web::test]
    async fn submit_rejects_past_start() {
        let pool = setup_test_db().await;
        let id = insert_employee(&pool, "jdoe", "pw").await;

        let yesterday = Local::now().date_naive().pred_opt().unwrap();
        let err = submit_leave(
            EmployeeHint(Some(id)),
            Data::new(pool),
            leave_form(
                &yesterday.format("%Y-%m-%d").to_string(),
                &yesterday.format("%Y-%m-%d").to_string(),
                "Vacation",
            ),
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Start date cannot be in the past.");
    }
}
