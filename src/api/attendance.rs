use actix_web::{web, HttpResponse};
use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{error, info};
use utoipa::IntoParams;

use crate::auth::extractor::EmployeeId;
use crate::error::{ApiError, ApiResult};
use crate::model::attendance::Attendance;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ActionQuery {
    pub action: Option<String>,
}

/// Attendance row of the authenticated employee for today
#[utoipa::path(
    get,
    path = "/api/employee/attendance",
    responses(
        (status = 200, description = "Today's punches, or null before the first punch", body = Object, example = json!({
            "success": true,
            "data": {"id": 1, "punch_in_time": "2024-01-10T09:00:00", "punch_out_time": null, "date": "2024-01-10"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn get_attendance(identity: EmployeeId, pool: web::Data<SqlitePool>) -> ApiResult {
    let today = Local::now().date_naive();
    let row = sqlx::query_as::<_, Attendance>(
        "SELECT id, punch_in_time, punch_out_time, date \
         FROM attendance WHERE employee_id = ? AND date = ?",
    )
    .bind(identity.0)
    .bind(today)
    .fetch_optional(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": row })))
}

/// Punch in or out for today, selected by `?action=`
#[utoipa::path(
    post,
    path = "/api/employee/attendance",
    params(ActionQuery),
    responses(
        (status = 200, description = "Punch recorded", body = Object, example = json!({
            "success": true,
            "message": "Punched in successfully.",
            "data": {"punch_in_time": "2024-01-10T09:00:00", "date": "2024-01-10"}
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn punch_attendance(
    identity: EmployeeId,
    pool: web::Data<SqlitePool>,
    query: web::Query<ActionQuery>,
) -> ApiResult {
    let today = Local::now().date_naive();
    let now = Local::now().naive_local().trunc_subsecs(0);

    match query.action.as_deref() {
        Some("punch_in") => {
            let result = sqlx::query(
                "INSERT INTO attendance (employee_id, date, punch_in_time) VALUES (?, ?, ?)",
            )
            .bind(identity.0)
            .bind(today)
            .bind(now)
            .execute(pool.get_ref())
            .await;

            match result {
                Ok(_) => {
                    info!(employee_id = identity.0, "Punched in");
                    Ok(HttpResponse::Ok().json(json!({
                        "success": true,
                        "message": "Punched in successfully.",
                        "data": { "punch_in_time": now, "date": today }
                    })))
                }
                Err(e) => {
                    // UNIQUE(employee_id, date) guards one row per day
                    if let sqlx::Error::Database(db_err) = &e {
                        if db_err.is_unique_violation() {
                            return Err(ApiError::Conflict(
                                "Already punched in today.".to_string(),
                            ));
                        }
                    }
                    error!(error = %e, employee_id = identity.0, "Punch-in failed");
                    Err(ApiError::from(e))
                }
            }
        }
        Some("punch_out") => {
            let punch_in: Option<Option<NaiveDateTime>> = sqlx::query_scalar(
                "UPDATE attendance SET punch_out_time = ? \
                 WHERE employee_id = ? AND date = ? AND punch_out_time IS NULL \
                 RETURNING punch_in_time",
            )
            .bind(now)
            .bind(identity.0)
            .bind(today)
            .fetch_optional(pool.get_ref())
            .await?;

            match punch_in {
                Some(punch_in) => {
                    info!(employee_id = identity.0, "Punched out");
                    Ok(HttpResponse::Ok().json(json!({
                        "success": true,
                        "message": "Punched out successfully.",
                        "data": {
                            "punch_in_time": punch_in,
                            "punch_out_time": now,
                            "date": today
                        }
                    })))
                }
                None => Err(ApiError::NotFound(
                    "Not punched in today or already punched out.".to_string(),
                )),
            }
        }
        _ => Err(ApiError::Validation(
            "Invalid action for POST request.".to_string(),
        )),
    }
}
