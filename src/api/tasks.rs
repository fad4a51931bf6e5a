use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::auth::extractor::EmployeeId;
use crate::error::ApiResult;
use crate::model::task::Task;

/// Tasks assigned to the authenticated employee, soonest due first
#[utoipa::path(
    get,
    path = "/api/employee/tasks",
    responses(
        (status = 200, description = "Assigned tasks", body = Object, example = json!({
            "success": true,
            "data": [{"id": 1, "title": "Prepare report", "status": "Pending", "due_date": "2024-02-01"}]
        }))
    ),
    security(("employee_id" = [])),
    tag = "Employee Portal"
)]
pub async fn list_tasks(identity: EmployeeId, pool: web::Data<SqlitePool>) -> ApiResult {
    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, title, description, due_date, status, created_at, updated_at \
         FROM tasks WHERE assigned_to_employee_id = ? \
         ORDER BY due_date ASC, created_at DESC",
    )
    .bind(identity.0)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": tasks })))
}
