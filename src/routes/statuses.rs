use crate::{
    error::AppError,
    models::{TaskStatus, TaskStatusInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Create a task status.
#[post("")]
pub async fn create_status(
    pool: web::Data<PgPool>,
    status_data: web::Json<TaskStatusInput>,
) -> Result<impl Responder, AppError> {
    status_data.validate()?;

    let status = sqlx::query_as::<_, TaskStatus>(
        "INSERT INTO task_statuses (name) VALUES ($1) RETURNING id, name, created_at",
    )
    .bind(&status_data.name)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(status))
}

/// List all task statuses.
#[get("")]
pub async fn get_statuses(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let statuses = sqlx::query_as::<_, TaskStatus>(
        "SELECT id, name, created_at FROM task_statuses ORDER BY id",
    )
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(statuses))
}

/// Get a task status by id.
#[get("/{id}")]
pub async fn get_status(
    pool: web::Data<PgPool>,
    status_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let status = sqlx::query_as::<_, TaskStatus>(
        "SELECT id, name, created_at FROM task_statuses WHERE id = $1",
    )
    .bind(status_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task status not found".into()))?;

    Ok(HttpResponse::Ok().json(status))
}

/// Update a task status name.
#[put("/{id}")]
pub async fn update_status(
    pool: web::Data<PgPool>,
    status_id: web::Path<i64>,
    status_data: web::Json<TaskStatusInput>,
) -> Result<impl Responder, AppError> {
    status_data.validate()?;

    let status = sqlx::query_as::<_, TaskStatus>(
        "UPDATE task_statuses SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
    )
    .bind(&status_data.name)
    .bind(status_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task status not found".into()))?;

    Ok(HttpResponse::Ok().json(status))
}

/// Delete a task status.
///
/// Fails on the foreign key (surfaced as `400`) while any task still
/// references it.
#[delete("/{id}")]
pub async fn delete_status(
    pool: web::Data<PgPool>,
    status_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM task_statuses WHERE id = $1")
        .bind(status_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Task status not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
