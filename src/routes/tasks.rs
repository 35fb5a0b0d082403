use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{Label, Task, TaskInput, TaskQuery, TaskResponse},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const TASK_COLUMNS: &str = "id, name, description, task_status_id, author_id, executor_id, created_at";

/// Retrieves the task list, optionally filtered.
///
/// Supports equality filters on `status` (status id), `executor` (user id),
/// `author` (user id), and `label` (label id). Conditions are appended
/// dynamically and bound positionally; the label filter joins the
/// `task_labels` table.
///
/// ## Responses:
/// - `200 OK`: a JSON array of tasks with their label sets.
/// - `401 Unauthorized`: missing or invalid token.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<PgPool>,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let mut sql = String::from(
        "SELECT DISTINCT t.id, t.name, t.description, t.task_status_id, t.author_id, \
         t.executor_id, t.created_at FROM tasks t",
    );
    if query_params.label.is_some() {
        sql.push_str(" JOIN task_labels tl ON tl.task_id = t.id");
    }

    let mut param_count = 1;
    let mut conditions: Vec<String> = Vec::new();

    if query_params.status.is_some() {
        conditions.push(format!("t.task_status_id = ${}", param_count));
        param_count += 1;
    }
    if query_params.executor.is_some() {
        conditions.push(format!("t.executor_id = ${}", param_count));
        param_count += 1;
    }
    if query_params.author.is_some() {
        conditions.push(format!("t.author_id = ${}", param_count));
        param_count += 1;
    }
    if query_params.label.is_some() {
        conditions.push(format!("tl.label_id = ${}", param_count));
    }

    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }

    sql.push_str(" ORDER BY t.id");

    let mut query_builder = sqlx::query_as::<_, Task>(&sql);

    if let Some(status) = query_params.status {
        query_builder = query_builder.bind(status);
    }
    if let Some(executor) = query_params.executor {
        query_builder = query_builder.bind(executor);
    }
    if let Some(author) = query_params.author {
        query_builder = query_builder.bind(author);
    }
    if let Some(label) = query_params.label {
        query_builder = query_builder.bind(label);
    }

    let tasks = query_builder.fetch_all(&**pool).await?;

    let mut responses = Vec::with_capacity(tasks.len());
    for task in tasks {
        let labels = fetch_labels(&pool, task.id).await?;
        responses.push(TaskResponse { task, labels });
    }

    Ok(HttpResponse::Ok().json(responses))
}

/// Creates a new task.
///
/// The author is always the authenticated principal; it cannot be supplied in
/// the payload. The task row and its label attachments are written in one
/// transaction.
///
/// ## Responses:
/// - `201 Created`: the new task with its labels.
/// - `400 Bad Request`: a referenced status, executor, or label does not exist.
/// - `401 Unauthorized`: missing or invalid token.
/// - `422 Unprocessable Entity`: validation failed (e.g. blank name).
#[post("")]
pub async fn create_task(
    pool: web::Data<PgPool>,
    task_data: web::Json<TaskInput>,
    principal: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let author = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE email = $1")
        .bind(&principal.email)
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Unknown principal".into()))?;

    let input = task_data.into_inner();

    let mut tx = pool.begin().await?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (name, description, task_status_id, author_id, executor_id) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.task_status_id)
    .bind(author.0)
    .bind(input.executor_id)
    .fetch_one(&mut *tx)
    .await?;

    for label_id in &input.label_ids {
        sqlx::query(
            "INSERT INTO task_labels (task_id, label_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(task.id)
        .bind(label_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let labels = fetch_labels(&pool, task.id).await?;

    Ok(HttpResponse::Created().json(TaskResponse { task, labels }))
}

/// Retrieves a task by id, with its label set.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();

    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    let labels = fetch_labels(&pool, id).await?;

    Ok(HttpResponse::Ok().json(TaskResponse { task, labels }))
}

/// Updates a task.
///
/// Any authenticated user may update a task. The mutable fields are name,
/// description, status, executor, and labels; the author and creation
/// timestamp are preserved. Label attachments are replaced wholesale inside
/// the same transaction as the row update.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;
    let id = task_id.into_inner();
    let input = task_data.into_inner();

    let mut tx = pool.begin().await?;

    let task = sqlx::query_as::<_, Task>(&format!(
        "UPDATE tasks \
         SET name = $1, description = $2, task_status_id = $3, executor_id = $4 \
         WHERE id = $5 \
         RETURNING {TASK_COLUMNS}"
    ))
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.task_status_id)
    .bind(input.executor_id)
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    sqlx::query("DELETE FROM task_labels WHERE task_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    for label_id in &input.label_ids {
        sqlx::query(
            "INSERT INTO task_labels (task_id, label_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(label_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    let labels = fetch_labels(&pool, id).await?;

    Ok(HttpResponse::Ok().json(TaskResponse { task, labels }))
}

/// Deletes a task. Author-only.
///
/// The target task's author email is compared against the token's principal;
/// a mismatch yields `403 Forbidden` and the task remains.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `403 Forbidden`: authenticated but not the author.
/// - `404 Not Found`: no task with the given id.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<PgPool>,
    task_id: web::Path<i64>,
    principal: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = task_id.into_inner();

    let author_email = sqlx::query_as::<_, (String,)>(
        "SELECT u.email FROM tasks t JOIN users u ON u.id = t.author_id WHERE t.id = $1",
    )
    .bind(id)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if author_email.0 != principal.email {
        return Err(AppError::Forbidden(
            "Only the task author can delete it".into(),
        ));
    }

    sqlx::query("DELETE FROM tasks WHERE id = $1")
        .bind(id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Explicit label fetch for one task; there is no implicit loading anywhere.
async fn fetch_labels(pool: &PgPool, task_id: i64) -> Result<Vec<Label>, AppError> {
    let labels = sqlx::query_as::<_, Label>(
        "SELECT l.id, l.name, l.created_at FROM labels l \
         JOIN task_labels tl ON tl.label_id = l.id \
         WHERE tl.task_id = $1 ORDER BY l.id",
    )
    .bind(task_id)
    .fetch_all(pool)
    .await?;
    Ok(labels)
}
