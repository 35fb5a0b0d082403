use crate::{
    error::AppError,
    models::{Label, LabelInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Create a label.
#[post("")]
pub async fn create_label(
    pool: web::Data<PgPool>,
    label_data: web::Json<LabelInput>,
) -> Result<impl Responder, AppError> {
    label_data.validate()?;

    let label = sqlx::query_as::<_, Label>(
        "INSERT INTO labels (name) VALUES ($1) RETURNING id, name, created_at",
    )
    .bind(&label_data.name)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(label))
}

/// List all labels.
#[get("")]
pub async fn get_labels(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let labels =
        sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels ORDER BY id")
            .fetch_all(&**pool)
            .await?;

    Ok(HttpResponse::Ok().json(labels))
}

/// Get a label by id.
#[get("/{id}")]
pub async fn get_label(
    pool: web::Data<PgPool>,
    label_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let label = sqlx::query_as::<_, Label>("SELECT id, name, created_at FROM labels WHERE id = $1")
        .bind(label_id.into_inner())
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Label not found".into()))?;

    Ok(HttpResponse::Ok().json(label))
}

/// Update a label name.
#[put("/{id}")]
pub async fn update_label(
    pool: web::Data<PgPool>,
    label_id: web::Path<i64>,
    label_data: web::Json<LabelInput>,
) -> Result<impl Responder, AppError> {
    label_data.validate()?;

    let label = sqlx::query_as::<_, Label>(
        "UPDATE labels SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
    )
    .bind(&label_data.name)
    .bind(label_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Label not found".into()))?;

    Ok(HttpResponse::Ok().json(label))
}

/// Delete a label. Join-table rows referencing it are removed by cascade.
#[delete("/{id}")]
pub async fn delete_label(
    pool: web::Data<PgPool>,
    label_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM labels WHERE id = $1")
        .bind(label_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Label not found".into()));
    }

    Ok(HttpResponse::NoContent().finish())
}
