use crate::{
    auth::{hash_password, AuthenticatedUser},
    error::AppError,
    models::{User, UserInput},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

const USER_COLUMNS: &str = "id, email, first_name, last_name, created_at";

/// Register a new user.
///
/// This is one of the two anonymous endpoints (the other being login).
/// The password is hashed before storage; the response never carries it.
///
/// ## Responses:
/// - `201 Created`: the new `User` as JSON.
/// - `400 Bad Request`: the email is already registered.
/// - `422 Unprocessable Entity`: input validation failed.
#[post("")]
pub async fn create_user(
    pool: web::Data<PgPool>,
    user_data: web::Json<UserInput>,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;

    let existing = sqlx::query_as::<_, (i64,)>("SELECT id FROM users WHERE email = $1")
        .bind(&user_data.email)
        .fetch_optional(&**pool)
        .await?;

    if existing.is_some() {
        return Err(AppError::BadRequest("Email already registered".into()));
    }

    let password_hash = hash_password(&user_data.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (email, first_name, last_name, password_hash) \
         VALUES ($1, $2, $3, $4) \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&user_data.email)
    .bind(&user_data.first_name)
    .bind(&user_data.last_name)
    .bind(&password_hash)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Created().json(user))
}

/// List all users. Requires authentication.
#[get("")]
pub async fn get_users(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users ORDER BY id"
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(users))
}

/// Get a user by id.
#[get("/{id}")]
pub async fn get_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(HttpResponse::Ok().json(user))
}

/// Update a user's profile.
///
/// Only the user themselves may do this: the target row's email must match
/// the token's principal, otherwise `403 Forbidden`.
#[put("/{id}")]
pub async fn update_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i64>,
    user_data: web::Json<UserInput>,
    principal: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    user_data.validate()?;
    let id = user_id.into_inner();

    let target = sqlx::query_as::<_, (String,)>("SELECT email FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if target.0 != principal.email {
        return Err(AppError::Forbidden(
            "Users can only modify their own profile".into(),
        ));
    }

    let password_hash = hash_password(&user_data.password)?;

    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users \
         SET email = $1, first_name = $2, last_name = $3, password_hash = $4 \
         WHERE id = $5 \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(&user_data.email)
    .bind(&user_data.first_name)
    .bind(&user_data.last_name)
    .bind(&password_hash)
    .bind(id)
    .fetch_one(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Delete a user account.
///
/// Restricted to the account owner. Deleting a user who still authors tasks
/// fails on the foreign key and surfaces as `400`.
#[delete("/{id}")]
pub async fn delete_user(
    pool: web::Data<PgPool>,
    user_id: web::Path<i64>,
    principal: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = user_id.into_inner();

    let target = sqlx::query_as::<_, (String,)>("SELECT email FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if target.0 != principal.email {
        return Err(AppError::Forbidden(
            "Users can only delete their own account".into(),
        ));
    }

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(&**pool)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
