use crate::{
    auth::{verify_password, LoginRequest, TokenService},
    error::AppError,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Authenticate a user
///
/// Looks the user up by email, verifies the password, and returns a signed
/// token as plain text. Unknown email and wrong password produce the same
/// `401` so the response does not reveal which of the two failed.
#[post("/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    tokens: web::Data<TokenService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;

    let user = sqlx::query_as::<_, (i64, String)>(
        "SELECT id, password_hash FROM users WHERE email = $1",
    )
    .bind(&login_data.email)
    .fetch_optional(&**pool)
    .await?;

    match user {
        Some((_, password_hash)) => {
            if verify_password(&login_data.password, &password_hash)? {
                let token = tokens.issue(&login_data.email)?;
                Ok(HttpResponse::Ok()
                    .content_type("text/plain; charset=utf-8")
                    .body(token))
            } else {
                Err(AppError::Unauthorized("Invalid credentials".into()))
            }
        }
        None => Err(AppError::Unauthorized("Invalid credentials".into())),
    }
}
