use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::auth::token::Claims;
use crate::error::AppError;

/// Extracts the authenticated principal from request extensions.
///
/// Intended for routes behind `AuthMiddleware`, which validates the JWT and
/// inserts the decoded `Claims`. If no claims are present (middleware not
/// applied, or an internal wiring error) this extractor fails with
/// `AppError::Unauthorized`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The principal's email, as carried in the token's `sub` claim.
    pub email: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError is converted via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthenticatedUser {
                email: claims.sub.clone(),
            })),
            None => {
                let err = AppError::Unauthorized(
                    "No authenticated principal. Ensure AuthMiddleware is active.".to_string(),
                );
                ready(Err(err.into()))
            }
        }
    }
}
