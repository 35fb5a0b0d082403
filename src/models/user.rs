use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::NON_BLANK;

/// Represents a user as returned by the API. The password hash is stored in
/// the `users` table but never selected into this struct.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating or updating a user.
#[derive(Debug, Deserialize, Validate)]
pub struct UserInput {
    /// Email address, unique, acts as the login name.
    #[validate(email)]
    pub email: String,
    #[validate(regex(path = "NON_BLANK", message = "first_name must not be blank"))]
    pub first_name: String,
    #[validate(regex(path = "NON_BLANK", message = "last_name must not be blank"))]
    pub last_name: String,
    /// Plain-text password on input only; stored hashed.
    #[validate(length(min = 3))]
    pub password: String,
}
