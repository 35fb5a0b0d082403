pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::Deserialize;
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for a login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// User's email address, which is the login name.
    #[validate(email)]
    pub email: String,
    /// User's password.
    #[validate(length(min = 3))]
    pub password: String,
}
