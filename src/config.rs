use std::env;

/// Process-wide configuration, read once at startup.
///
/// The JWT signing secret lives here and is handed to the token service at
/// construction; nothing else in the crate reads `JWT_SECRET` directly.
pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    /// Base path the API is mounted under, e.g. `/api`.
    pub base_url: String,
    pub jwt_secret: String,
    /// Token lifetime in seconds. Defaults to 24 hours.
    pub token_ttl_seconds: i64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            base_url: env::var("BASE_URL").unwrap_or_else(|_| "/api".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_seconds: env::var("TOKEN_TTL_SECONDS")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("TOKEN_TTL_SECONDS must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
