use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::NON_BLANK;

/// A label that can be attached to any number of tasks.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Label {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LabelInput {
    #[validate(
        length(min = 1, max = 100),
        regex(path = "NON_BLANK", message = "name must not be blank")
    )]
    pub name: String,
}
