use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::label::Label;
use super::NON_BLANK;

/// Represents a task row as stored in the database.
///
/// Labels live in the `task_labels` join table and are loaded with an
/// explicit fetch; see `TaskResponse` for the API shape.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Required reference to a `TaskStatus`.
    pub task_status_id: i64,
    /// The user who created the task. Set once, from the authenticated
    /// principal, and never changed afterwards.
    pub author_id: i64,
    /// Optional assignee.
    pub executor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Input structure for creating or updating a task.
///
/// `author_id` is deliberately absent: the author always comes from the
/// authenticated principal and is not writable through the API.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[validate(
        length(min = 1, max = 200),
        regex(path = "NON_BLANK", message = "name must not be blank")
    )]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    pub task_status_id: i64,

    pub executor_id: Option<i64>,

    /// Labels to attach. Duplicates are collapsed by the join table's
    /// composite primary key.
    #[serde(default)]
    pub label_ids: Vec<i64>,
}

/// Query parameters for filtering the task list by simple equality predicates.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskQuery {
    /// Filter by status id.
    pub status: Option<i64>,
    /// Filter by executor user id.
    pub executor: Option<i64>,
    /// Filter by author user id.
    pub author: Option<i64>,
    /// Filter by attached label id.
    pub label: Option<i64>,
}

/// A task together with its explicitly fetched label set, as returned by the API.
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    #[serde(flatten)]
    pub task: Task,
    pub labels: Vec<Label>,
}
