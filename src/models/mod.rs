pub mod label;
pub mod task;
pub mod task_status;
pub mod user;

pub use label::{Label, LabelInput};
pub use task::{Task, TaskInput, TaskQuery, TaskResponse};
pub use task_status::{TaskStatus, TaskStatusInput};
pub use user::{User, UserInput};

lazy_static::lazy_static! {
    // Required name fields must contain at least one non-whitespace character.
    pub(crate) static ref NON_BLANK: regex::Regex = regex::Regex::new(r"\S").unwrap();
}
