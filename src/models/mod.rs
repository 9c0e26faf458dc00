pub mod task;
pub mod user;

pub use task::{Task, TaskInput, TaskRecord, TaskStatus};
pub use user::User;
