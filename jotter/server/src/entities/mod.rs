pub mod note;
pub mod task;
