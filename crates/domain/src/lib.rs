pub mod todo;

pub use todo::{CreateTodoRequest, TodoItem, TodoUpdate};
