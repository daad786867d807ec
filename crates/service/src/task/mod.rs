pub mod query;
pub mod repository;
pub mod service;

pub use query::{TaskQuery, TaskSort};
pub use repository::{SeaOrmTaskRepository, TaskRepository};
pub use service::{TaskService, UpdateTaskInput, CreateTaskInput};
