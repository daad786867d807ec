//! Service layer providing the task CRUD operations on top of models.
//! - Separates business rules (validation, title uniqueness, not-found policy) from data access.
//! - Reuses validation and entity definitions in `models` crate.
//! - Every write runs in its own transaction.

pub mod errors;
pub mod pagination;
pub mod task;
#[cfg(test)]
pub mod test_support;
