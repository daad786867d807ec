use std::sync::Arc;

use models::task;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::errors::ServiceError;
use crate::task::query::TaskQuery;
use crate::task::repository::TaskRepository;

/// Create payload as received from the client, before validation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update payload; absent and `null` fields are both left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateTaskInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

/// Task business service independent of web framework.
/// Validates input, then delegates to the repository and turns misses into `NotFound`.
pub struct TaskService<R: TaskRepository> {
    repo: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self, query: &TaskQuery) -> Result<Vec<task::Model>, ServiceError> {
        let rows = self.repo.list(query).await?;
        debug!(count = rows.len(), done = ?query.done, sort = ?query.sort, "listed tasks");
        Ok(rows)
    }

    pub async fn get(&self, id: i32) -> Result<task::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("task"))
    }

    /// Create a task after trimming and bound-checking its fields.
    ///
    /// # Examples
    /// ```
    /// use service::task::{repository::mock::MockTaskRepository, CreateTaskInput, TaskService};
    /// use std::sync::Arc;
    /// let svc = TaskService::new(Arc::new(MockTaskRepository::default()));
    /// let input = CreateTaskInput { title: "  Buy milk ".into(), description: None };
    /// let task = tokio_test::block_on(svc.create(input)).unwrap();
    /// assert_eq!(task.title, "Buy milk");
    /// assert!(!task.done);
    /// ```
    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateTaskInput) -> Result<task::Model, ServiceError> {
        let new = task::validate_new(&input.title, input.description.as_deref())?;
        let created = self.repo.create(new).await?;
        info!(id = created.id, title = %created.title, "created task");
        Ok(created)
    }

    /// Apply only the fields present in `input`.
    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateTaskInput) -> Result<task::Model, ServiceError> {
        let changes = task::validate_changes(input.title.as_deref(), input.description.as_deref(), input.done)?;
        let updated = self.repo.update(id, changes).await?.ok_or_else(|| ServiceError::not_found("task"))?;
        info!(id = updated.id, done = updated.done, "updated task");
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("task"));
        }
        info!(id, "deleted task");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::repository::mock::MockTaskRepository;

    fn svc() -> TaskService<MockTaskRepository> {
        TaskService::new(Arc::new(MockTaskRepository::default()))
    }

    fn create_input(title: &str) -> CreateTaskInput {
        CreateTaskInput { title: title.into(), description: Some("desc".into()) }
    }

    #[tokio::test]
    async fn whitespace_title_is_never_stored() -> Result<(), anyhow::Error> {
        let svc = svc();
        let err = svc.create(create_input("   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref f) if f[0].field == "title"));
        assert!(svc.list(&TaskQuery::default()).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn ids_are_unique() -> Result<(), anyhow::Error> {
        let svc = svc();
        let mut seen = std::collections::HashSet::new();
        for i in 0..5 {
            let t = svc.create(create_input(&format!("Task number {i}"))).await?;
            assert!(seen.insert(t.id));
        }
        Ok(())
    }

    #[tokio::test]
    async fn done_only_update_leaves_other_fields() -> Result<(), anyhow::Error> {
        let svc = svc();
        let created = svc.create(create_input("Water plants")).await?;
        let updated = svc.update(created.id, UpdateTaskInput { done: Some(true), ..Default::default() }).await?;
        assert!(updated.done);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        Ok(())
    }

    #[tokio::test]
    async fn update_validates_present_fields() -> Result<(), anyhow::Error> {
        let svc = svc();
        let created = svc.create(create_input("Water plants")).await?;
        let input = UpdateTaskInput { title: Some(" x ".into()), description: Some("d".repeat(301)), done: None };
        let err = svc.update(created.id, input).await.unwrap_err();
        let ServiceError::Validation(fields) = err else { panic!("expected validation error") };
        assert_eq!(fields.len(), 2);
        assert_eq!(svc.get(created.id).await?.title, "Water plants");
        Ok(())
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let svc = svc();
        assert!(matches!(svc.get(7).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            svc.update(7, UpdateTaskInput { done: Some(true), ..Default::default() }).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(svc.delete(7).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() -> Result<(), anyhow::Error> {
        let svc = svc();
        let created = svc.create(create_input("Take out trash")).await?;
        svc.delete(created.id).await?;
        assert!(matches!(svc.get(created.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_title_conflicts() -> Result<(), anyhow::Error> {
        let svc = svc();
        svc.create(create_input("Pay rent")).await?;
        assert!(matches!(svc.create(create_input("Pay rent ")).await, Err(ServiceError::Conflict(_))));
        Ok(())
    }
}
