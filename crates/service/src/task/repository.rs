use async_trait::async_trait;
use models::task::{self, NewTask, TaskChanges};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::errors::ServiceError;
use crate::task::query::TaskQuery;

/// Persistence seam for tasks. Implementations must make each write atomic.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<task::Model>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<task::Model>, ServiceError>;
    /// Fails with `Conflict` when the title is already taken.
    async fn create(&self, new: NewTask) -> Result<task::Model, ServiceError>;
    /// `Ok(None)` when no task has this id.
    async fn update(&self, id: i32, changes: TaskChanges) -> Result<Option<task::Model>, ServiceError>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmTaskRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl TaskRepository for SeaOrmTaskRepository {
    async fn list(&self, query: &TaskQuery) -> Result<Vec<task::Model>, ServiceError> {
        let mut finder = task::Entity::find();
        if let Some(done) = query.done { finder = finder.filter(task::Column::Done.eq(done)); }
        let order = query.sort.order();
        let rows = finder
            .order_by(task::Column::CreatedAt, order.clone())
            .order_by(task::Column::Id, order)
            .offset(query.page.offset)
            .limit(query.page.limit)
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    async fn get(&self, id: i32) -> Result<Option<task::Model>, ServiceError> {
        let found = task::Entity::find_by_id(id).one(&self.db).await?;
        Ok(found)
    }

    async fn create(&self, new: NewTask) -> Result<task::Model, ServiceError> {
        let txn = self.db.begin().await?;
        if task::find_by_title(&txn, &new.title).await?.is_some() {
            return Err(ServiceError::duplicate_title());
        }
        let created = task::create(&txn, new).await?;
        txn.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: i32, changes: TaskChanges) -> Result<Option<task::Model>, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(existing) = task::Entity::find_by_id(id).one(&txn).await? else { return Ok(None); };
        if let Some(title) = changes.title.as_deref() {
            if title != existing.title && task::find_by_title(&txn, title).await?.is_some() {
                return Err(ServiceError::duplicate_title());
            }
        }
        let updated = task::apply_changes(&txn, existing, changes).await?;
        txn.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        let res = task::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        Ok(res.rows_affected > 0)
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    use chrono::Utc;

    use crate::task::query::TaskSort;

    #[derive(Default)]
    pub struct MockTaskRepository {
        rows: Mutex<Vec<task::Model>>,
        next_id: Mutex<i32>,
    }

    #[async_trait]
    impl TaskRepository for MockTaskRepository {
        async fn list(&self, query: &TaskQuery) -> Result<Vec<task::Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            let mut out: Vec<_> = rows.iter().filter(|t| query.done.map_or(true, |d| t.done == d)).cloned().collect();
            out.sort_by_key(|t| (t.created_at, t.id));
            if query.sort == TaskSort::Newest { out.reverse(); }
            Ok(out
                .into_iter()
                .skip(query.page.offset as usize)
                .take(query.page.limit as usize)
                .collect())
        }

        async fn get(&self, id: i32) -> Result<Option<task::Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().iter().find(|t| t.id == id).cloned())
        }

        async fn create(&self, new: NewTask) -> Result<task::Model, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            if rows.iter().any(|t| t.title == new.title) {
                return Err(ServiceError::duplicate_title());
            }
            let mut next_id = self.next_id.lock().unwrap();
            *next_id += 1;
            let model = task::Model {
                id: *next_id,
                title: new.title,
                description: new.description,
                done: false,
                created_at: Utc::now(),
            };
            rows.push(model.clone());
            Ok(model)
        }

        async fn update(&self, id: i32, changes: TaskChanges) -> Result<Option<task::Model>, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            if let Some(title) = changes.title.as_deref() {
                if rows.iter().any(|t| t.id != id && t.title == title) {
                    return Err(ServiceError::duplicate_title());
                }
            }
            let Some(row) = rows.iter_mut().find(|t| t.id == id) else { return Ok(None); };
            if let Some(t) = changes.title { row.title = t; }
            if let Some(d) = changes.description { row.description = Some(d); }
            if let Some(b) = changes.done { row.done = b; }
            Ok(Some(row.clone()))
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|t| t.id != id);
            Ok(rows.len() < before)
        }
    }
}
