use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{self, FieldError, ModelError};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 80;
pub const DESCRIPTION_MAX_CHARS: usize = 300;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub done: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// A create payload that passed validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
}

/// Validated partial update; `None` leaves the column untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub done: Option<bool>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.done.is_none()
    }
}

/// Trim and bound-check a title.
pub fn normalize_title(raw: &str) -> Result<String, FieldError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(FieldError::new("title", "title must not be blank"));
    }
    let len = title.chars().count();
    if len < TITLE_MIN_CHARS {
        return Err(FieldError::new("title", format!("title must have at least {TITLE_MIN_CHARS} characters")));
    }
    if len > TITLE_MAX_CHARS {
        return Err(FieldError::new("title", format!("title must have at most {TITLE_MAX_CHARS} characters")));
    }
    Ok(title.to_string())
}

/// Trim and bound-check a description. An empty description is kept as-is.
pub fn normalize_description(raw: &str) -> Result<String, FieldError> {
    let description = raw.trim();
    if description.chars().count() > DESCRIPTION_MAX_CHARS {
        return Err(FieldError::new(
            "description",
            format!("description must have at most {DESCRIPTION_MAX_CHARS} characters"),
        ));
    }
    Ok(description.to_string())
}

/// Validate a create payload, reporting every offending field at once.
pub fn validate_new(title: &str, description: Option<&str>) -> Result<NewTask, ModelError> {
    let mut failures = Vec::new();
    let title = normalize_title(title).map_err(|e| failures.push(e)).ok();
    let description = match description.map(normalize_description).transpose() {
        Ok(d) => d,
        Err(e) => {
            failures.push(e);
            None
        }
    };
    match title {
        Some(title) if failures.is_empty() => Ok(NewTask { title, description }),
        _ => Err(ModelError::Validation(failures)),
    }
}

/// Validate a partial update. Absent fields stay absent.
pub fn validate_changes(
    title: Option<&str>,
    description: Option<&str>,
    done: Option<bool>,
) -> Result<TaskChanges, ModelError> {
    let mut failures = Vec::new();
    let title = match title.map(normalize_title).transpose() {
        Ok(t) => t,
        Err(e) => {
            failures.push(e);
            None
        }
    };
    let description = match description.map(normalize_description).transpose() {
        Ok(d) => d,
        Err(e) => {
            failures.push(e);
            None
        }
    };
    if !failures.is_empty() {
        return Err(ModelError::Validation(failures));
    }
    Ok(TaskChanges { title, description, done })
}

pub async fn find_by_title<C: ConnectionTrait>(db: &C, title: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Title.eq(title))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Insert a validated task; `id` and `created_at` are assigned here.
pub async fn create<C: ConnectionTrait>(db: &C, new: NewTask) -> Result<Model, DbErr> {
    let am = ActiveModel {
        title: Set(new.title),
        description: Set(new.description),
        done: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let model = am.insert(db).await?;
    debug!(id = model.id, "inserted task row");
    Ok(model)
}

/// Apply validated changes to an existing row.
pub async fn apply_changes<C: ConnectionTrait>(db: &C, existing: Model, changes: TaskChanges) -> Result<Model, DbErr> {
    if changes.is_empty() {
        return Ok(existing);
    }
    let mut am: ActiveModel = existing.into();
    if let Some(t) = changes.title { am.title = Set(t); }
    if let Some(d) = changes.description { am.description = Set(Some(d)); }
    if let Some(b) = changes.done { am.done = Set(b); }
    am.update(db).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        assert_eq!(normalize_title("  Tarefa 1  ").unwrap(), "Tarefa 1");
    }

    #[test]
    fn blank_title_rejected() {
        let err = normalize_title(" \t\n ").unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.message, "title must not be blank");
    }

    #[test]
    fn title_bounds_count_characters() {
        assert!(normalize_title("ab").is_err());
        assert!(normalize_title("abc").is_ok());
        assert!(normalize_title(&"x".repeat(80)).is_ok());
        assert!(normalize_title(&"x".repeat(81)).is_err());
        // three characters, six bytes
        assert!(normalize_title("ção").is_ok());
    }

    #[test]
    fn description_bound() {
        assert_eq!(normalize_description("  desc ").unwrap(), "desc");
        assert!(normalize_description(&"d".repeat(300)).is_ok());
        assert!(normalize_description(&"d".repeat(301)).is_err());
    }

    #[test]
    fn validate_new_collects_all_failures() {
        let err = validate_new("  ", Some(&"d".repeat(301))).unwrap_err();
        let ModelError::Validation(fields) = err else { panic!("expected validation error") };
        let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
        assert_eq!(names, ["title", "description"]);
    }

    #[test]
    fn validate_new_without_description() {
        let new = validate_new("Buy milk", None).unwrap();
        assert_eq!(new, NewTask { title: "Buy milk".into(), description: None });
    }

    #[test]
    fn validate_changes_keeps_absent_fields_absent() {
        let changes = validate_changes(None, None, Some(true)).unwrap();
        assert_eq!(changes, TaskChanges { title: None, description: None, done: Some(true) });
        assert!(validate_changes(None, None, None).unwrap().is_empty());
    }

    #[test]
    fn validate_changes_rejects_blank_title() {
        assert!(matches!(validate_changes(Some("   "), None, None), Err(ModelError::Validation(_))));
    }
}
