use crate::entities::task;
use crate::resource;
use crate::store::{Record, Store};
use axum::Router;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseConnection};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use utoipa::ToSchema;

/// A to-do item that can be checked off.
#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize, ToSchema)]
pub struct Task {
    /// Unique task identifier
    pub id: i64,
    /// Task title
    pub title: String,
    /// Task details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Task completion status
    pub completed: bool,
    /// Task creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Task last update timestamp (UTC)
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a task.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TaskInput {
    /// Identifier to create the task with. Ignored on update.
    #[serde(default)]
    pub id: Option<i64>,
    /// Task title
    pub title: String,
    /// Task details
    #[serde(default)]
    pub description: Option<String>,
    /// Task completion status, `false` when omitted
    #[serde(default)]
    pub completed: bool,
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            completed: model.completed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Record for Task {
    type Entity = task::Entity;
    type Model = task::Model;
    type ActiveModel = task::ActiveModel;
    type Input = TaskInput;

    const KIND: &'static str = "task";
    const COLLECTION: &'static str = "tasks";

    fn from_model(model: task::Model) -> Self {
        Task::from(model)
    }

    fn id_column() -> task::Column {
        task::Column::Id
    }

    fn requested_id(input: &TaskInput) -> Option<i64> {
        input.id
    }

    fn title(input: &TaskInput) -> &str {
        &input.title
    }

    fn insert_model(input: TaskInput) -> task::ActiveModel {
        task::ActiveModel {
            id: input.id.map_or(ActiveValue::NotSet, ActiveValue::Set),
            title: ActiveValue::Set(input.title),
            description: ActiveValue::Set(input.description),
            completed: ActiveValue::Set(input.completed),
            ..Default::default()
        }
    }

    fn update_model(id: i64, input: TaskInput) -> task::ActiveModel {
        task::ActiveModel {
            id: ActiveValue::Unchanged(id),
            title: ActiveValue::Set(input.title),
            description: ActiveValue::Set(input.description),
            completed: ActiveValue::Set(input.completed),
            ..Default::default()
        }
    }
}

/// Store for the `tasks` table.
#[derive(Clone, Debug)]
pub struct TaskStore(Store<Task>);

impl TaskStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self(Store::new(db))
    }
}

impl Deref for TaskStore {
    type Target = Store<Task>;

    fn deref(&self) -> &Store<Task> {
        &self.0
    }
}

impl From<TaskStore> for Store<Task> {
    fn from(store: TaskStore) -> Self {
        store.0
    }
}

/// Creates the tasks resource router serving `/tasks` and `/tasks/{id}`.
pub fn create_tasks_router(store: TaskStore) -> Router {
    resource::create_resource_router(store.into())
}
