use crate::entities::note;
use crate::resource;
use crate::store::{Record, Store};
use axum::Router;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, DatabaseConnection};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;
use utoipa::ToSchema;

/// A markdown note.
#[derive(Debug, PartialEq, Clone, Eq, Serialize, Deserialize, ToSchema)]
pub struct Note {
    /// Unique note identifier
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content in Markdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Note creation timestamp (UTC)
    pub created_at: DateTime<Utc>,
    /// Note last update timestamp (UTC)
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating or replacing a note.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NoteInput {
    /// Identifier to create the note with. Ignored on update.
    #[serde(default)]
    pub id: Option<i64>,
    /// Note title
    pub title: String,
    /// Note content in Markdown
    #[serde(default)]
    pub content: Option<String>,
}

impl From<note::Model> for Note {
    fn from(model: note::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            content: model.content,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl Record for Note {
    type Entity = note::Entity;
    type Model = note::Model;
    type ActiveModel = note::ActiveModel;
    type Input = NoteInput;

    const KIND: &'static str = "note";
    const COLLECTION: &'static str = "notes";

    fn from_model(model: note::Model) -> Self {
        Note::from(model)
    }

    fn id_column() -> note::Column {
        note::Column::Id
    }

    fn requested_id(input: &NoteInput) -> Option<i64> {
        input.id
    }

    fn title(input: &NoteInput) -> &str {
        &input.title
    }

    fn insert_model(input: NoteInput) -> note::ActiveModel {
        note::ActiveModel {
            id: input.id.map_or(ActiveValue::NotSet, ActiveValue::Set),
            title: ActiveValue::Set(input.title),
            content: ActiveValue::Set(input.content),
            ..Default::default()
        }
    }

    fn update_model(id: i64, input: NoteInput) -> note::ActiveModel {
        note::ActiveModel {
            id: ActiveValue::Unchanged(id),
            title: ActiveValue::Set(input.title),
            content: ActiveValue::Set(input.content),
            ..Default::default()
        }
    }
}

/// Store for the `notes` table.
#[derive(Clone, Debug)]
pub struct NoteStore(Store<Note>);

impl NoteStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self(Store::new(db))
    }
}

impl Deref for NoteStore {
    type Target = Store<Note>;

    fn deref(&self) -> &Store<Note> {
        &self.0
    }
}

impl From<NoteStore> for Store<Note> {
    fn from(store: NoteStore) -> Self {
        store.0
    }
}

/// Creates the notes resource router serving `/notes` and `/notes/{id}`.
pub fn create_notes_router(store: NoteStore) -> Router {
    resource::create_resource_router(store.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_parse_input_without_id_or_content() {
        let input: NoteInput = serde_json::from_str(r#"{"title":"Meeting notes"}"#).unwrap();

        assert_eq!(input.id, None);
        assert_eq!(input.title, "Meeting notes");
        assert_eq!(input.content, None);
    }

    #[test]
    fn can_reject_input_without_title() {
        let result = serde_json::from_str::<NoteInput>(r##"{"content":"# Heading"}"##);

        assert!(result.is_err());
    }

    #[test]
    fn can_leave_created_at_unset_on_update() {
        let input = NoteInput {
            id: Some(99),
            title: "Renamed".to_string(),
            content: None,
        };

        let model = Note::update_model(3, input);

        assert_eq!(model.id, ActiveValue::Unchanged(3));
        assert_eq!(model.title, ActiveValue::Set("Renamed".to_string()));
        assert_eq!(model.content, ActiveValue::Set(None));
        assert_eq!(model.created_at, ActiveValue::NotSet);
    }

    #[test]
    fn can_omit_missing_content_when_serializing() {
        let now = Utc::now();
        let note = Note {
            id: 1,
            title: "Meeting notes".to_string(),
            content: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&note).unwrap();

        assert!(json.get("content").is_none());
        assert_eq!(json["title"], "Meeting notes");
    }
}
