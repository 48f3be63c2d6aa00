//! Generic persistence for flat records.
//!
//! A [`Store`] performs create/read/list/update/delete against the table of
//! one sea-orm entity. The per-record row mapping lives in the [`Record`]
//! trait, so the same store code serves every collection.
use sea_orm::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;

/// Maps a domain record onto the sea-orm entity that stores it.
pub trait Record: Serialize + Sized + Send + Sync + 'static {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: ModelTrait<Entity = Self::Entity>
        + IntoActiveModel<Self::ActiveModel>
        + FromQueryResult
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;
    /// Request body accepted on create and update.
    type Input: DeserializeOwned + Send + 'static;

    /// Singular name used in log lines and error messages, e.g. `"note"`.
    const KIND: &'static str;
    /// Collection name used as the route prefix, e.g. `"notes"`.
    const COLLECTION: &'static str;

    fn from_model(model: Self::Model) -> Self;

    /// Column holding the identifier.
    fn id_column() -> <Self::Entity as EntityTrait>::Column;

    /// Identifier supplied by the client in a create body, if any.
    fn requested_id(input: &Self::Input) -> Option<i64>;

    /// Title carried by a create or update body.
    fn title(input: &Self::Input) -> &str;

    /// Active model for inserting `input`. Timestamps are left to the save hook.
    fn insert_model(input: Self::Input) -> Self::ActiveModel;

    /// Active model replacing every payload field of row `id` with `input`.
    /// `created_at` must stay unset.
    fn update_model(id: i64, input: Self::Input) -> Self::ActiveModel;
}

/// Error type for Store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No row matched the identifier.
    #[error("{0} with ID {1} not found")]
    NotFound(&'static str, i64),
    /// Insert hit the primary key of an existing row.
    #[error("{0} with ID {1} already exists")]
    AlreadyExists(&'static str, i64),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// CRUD access to the table behind record type `R`.
pub struct Store<R> {
    db: Arc<DatabaseConnection>,
    record: PhantomData<fn() -> R>,
}

impl<R> Clone for Store<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            record: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("record", &std::any::type_name::<R>())
            .finish()
    }
}

impl<R: Record> Store<R> {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            record: PhantomData,
        }
    }

    /// Inserts a new row built from `input`.
    ///
    /// # Returns
    ///
    /// The stored record, including its assigned identifier and timestamps.
    /// A requested identifier that is already taken yields
    /// [`StoreError::AlreadyExists`].
    #[tracing::instrument(skip(self, input), fields(kind = R::KIND))]
    pub async fn create(&self, input: R::Input) -> Result<R, StoreError> {
        let requested_id = R::requested_id(&input);
        match R::insert_model(input).insert(self.db.as_ref()).await {
            Ok(model) => Ok(R::from_model(model)),
            Err(err) => match (requested_id, err.sql_err()) {
                (Some(id), Some(SqlErr::UniqueConstraintViolation(_))) => {
                    Err(StoreError::AlreadyExists(R::KIND, id))
                }
                _ => Err(err.into()),
            },
        }
    }

    /// Retrieves the record with the given identifier.
    ///
    /// Returns [`StoreError::NotFound`] when no row matches.
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    pub async fn get_by_id(&self, id: i64) -> Result<R, StoreError> {
        R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(self.db.as_ref())
            .await?
            .map(R::from_model)
            .ok_or(StoreError::NotFound(R::KIND, id))
    }

    /// Retrieves every record in the collection, in backend order.
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    pub async fn list(&self) -> Result<Vec<R>, StoreError> {
        let records = R::Entity::find()
            .all(self.db.as_ref())
            .await?
            .into_iter()
            .map(R::from_model)
            .collect();
        Ok(records)
    }

    /// Replaces the payload fields of row `id` with `input`.
    ///
    /// Prior existence is not checked here; updating a missing row fails with
    /// a database error.
    #[tracing::instrument(skip(self, input), fields(kind = R::KIND))]
    pub async fn update(&self, id: i64, input: R::Input) -> Result<R, StoreError> {
        let model = R::update_model(id, input).update(self.db.as_ref()).await?;
        Ok(R::from_model(model))
    }

    /// Deletes the row with the given identifier.
    ///
    /// # Returns
    ///
    /// The number of rows removed, which is zero when nothing matched.
    #[tracing::instrument(skip(self), fields(kind = R::KIND))]
    pub async fn delete(&self, id: i64) -> Result<u64, StoreError> {
        let result = R::Entity::delete_many()
            .filter(R::id_column().eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }
}
