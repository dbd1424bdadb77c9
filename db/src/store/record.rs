use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, EntityTrait, FromQueryResult, IntoActiveModel,
};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Display;
use std::str::FromStr;
use util::filters::FilterParam;

use super::{Backend, StoreError};

/// A persisted entity: a sea-orm model that also knows its fallback collection.
pub trait Record:
    Clone
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + FromQueryResult
    + IntoActiveModel<Self::Active>
    + 'static
{
    type Entity: EntityTrait<Model = Self, Column = Self::Column>;
    type Column: ColumnTrait + FromStr<Err: Display>;
    type Active: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + From<Self> + Send;

    /// Table name in the primary store and file stem in the fallback store.
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    fn id_column() -> Self::Column;

    /// Field that must be unique within the collection, with this record's value.
    fn unique_key(&self) -> Option<(&'static str, String)> {
        None
    }
}

/// CRUD over any [`Record`], implemented identically by both backends.
///
/// Ids are assigned by the store on insert; the id carried by the inserted record
/// is ignored.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    fn backend(&self) -> Backend;

    /// Cheap reachability probe.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn insert<R: Record>(&self, record: R) -> Result<R, StoreError>;

    /// Replaces the stored record with the same id.
    async fn update<R: Record>(&self, record: R) -> Result<R, StoreError>;

    async fn find_by_id<R: Record>(&self, id: i64) -> Result<Option<R>, StoreError>;

    /// All records matching every filter, ordered by id.
    async fn find_all<R: Record>(&self, filters: &[FilterParam]) -> Result<Vec<R>, StoreError>;

    async fn delete_by_id<R: Record>(&self, id: i64) -> Result<bool, StoreError>;

    /// Deletes every record matching the filters. Refuses an empty filter list.
    async fn delete_where<R: Record>(&self, filters: &[FilterParam]) -> Result<u64, StoreError>;

    /// Replaces several records of one collection. Either all of them are
    /// written or none is.
    async fn update_batch<R: Record>(&self, records: Vec<R>) -> Result<(), StoreError>;

    async fn find_one<R: Record>(&self, filters: &[FilterParam]) -> Result<Option<R>, StoreError> {
        Ok(self.find_all::<R>(filters).await?.into_iter().next())
    }

    async fn exists<R: Record>(&self, filters: &[FilterParam]) -> Result<bool, StoreError> {
        Ok(self.find_one::<R>(filters).await?.is_some())
    }

    /// Like `find_by_id`, but a missing record is `StoreError::NotFound`.
    async fn get<R: Record>(&self, id: i64) -> Result<R, StoreError> {
        self.find_by_id::<R>(id)
            .await?
            .ok_or(StoreError::NotFound {
                collection: R::COLLECTION,
                id,
            })
    }
}
