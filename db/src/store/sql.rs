use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, TransactionTrait, Value,
};
use std::str::FromStr;
use tracing::debug;
use util::filters::{CompareOp, FilterParam, FilterValue};

use super::{Backend, Record, Store, StoreError};

/// Primary store backed by a sea-orm connection.
#[derive(Clone, Debug)]
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn column<R: Record>(name: &str) -> Result<R::Column, StoreError> {
        R::Column::from_str(name).map_err(|e| {
            StoreError::Invalid(format!(
                "Invalid column name '{}' for {}: {}",
                name,
                R::COLLECTION,
                e
            ))
        })
    }

    fn condition<R: Record>(filters: &[FilterParam]) -> Result<Condition, StoreError> {
        let mut condition = Condition::all();
        for filter in filters {
            let column = Self::column::<R>(&filter.column)?;
            let values: Vec<Value> = match &filter.value {
                FilterValue::String(v) => v.iter().cloned().map(Value::from).collect(),
                FilterValue::Int(v) => v.iter().copied().map(Value::from).collect(),
                FilterValue::Bool(v) => v.iter().copied().map(Value::from).collect(),
            };
            condition = match filter.operator {
                CompareOp::Eq => condition.add(column.is_in(values)),
                // NULL never equals a listed value, so it satisfies `ne`.
                CompareOp::Ne => condition.add(
                    Condition::any()
                        .add(column.is_not_in(values))
                        .add(column.is_null()),
                ),
            };
        }
        Ok(condition)
    }

    fn select<R: Record>(filters: &[FilterParam]) -> Result<Select<R::Entity>, StoreError> {
        Ok(R::Entity::find()
            .filter(Self::condition::<R>(filters)?)
            .order_by_asc(R::id_column()))
    }

    async fn write_one<R, C>(conn: &C, record: R) -> Result<R, StoreError>
    where
        R: Record,
        C: ConnectionTrait,
    {
        let id = record.id();
        let key = record.unique_key();
        let active = R::Active::from(record).reset_all();
        match active.update(conn).await {
            Ok(model) => Ok(model),
            Err(sea_orm::DbErr::RecordNotUpdated) => Err(StoreError::NotFound {
                collection: R::COLLECTION,
                id,
            }),
            Err(e) => Err(StoreError::from_write(e, R::COLLECTION, key)),
        }
    }
}

#[async_trait]
impl Store for SqlStore {
    fn backend(&self) -> Backend {
        Backend::Primary
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.ping().await.map_err(StoreError::from)
    }

    async fn insert<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let key = record.unique_key();
        let mut active = R::Active::from(record).reset_all();
        active.not_set(R::id_column());
        let saved = active
            .insert(&self.db)
            .await
            .map_err(|e| StoreError::from_write(e, R::COLLECTION, key))?;
        debug!(collection = R::COLLECTION, id = saved.id(), "inserted record");
        Ok(saved)
    }

    async fn update<R: Record>(&self, record: R) -> Result<R, StoreError> {
        Self::write_one(&self.db, record).await
    }

    async fn find_by_id<R: Record>(&self, id: i64) -> Result<Option<R>, StoreError> {
        R::Entity::find()
            .filter(R::id_column().eq(id))
            .one(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn find_all<R: Record>(&self, filters: &[FilterParam]) -> Result<Vec<R>, StoreError> {
        Self::select::<R>(filters)?
            .all(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn find_one<R: Record>(&self, filters: &[FilterParam]) -> Result<Option<R>, StoreError> {
        Self::select::<R>(filters)?
            .one(&self.db)
            .await
            .map_err(StoreError::from)
    }

    async fn exists<R: Record>(&self, filters: &[FilterParam]) -> Result<bool, StoreError> {
        let count = Self::select::<R>(filters)?
            .count(&self.db)
            .await
            .map_err(StoreError::from)?;
        Ok(count > 0)
    }

    async fn delete_by_id<R: Record>(&self, id: i64) -> Result<bool, StoreError> {
        let res = R::Entity::delete_many()
            .filter(R::id_column().eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }

    async fn delete_where<R: Record>(&self, filters: &[FilterParam]) -> Result<u64, StoreError> {
        if filters.is_empty() {
            return Err(StoreError::Invalid(
                "Refusing to delete without filters".to_string(),
            ));
        }
        let res = R::Entity::delete_many()
            .filter(Self::condition::<R>(filters)?)
            .exec(&self.db)
            .await?;
        debug!(
            collection = R::COLLECTION,
            rows = res.rows_affected,
            "deleted records"
        );
        Ok(res.rows_affected)
    }

    async fn update_batch<R: Record>(&self, records: Vec<R>) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let txn = self.db.begin().await?;
        for record in records {
            // Dropping `txn` on the error path rolls the batch back.
            Self::write_one(&txn, record).await?;
        }
        txn.commit().await?;
        Ok(())
    }
}
