use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::Record;

/// A class of students sharing one subject and, at most, one assigned test.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub subject: String,
    pub teacher_id: i64,
    pub assigned_test_id: Option<i64>,
    /// Bumped on every change of `assigned_test_id`. Submissions carrying an
    /// older version are refused.
    pub assignment_version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Record for Model {
    type Entity = Entity;
    type Column = Column;
    type Active = ActiveModel;

    const COLLECTION: &'static str = "groups";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn id_column() -> Column {
        Column::Id
    }
}
