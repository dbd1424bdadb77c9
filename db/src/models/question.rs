use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::types::OptionList;
use crate::store::Record;

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub question_text: String,
    #[sea_orm(column_type = "Json")]
    pub options: OptionList,
    /// Index into `options`, `0..OPTION_COUNT`.
    pub correct_option: i32,
    pub subject: String,
    pub teacher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether `selected` is the index of the correct option.
    pub fn is_correct(&self, selected: i32) -> bool {
        selected == self.correct_option
    }
}

impl Record for Model {
    type Entity = Entity;
    type Column = Column;
    type Active = ActiveModel;

    const COLLECTION: &'static str = "questions";

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
