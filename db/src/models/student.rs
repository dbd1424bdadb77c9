use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::store::Record;

/// A student identified by a 4-digit login code.
///
/// `score`, `answers` and `test_id` describe the most recent graded attempt and
/// belong together: reassignment of the student's group clears all of them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub full_name: String,
    #[sea_orm(unique)]
    pub login_code: String,
    pub phone_number: Option<String>,
    pub chosen_subject: String,
    pub group_id: Option<i64>,
    pub teacher_id: i64,
    pub status: StudentStatus,
    pub score: i32,
    pub correct_count: i32,
    pub wrong_count: i32,
    /// Seconds spent on the last attempt.
    pub time_spent: i64,
    #[sea_orm(column_type = "Json")]
    pub answers: AnswerList,
    pub test_id: Option<i64>,
    /// When the last attempt was completed. Starts the cooldown window.
    pub last_access_date: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Json")]
    pub early_access: EarlyAccess,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "student_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StudentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,

    #[sea_orm(string_value = "checked")]
    Checked,
}

/// One submitted answer. Grading uses `selected_option`; the text is kept for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: i64,
    pub selected_option: i32,
    #[serde(default)]
    pub option_text: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct AnswerList(pub Vec<Answer>);

impl AnswerList {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        self.0.iter()
    }
}

/// Who acted on an early-access request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActorKind {
    Student,
    Teacher,
    Admin,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EarlyAccessState {
    #[default]
    None,
    Requested,
    Approved,
    Denied,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EarlyAccessTransition {
    Requested,
    Approved,
    Denied,
    /// The approval was spent on a graded attempt.
    Consumed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarlyAccessEntry {
    pub transition: EarlyAccessTransition,
    pub actor_id: Option<i64>,
    pub actor_role: ActorKind,
    pub at: DateTime<Utc>,
}

/// Early-access request to bypass the cooldown window, with its transition log.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct EarlyAccess {
    pub state: EarlyAccessState,
    pub requested_at: Option<DateTime<Utc>>,
    pub decided_at: Option<DateTime<Utc>>,
    pub decided_by: Option<i64>,
    pub decided_role: Option<ActorKind>,
    #[serde(default)]
    pub history: Vec<EarlyAccessEntry>,
}

impl EarlyAccess {
    pub fn is_approved(&self) -> bool {
        self.state == EarlyAccessState::Approved
    }

    pub fn is_requested(&self) -> bool {
        self.state == EarlyAccessState::Requested
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_checked(&self) -> bool {
        self.status == StudentStatus::Checked
    }

    /// Clears the attempt state: pending, no score, no answers, no test.
    ///
    /// `last_access_date` survives, so the cooldown still applies.
    pub fn reset_attempt(&mut self) {
        self.status = StudentStatus::Pending;
        self.score = 0;
        self.correct_count = 0;
        self.wrong_count = 0;
        self.time_spent = 0;
        self.answers = AnswerList::default();
        self.test_id = None;
    }
}

impl Record for Model {
    type Entity = Entity;
    type Column = Column;
    type Active = ActiveModel;

    const COLLECTION: &'static str = "students";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn id_column() -> Column {
        Column::Id
    }

    fn unique_key(&self) -> Option<(&'static str, String)> {
        Some(("login_code", self.login_code.clone()))
    }
}
