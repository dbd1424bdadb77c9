use chrono::Utc;
use db::Store;
use db::models::question::{self, OPTION_COUNT};
use db::models::types::OptionList;
use db::models::{teacher, test};
use serde::Deserialize;
use tracing::info;
use util::filters::FilterParam;
use validator::{Validate, ValidationError};

use crate::error::{ServiceError, ServiceResult};
use crate::session::{Actor, Session};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestion {
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub question_text: String,

    #[validate(custom(function = "validate_options"))]
    pub options: Vec<String>,

    #[validate(range(min = 0, max = 3, message = "correct_option must be between 0 and 3"))]
    pub correct_option: i32,

    /// Defaults to the teacher's subject.
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuestion {
    #[validate(length(min = 1, message = "Question text cannot be empty"))]
    pub question_text: Option<String>,

    #[validate(custom(function = "validate_options"))]
    pub options: Option<Vec<String>>,

    #[validate(range(min = 0, max = 3, message = "correct_option must be between 0 and 3"))]
    pub correct_option: Option<i32>,
}

fn validate_options(options: &[String]) -> Result<(), ValidationError> {
    if options.len() != OPTION_COUNT {
        return Err(ValidationError::new("options")
            .with_message(format!("A question needs exactly {} options", OPTION_COUNT).into()));
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Err(ValidationError::new("options").with_message("Options cannot be empty".into()));
    }
    Ok(())
}

pub struct QuestionService;

impl QuestionService {
    pub async fn create<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        req: CreateQuestion,
    ) -> ServiceResult<question::Model> {
        req.validate()?;
        let subject = match req.subject.filter(|s| !s.trim().is_empty()) {
            Some(s) => s,
            None => session
                .store
                .get::<teacher::Model>(actor.id)
                .await?
                .subject
                .ok_or_else(|| ServiceError::Validation("Question subject is required".into()))?,
        };

        let now = Utc::now();
        let question = session
            .store
            .insert(question::Model {
                id: 0,
                question_text: req.question_text.trim().to_string(),
                options: OptionList(req.options),
                correct_option: req.correct_option,
                subject,
                teacher_id: actor.id,
                created_at: now,
                updated_at: now,
            })
            .await?;
        info!(question_id = question.id, teacher_id = actor.id, "question created");
        Ok(question)
    }

    /// The caller's questions, optionally of one subject. Admins see all.
    pub async fn list<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        subject: Option<String>,
    ) -> ServiceResult<Vec<question::Model>> {
        let mut filters = Vec::new();
        if !actor.is_admin() {
            filters.push(FilterParam::eq("teacher_id", actor.id));
        }
        if let Some(subject) = subject {
            filters.push(FilterParam::eq("subject", subject));
        }
        Ok(session.store.find_all(&filters).await?)
    }

    /// Text and options may change. The correct option may not change while a
    /// test uses the question.
    pub async fn update<S: Store>(
        session: &Session<S>,
        actor: &Actor,
        question_id: i64,
        req: UpdateQuestion,
    ) -> ServiceResult<question::Model> {
        req.validate()?;
        let mut question: question::Model = session.store.get(question_id).await?;
        actor.ensure_manages(question.teacher_id, "question")?;

        if let Some(correct) = req.correct_option {
            if correct != question.correct_option
                && is_referenced(&session.store, &question).await?
            {
                return Err(ServiceError::Conflict(
                    "The correct option of a question used by a test cannot change".into(),
                ));
            }
            question.correct_option = correct;
        }
        if let Some(text) = req.question_text {
            question.question_text = text.trim().to_string();
        }
        if let Some(options) = req.options {
            question.options = OptionList(options);
        }
        question.updated_at = Utc::now();
        Ok(session.store.update(question).await?)
    }

    pub async fn delete<S: Store>(session: &Session<S>, actor: &Actor, question_id: i64) -> ServiceResult<()> {
        let question: question::Model = session.store.get(question_id).await?;
        actor.ensure_manages(question.teacher_id, "question")?;

        if is_referenced(&session.store, &question).await? {
            return Err(ServiceError::Conflict(
                "Question is used by a test and cannot be deleted".into(),
            ));
        }
        session.store.delete_by_id::<question::Model>(question_id).await?;
        info!(question_id, "question deleted");
        Ok(())
    }
}

async fn is_referenced<S: Store>(store: &S, question: &question::Model) -> ServiceResult<bool> {
    Ok(store
        .find_all::<test::Model>(&[FilterParam::eq("teacher_id", question.teacher_id)])
        .await?
        .iter()
        .any(|t| t.question_ids.contains(question.id)))
}
