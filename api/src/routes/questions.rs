//! `/questions`: the caller's question bank.

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    routing::{get, put},
};
use db::models::question;
use serde::Deserialize;
use services::question_service::{CreateQuestion, QuestionService, UpdateQuestion};

use crate::auth::AuthUser;
use crate::response::{ApiResult, created, ok};
use crate::state::AppState;

pub fn questions_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route("/{question_id}", put(update_question).delete(delete_question))
}

#[derive(Debug, Deserialize)]
pub struct ListQuestionsQuery {
    pub subject: Option<String>,
}

/// GET /questions?subject=Math
pub async fn list_questions(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuestionsQuery>,
) -> ApiResult<Vec<question::Model>> {
    let session = app_state.session().await;
    let questions = QuestionService::list(&session, &user.actor(), query.subject).await?;
    ok(questions, "Questions retrieved successfully")
}

/// POST /questions
///
/// ### Request Body
/// ```json
/// {
///   "question_text": "1/2 + 1/4 = ?",
///   "options": ["3/4", "2/6", "1/8", "2/4"],
///   "correct_option": 0
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (not exactly four non-empty options, index outside 0..=3)
pub async fn create_question(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateQuestion>,
) -> ApiResult<question::Model> {
    let session = app_state.session().await;
    let question = QuestionService::create(&session, &user.actor(), req).await?;
    created(question, "Question created successfully")
}

/// PUT /questions/{question_id}
///
/// The correct option of a question used by a test cannot change.
pub async fn update_question(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(question_id): Path<i64>,
    Json(req): Json<UpdateQuestion>,
) -> ApiResult<question::Model> {
    let session = app_state.session().await;
    let question = QuestionService::update(&session, &user.actor(), question_id, req).await?;
    ok(question, "Question updated successfully")
}

/// DELETE /questions/{question_id}
///
/// Refused with `409 Conflict` while a test uses the question.
pub async fn delete_question(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(question_id): Path<i64>,
) -> ApiResult<()> {
    let session = app_state.session().await;
    QuestionService::delete(&session, &user.actor(), question_id).await?;
    ok((), "Question deleted successfully")
}
