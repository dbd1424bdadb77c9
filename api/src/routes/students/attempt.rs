use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::student::EarlyAccess;
use serde::Deserialize;
use services::access_gate::{AccessGate, StartOutcome};
use services::submission_engine::{Submission, SubmissionEngine, SubmissionResult};

use crate::response::{ApiError, ApiResponse, ApiResult, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login_code: String,
}

/// POST /students/start
///
/// Opens an attempt for the student owning `login_code` on the test assigned to
/// their group. The questions come without their correct option.
///
/// ### Request Body
/// ```json
/// { "login_code": "4821" }
/// ```
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "student_id": 3, "full_name": "Ann Lee", "chosen_subject": "Math",
///     "test_id": 1, "topic": "Fractions", "assignment_version": 2,
///     "questions": [{ "id": 7, "question_text": "...", "options": ["a", "b", "c", "d"] }]
///   },
///   "message": "Attempt started"
/// }
/// ```
///
/// - `403 Forbidden` (cooldown, pending request, or already submitted)
/// ```json
/// {
///   "success": false,
///   "data": {
///     "reason": "cooldown",
///     "message": "You can take the test again in 4 day(s). You may ask your teacher for early access.",
///     "can_request_early_access": true,
///     "days_remaining": 4,
///     "early_access_request": null
///   },
///   "message": "You can take the test again in 4 day(s). You may ask your teacher for early access."
/// }
/// ```
///
/// - `404 Not Found` (unknown login code)
/// - `409 Conflict` (no group, or no test assigned)
pub async fn start_attempt(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let session = app_state.session().await;
    match AccessGate::start(&session, req.login_code.trim()).await? {
        StartOutcome::Started(attempt) => {
            Ok((StatusCode::OK, Json(ApiResponse::success(attempt, "Attempt started"))).into_response())
        }
        StartOutcome::Blocked(blocked) => {
            let message = blocked.message.clone();
            let body = ApiResponse {
                success: false,
                data: blocked,
                message,
            };
            Ok((StatusCode::FORBIDDEN, Json(body)).into_response())
        }
    }
}

/// POST /students/submit
///
/// Grades a completed attempt. Answers are compared by option index; questions
/// left unanswered count neither as correct nor as wrong.
///
/// ### Request Body
/// ```json
/// {
///   "student_id": 3,
///   "test_id": 1,
///   "answers": [{ "question_id": 7, "selected_option": 2 }],
///   "time_spent": 540,
///   "assignment_version": 2
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ score, correct_count, wrong_count, question_count }`
/// - `400 Bad Request` (option index out of range, negative time)
/// - `403 Forbidden` (cooldown active)
/// - `404 Not Found` (student or test)
/// - `409 Conflict` (already submitted, or the group's assignment changed)
pub async fn submit_attempt(
    State(app_state): State<AppState>,
    Json(submission): Json<Submission>,
) -> ApiResult<SubmissionResult> {
    let session = app_state.session().await;
    let result = SubmissionEngine::submit(&session, submission).await?;
    ok(result, "Test submitted successfully")
}

/// POST /students/request-early-access
///
/// Asks the student's teacher for permission to retake the test before the
/// cooldown ends. Repeating the request reopens it.
///
/// ### Request Body
/// ```json
/// { "login_code": "4821" }
/// ```
///
/// ### Responses
/// - `200 OK` with the early access record
/// - `404 Not Found` (unknown login code)
pub async fn request_early_access(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<EarlyAccess> {
    let session = app_state.session().await;
    let student = AccessGate::request_early_access(&session, req.login_code.trim()).await?;
    ok(
        student.early_access,
        "Your request has been sent to your teacher",
    )
}
