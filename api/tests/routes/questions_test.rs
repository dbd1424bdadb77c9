#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, make_test_app, request};
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn question_needs_four_options() {
        let t = make_test_app().await;
        let body = json!({
            "question_text": "2 + 2 = ?",
            "options": ["4", "5"],
            "correct_option": 0
        });
        let response = t
            .app
            .oneshot(request("POST", "/api/questions", Some(&t.teacher_token), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "A question needs exactly 4 options");
    }

    #[tokio::test]
    async fn created_question_takes_the_teachers_subject() {
        let t = make_test_app().await;
        let body = json!({
            "question_text": "2 + 2 = ?",
            "options": ["4", "5", "6", "7"],
            "correct_option": 0
        });
        let response = t
            .app
            .clone()
            .oneshot(request("POST", "/api/questions", Some(&t.teacher_token), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["subject"], "Math");

        let response = t
            .app
            .oneshot(request("GET", "/api/questions?subject=Math", Some(&t.teacher_token), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let t = make_test_app().await;
        let response = t
            .app
            .oneshot(request("GET", "/api/questions", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Authentication required");
    }
}
