#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, make_test_app, request};
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn group_defaults_to_teacher_subject_and_lists_populated() {
        let t = make_test_app().await;
        let response = t
            .app
            .clone()
            .oneshot(request("POST", "/api/groups", Some(&t.teacher_token), Some(json!({ "name": "8B" }))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["subject"], "Math");
        assert_eq!(json["data"]["assigned_test_id"], serde_json::Value::Null);

        let response = t
            .app
            .oneshot(request("GET", "/api/groups", Some(&t.teacher_token), None))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        let groups = json["data"].as_array().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0]["teacher_name"], "Ms Frizzle");
        assert_eq!(groups[0]["student_count"], 0);
    }

    #[tokio::test]
    async fn unknown_group_is_not_found() {
        let t = make_test_app().await;
        let response = t
            .app
            .oneshot(request(
                "PUT",
                "/api/groups/99/assign-test",
                Some(&t.teacher_token),
                Some(json!({ "test_id": 1 })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Group 99 not found");
    }
}
