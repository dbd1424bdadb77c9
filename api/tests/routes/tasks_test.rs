#[cfg(test)]
mod tests {
    use crate::helpers::{TestApp, call, make_fallback_app, make_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    async fn admin_deletes_a_task(t: TestApp) {
        let admin = Some(t.admin_token.as_str());
        let (status, json) = call(
            &t,
            "POST",
            "/api/tasks",
            admin,
            Some(json!({ "teacher_id": t.teacher.id, "title": "Enter term marks" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let task_id = json["data"]["id"].as_i64().unwrap();
        let uri = format!("/api/tasks/{task_id}");

        let (status, json) = call(&t, "DELETE", &uri, Some(&t.teacher_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");

        let (status, _) = call(&t, "DELETE", &uri, admin, None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(&t, "DELETE", &uri, admin, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, json) = call(&t, "GET", "/api/tasks", Some(&t.teacher_token), None).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn admin_deletes_a_task_on_primary() {
        admin_deletes_a_task(make_test_app().await).await;
    }

    #[tokio::test]
    async fn admin_deletes_a_task_on_fallback() {
        admin_deletes_a_task(make_fallback_app().await).await;
    }
}
