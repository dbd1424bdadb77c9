#[cfg(test)]
mod tests {
    use crate::helpers::{TestApp, call, make_fallback_app, make_test_app};
    use axum::http::StatusCode;
    use serde_json::json;

    async fn catalogue_lifecycle(t: TestApp) {
        let admin = Some(t.admin_token.as_str());

        let (status, json) = call(&t, "POST", "/api/subjects", admin, Some(json!({ "name": "Front-end" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["name"], "Front-end");

        let (status, _) = call(&t, "POST", "/api/subjects", admin, Some(json!({ "name": "Front-end" }))).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&t, "POST", "/api/subjects", admin, Some(json!({ "name": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // Reading needs no token.
        let (status, json) = call(&t, "GET", "/api/subjects", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"][0]["name"], "Front-end");

        let (status, _) = call(&t, "DELETE", "/api/subjects/Front-end", admin, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = call(&t, "DELETE", "/api/subjects/Front-end", admin, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, json) = call(&t, "GET", "/api/subjects", None, None).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn catalogue_lifecycle_on_primary() {
        catalogue_lifecycle(make_test_app().await).await;
    }

    #[tokio::test]
    async fn catalogue_lifecycle_on_fallback() {
        catalogue_lifecycle(make_fallback_app().await).await;
    }

    #[tokio::test]
    async fn teacher_cannot_change_the_catalogue() {
        let t = make_test_app().await;
        let teacher = Some(t.teacher_token.as_str());

        let (status, json) = call(&t, "POST", "/api/subjects", teacher, Some(json!({ "name": "Design" }))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");

        let (status, _) = call(&t, "POST", "/api/subjects", None, Some(json!({ "name": "Design" }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = call(&t, "DELETE", "/api/subjects/Design", teacher, None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
