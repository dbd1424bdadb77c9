#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, make_fallback_app, make_test_app, request};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_primary_backend() {
        let t = make_test_app().await;
        let response = t.app.oneshot(request("GET", "/api/health", None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "OK");
        assert_eq!(json["data"]["backend"], "primary");
    }

    #[tokio::test]
    async fn health_reports_fallback_when_primary_is_disabled() {
        let t = make_fallback_app().await;
        let response = t.app.oneshot(request("GET", "/api/health", None, None)).await.unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["backend"], "fallback");
    }
}
