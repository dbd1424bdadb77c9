#[cfg(test)]
mod tests {
    use crate::helpers::{TestApp, call, make_fallback_app, make_test_app};
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    struct Classroom {
        test_id: i64,
        question_ids: Vec<i64>,
        group_id: i64,
        student_id: i64,
        login_code: String,
    }

    /// Three questions (correct option 2), a test over them, a group with the
    /// test assigned and one student, all through the HTTP surface.
    async fn classroom(t: &TestApp) -> Classroom {
        let token = Some(t.teacher_token.as_str());
        let mut question_ids = Vec::new();
        for i in 0..3 {
            let (status, json) = call(
                t,
                "POST",
                "/api/questions",
                token,
                Some(json!({
                    "question_text": format!("Question {i}"),
                    "options": ["a", "b", "c", "d"],
                    "correct_option": 2
                })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            question_ids.push(json["data"]["id"].as_i64().unwrap());
        }

        let (status, json) = call(
            t,
            "POST",
            "/api/tests",
            token,
            Some(json!({ "topic": "Fractions", "question_ids": question_ids })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let test_id = json["data"]["id"].as_i64().unwrap();
        assert_eq!(json["data"]["access_code"].as_str().unwrap().len(), 4);

        let (status, json) = call(t, "POST", "/api/groups", token, Some(json!({ "name": "7A" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let group_id = json["data"]["id"].as_i64().unwrap();

        let (status, _) = call(
            t,
            "PUT",
            &format!("/api/groups/{group_id}/assign-test"),
            token,
            Some(json!({ "test_id": test_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = call(
            t,
            "POST",
            "/api/students",
            token,
            Some(json!({ "full_name": "Ann Lee", "group_id": group_id })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        Classroom {
            test_id,
            question_ids,
            group_id,
            student_id: json["data"]["id"].as_i64().unwrap(),
            login_code: json["data"]["login_code"].as_str().unwrap().to_string(),
        }
    }

    fn answers(c: &Classroom, picks: &[i64]) -> Value {
        json!({
            "student_id": c.student_id,
            "test_id": c.test_id,
            "answers": c.question_ids.iter().zip(picks).map(|(q, p)| json!({
                "question_id": q, "selected_option": p
            })).collect::<Vec<_>>(),
            "time_spent": 120
        })
    }

    async fn full_attempt_cycle(t: TestApp) {
        let c = classroom(&t).await;
        let login = json!({ "login_code": c.login_code });

        let (status, json) = call(&t, "POST", "/api/students/start", None, Some(login.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["test_id"], c.test_id);
        let questions = json["data"]["questions"].as_array().unwrap();
        assert_eq!(questions.len(), 3);
        assert!(questions.iter().all(|q| q.get("correct_option").is_none()));

        // Two answered, one of them correct, one left blank.
        let (status, json) = call(&t, "POST", "/api/students/submit", None, Some(answers(&c, &[2, 0]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["score"], 1);
        assert_eq!(json["data"]["correct_count"], 1);
        assert_eq!(json["data"]["wrong_count"], 1);

        let (status, json) = call(&t, "POST", "/api/students/submit", None, Some(answers(&c, &[2, 2, 2]))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["success"], false);

        let (status, json) = call(&t, "POST", "/api/students/start", None, Some(login.clone())).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["data"]["reason"], "cooldown");
        assert_eq!(json["data"]["days_remaining"], 7);
        assert_eq!(json["data"]["can_request_early_access"], true);

        let (status, json) = call(&t, "POST", "/api/students/request-early-access", None, Some(login.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["state"], "requested");

        let (_, json) = call(&t, "GET", "/api/students/pending-approvals", Some(&t.teacher_token), None).await;
        assert_eq!(json["data"][0]["id"], c.student_id);

        let (status, json) = call(
            &t,
            "POST",
            &format!("/api/students/{}/early-access", c.student_id),
            Some(&t.teacher_token),
            Some(json!({ "approved": true })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Early access approved");
        assert_eq!(json["data"]["early_access"]["state"], "approved");

        let (status, _) = call(&t, "POST", "/api/students/start", None, Some(login)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = call(&t, "POST", "/api/students/submit", None, Some(answers(&c, &[2, 2, 2]))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["score"], 3);

        let (_, json) = call(
            &t,
            "GET",
            &format!("/api/students/{}", c.student_id),
            Some(&t.teacher_token),
            None,
        )
        .await;
        assert_eq!(json["data"]["early_access"]["state"], "none");
        assert_eq!(json["data"]["status"], "checked");
        assert_eq!(json["data"]["group_name"], "7A");
        assert_eq!(json["data"]["test_topic"], "Fractions");
    }

    #[tokio::test]
    async fn full_attempt_cycle_on_primary() {
        full_attempt_cycle(make_test_app().await).await;
    }

    #[tokio::test]
    async fn full_attempt_cycle_on_fallback() {
        full_attempt_cycle(make_fallback_app().await).await;
    }

    #[tokio::test]
    async fn unknown_login_code_is_not_found() {
        let t = make_test_app().await;
        let (status, json) = call(&t, "POST", "/api/students/start", None, Some(json!({ "login_code": "0000" }))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn reassignment_resets_and_invalidates_started_attempts() {
        let t = make_test_app().await;
        let c = classroom(&t).await;

        let (_, json) = call(&t, "POST", "/api/students/start", None, Some(json!({ "login_code": c.login_code }))).await;
        let version = json["data"]["assignment_version"].as_i64().unwrap();

        let (status, json) = call(
            &t,
            "PUT",
            &format!("/api/groups/{}/assign-test", c.group_id),
            Some(&t.teacher_token),
            Some(json!({ "test_id": c.test_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["assignment_version"], version + 1);

        let mut stale = answers(&c, &[2, 2, 2]);
        stale["assignment_version"] = json!(version);
        let (status, _) = call(&t, "POST", "/api/students/submit", None, Some(stale)).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn out_of_range_option_is_rejected() {
        let t = make_test_app().await;
        let c = classroom(&t).await;
        let (status, _) = call(&t, "POST", "/api/students/submit", None, Some(answers(&c, &[4]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn another_teacher_cannot_decide() {
        let t = make_test_app().await;
        let c = classroom(&t).await;
        call(&t, "POST", "/api/students/request-early-access", None, Some(json!({ "login_code": c.login_code }))).await;

        let (status, json) = call(
            &t,
            "POST",
            "/api/teachers",
            Some(&t.admin_token),
            Some(json!({ "name": "Mr Other", "email": "other@school.test", "subject": "Art" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let other_id = json["data"]["id"].as_i64().unwrap();
        let (other_token, _) =
            api::auth::generate_jwt(other_id, db::models::teacher::Role::Teacher).unwrap();

        let (status, _) = call(
            &t,
            "POST",
            &format!("/api/students/{}/early-access", c.student_id),
            Some(&other_token),
            Some(json!({ "approved": true })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &t,
            "POST",
            &format!("/api/students/{}/early-access", c.student_id),
            Some(&t.admin_token),
            Some(json!({ "approved": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}
