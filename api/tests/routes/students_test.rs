#[cfg(test)]
mod tests {
    use crate::helpers::{TestApp, call, make_fallback_app, make_test_app};
    use axum::http::StatusCode;
    use services::assignment_graph::{AssignmentGraph, CreateGroup};
    use services::student_service::{CreateStudent, StudentService};

    async fn students_filtered_by_subject(t: TestApp) {
        let session = t.state.session().await;
        let group = AssignmentGraph::create_group(
            &session,
            &t.teacher,
            CreateGroup {
                name: "7A".into(),
                subject: None,
                teacher_id: None,
            },
        )
        .await
        .unwrap();
        for (name, subject) in [("Ann", None), ("Bob", Some("Physics")), ("Cid", Some("Physics"))] {
            StudentService::create(
                &session,
                &t.teacher,
                CreateStudent {
                    full_name: name.into(),
                    phone_number: None,
                    group_id: group.id,
                    chosen_subject: subject.map(Into::into),
                },
            )
            .await
            .unwrap();
        }

        let token = Some(t.teacher_token.as_str());
        let (status, json) = call(&t, "GET", "/api/students?subject=Physics", token, None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["full_name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Bob", "Cid"]);
        assert_eq!(json["data"][0]["group_name"], "7A");

        let (_, json) = call(&t, "GET", "/api/students?subject=Math", token, None).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (_, json) = call(&t, "GET", "/api/students?subject=History", token, None).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn students_filtered_by_subject_on_primary() {
        students_filtered_by_subject(make_test_app().await).await;
    }

    #[tokio::test]
    async fn students_filtered_by_subject_on_fallback() {
        students_filtered_by_subject(make_fallback_app().await).await;
    }
}
