#[cfg(test)]
mod tests {
    use crate::helpers::{get_json_body, make_test_app, request};
    use axum::http::StatusCode;
    use db::models::student;
    use serde_json::json;
    use services::assignment_graph::{AssignmentGraph, CreateGroup};
    use services::student_service::{CreateStudent, StudentService};
    use tower::ServiceExt;

    #[tokio::test]
    async fn teacher_cannot_delete_teachers() {
        let t = make_test_app().await;
        let response = t
            .app
            .oneshot(request(
                "DELETE",
                &format!("/api/teachers/{}", t.admin.id),
                Some(&t.teacher_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Admin access required");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let t = make_test_app().await;
        let response = t
            .app
            .oneshot(request(
                "POST",
                "/api/teachers",
                Some(&t.admin_token),
                Some(json!({ "name": "Copy", "email": "frizzle@school.test" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn deleting_a_teacher_cascades() {
        let t = make_test_app().await;
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
        let mut students: Vec<student::Model> = Vec::new();
        for name in ["Ann", "Bob"] {
            students.push(
                StudentService::create(
                    &session,
                    &t.teacher,
                    CreateStudent {
                        full_name: name.into(),
                        phone_number: None,
                        group_id: group.id,
                        chosen_subject: None,
                    },
                )
                .await
                .unwrap(),
            );
        }

        let response = t
            .app
            .clone()
            .oneshot(request(
                "DELETE",
                &format!("/api/teachers/{}", t.teacher.id),
                Some(&t.admin_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["students"], 2);
        assert_eq!(json["data"]["groups"], 1);

        for s in &students {
            let response = t
                .app
                .clone()
                .oneshot(request(
                    "GET",
                    &format!("/api/students/{}", s.id),
                    Some(&t.admin_token),
                    None,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let response = t
            .app
            .oneshot(request(
                "GET",
                &format!("/api/groups/{}", group.id),
                Some(&t.admin_token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
