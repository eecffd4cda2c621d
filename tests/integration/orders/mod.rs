//! Order status integration tests

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use crate::common::{error_code, TestApp};

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_create_and_get_order() {
        let app = TestApp::new();
        let id = app.create_order(None).await;

        let (status, body) = app
            .send(Method::GET, &format!("/v1/orders/{}", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PENDING");
        assert_eq!(body["version"], 0);
        assert_eq!(body["is_terminal"], false);
    }

    #[tokio::test]
    async fn test_unknown_order_is_404() {
        let app = TestApp::new();
        let (status, body) = app
            .send(Method::GET, &format!("/v1/orders/{}", Uuid::new_v4()), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_full_lifecycle_by_responsible_roles() {
        let app = TestApp::new();
        let id = app.create_order(None).await;

        for (role, target) in [
            ("SALES_DEPT", "APPROVED"),
            ("PRODUCTION", "IN_PRODUCTION"),
            ("PRODUCTION_MANAGER", "READY"),
            ("WAREHOUSE", "SHIPPED"),
            ("SALES_DEPT", "DELIVERED"),
        ] {
            let (status, body) = app.change_status(id, role, target).await;
            assert_eq!(status, StatusCode::OK, "{} -> {}: {}", role, target, body);
            assert_eq!(body["order"]["status"], target);
            assert_eq!(body["transition"]["new_status"], target);
        }

        let (_, order) = app
            .send(Method::GET, &format!("/v1/orders/{}", id), None)
            .await;
        assert_eq!(order["version"], 5);
        assert_eq!(order["is_terminal"], true);
    }
}

mod transitions {
    use super::*;

    #[tokio::test]
    async fn test_allowed_transitions_per_role() {
        let app = TestApp::new();
        let id = app.create_order(None).await;

        let (status, body) = app
            .send(
                Method::GET,
                &format!("/v1/orders/{}/transitions?role=SALES_REP", id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["allowed"], json!(["CANCELLED"]));
        assert_eq!(body["can_remove_items"], false);

        let (_, body) = app
            .send(
                Method::GET,
                &format!("/v1/orders/{}/transitions?role=ADMIN", id),
                None,
            )
            .await;
        assert_eq!(body["allowed"], json!(["APPROVED", "CANCELLED"]));
        assert_eq!(body["can_remove_items"], true);
    }

    #[tokio::test]
    async fn test_terminal_order_has_no_transitions() {
        let app = TestApp::new();
        let id = app.create_order(Some("DELIVERED")).await;

        for role in ["ADMIN", "SALES_DEPT", "WAREHOUSE", "CLIENT"] {
            let (_, body) = app
                .send(
                    Method::GET,
                    &format!("/v1/orders/{}/transitions?role={}", id, role),
                    None,
                )
                .await;
            assert_eq!(body["allowed"], json!([]), "{}", role);
        }
    }

    #[tokio::test]
    async fn test_unknown_role_is_rejected() {
        let app = TestApp::new();
        let id = app.create_order(None).await;
        let (status, _) = app
            .send(
                Method::GET,
                &format!("/v1/orders/{}/transitions?role=JANITOR", id),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod status_changes {
    use super::*;

    #[tokio::test]
    async fn test_illegal_transition_is_422_and_changes_nothing() {
        let app = TestApp::new();
        let id = app.create_order(None).await;

        let (status, body) = app.change_status(id, "SALES_REP", "APPROVED").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&body), "ILLEGAL_TRANSITION");

        let (_, order) = app
            .send(Method::GET, &format!("/v1/orders/{}", id), None)
            .await;
        assert_eq!(order["status"], "PENDING");
        assert_eq!(order["version"], 0);

        let (_, history) = app
            .send(Method::GET, &format!("/v1/orders/{}/history", id), None)
            .await;
        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn test_terminal_order_rejects_changes() {
        let app = TestApp::new();
        let id = app.create_order(None).await;
        app.change_status(id, "SALES_REP", "CANCELLED").await;

        let (status, body) = app.change_status(id, "ADMIN", "APPROVED").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(error_code(&body), "ILLEGAL_TRANSITION");
    }

    #[tokio::test]
    async fn test_stale_version_is_409() {
        let app = TestApp::new();
        let id = app.create_order(None).await;
        app.change_status(id, "SALES_DEPT", "APPROVED").await;

        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/v1/orders/{}/status", id),
                Some(json!({
                    "new_status": "CANCELLED",
                    "actor_role": "ADMIN",
                    "actor_id": Uuid::new_v4(),
                    "expected_version": 0,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(error_code(&body), "CONFLICT");

        let (_, order) = app
            .send(Method::GET, &format!("/v1/orders/{}", id), None)
            .await;
        assert_eq!(order["status"], "APPROVED");
    }

    #[tokio::test]
    async fn test_change_on_unknown_order_is_404() {
        let app = TestApp::new();
        let (status, _) = app
            .change_status(Uuid::new_v4(), "ADMIN", "APPROVED")
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_overlong_note_is_400() {
        let app = TestApp::new();
        let id = app.create_order(None).await;
        let (status, body) = app
            .send(
                Method::PATCH,
                &format!("/v1/orders/{}/status", id),
                Some(json!({
                    "new_status": "APPROVED",
                    "actor_role": "ADMIN",
                    "actor_id": Uuid::new_v4(),
                    "note": "x".repeat(501),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), "VALIDATION_ERROR");
    }
}

mod history {
    use super::*;

    #[tokio::test]
    async fn test_history_is_oldest_first_with_actor_and_note() {
        let app = TestApp::new();
        let id = app.create_order(None).await;
        let sales_id = Uuid::new_v4();

        let (status, _) = app
            .send(
                Method::PATCH,
                &format!("/v1/orders/{}/status", id),
                Some(json!({
                    "new_status": "APPROVED",
                    "actor_role": "SALES_DEPT",
                    "actor_id": sales_id,
                    "note": "  proofs signed off  ",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        app.change_status(id, "PRODUCTION", "IN_PRODUCTION").await;

        let (status, history) = app
            .send(Method::GET, &format!("/v1/orders/{}/history", id), None)
            .await;
        assert_eq!(status, StatusCode::OK);

        let records = history.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["old_status"], "PENDING");
        assert_eq!(records[0]["new_status"], "APPROVED");
        assert_eq!(records[0]["actor_id"], sales_id.to_string());
        assert_eq!(records[0]["note"], "proofs signed off");
        assert_eq!(records[1]["new_status"], "IN_PRODUCTION");
        assert_eq!(records[1]["sequence"], 2);
    }

    #[tokio::test]
    async fn test_history_pagination() {
        let app = TestApp::new();
        let id = app.create_order(None).await;
        app.change_status(id, "ADMIN", "APPROVED").await;
        app.change_status(id, "ADMIN", "IN_PRODUCTION").await;
        app.change_status(id, "ADMIN", "READY").await;

        let (_, page) = app
            .send(
                Method::GET,
                &format!("/v1/orders/{}/history?offset=1&limit=1", id),
                None,
            )
            .await;
        let records = page.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["new_status"], "IN_PRODUCTION");
    }

    #[tokio::test]
    async fn test_history_of_unknown_order_is_404() {
        let app = TestApp::new();
        let (status, _) = app
            .send(
                Method::GET,
                &format!("/v1/orders/{}/history", Uuid::new_v4()),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, _) = app.send(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
