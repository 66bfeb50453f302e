mod common;

use axum::http::StatusCode;
use chazas_backend::models::notification::{NewNotification, NotificationKind};
use serde_json::json;
use uuid::Uuid;

async fn notify(app: &common::TestApp, recipient_id: Uuid, title: &str) -> Uuid {
    app.state
        .notification_service
        .create(NewNotification {
            recipient_id,
            kind: NotificationKind::Sistema,
            title: title.to_string(),
            body: "Platform notice".to_string(),
            listing_id: None,
            application_id: None,
        })
        .await
        .expect("create notification")
        .id
}

#[tokio::test]
async fn feed_is_scoped_to_its_owner() {
    let Some(app) = common::setup().await else { return };
    let (institution_id, domain) = app.institution().await;
    let (alice, alice_id) = app
        .verified_account(institution_id, &domain, "Alice", "seeker")
        .await;
    let (bob, bob_id) = app
        .verified_account(institution_id, &domain, "Bob", "seeker")
        .await;

    let first = notify(&app, alice_id, "first").await;
    let second = notify(&app, alice_id, "second").await;
    let third = notify(&app, alice_id, "third").await;
    let bobs = notify(&app, bob_id, "bob only").await;

    let (_, count) = app
        .send("GET", "/notificaciones/sin-leer/count", Some(&alice), None)
        .await;
    assert_eq!(count["unread"], 3);

    let (_, feed) = app.send("GET", "/notificaciones", Some(&alice), None).await;
    let titles: Vec<&str> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);

    // Another account's notification is reported as missing.
    let (status, _) = app
        .send(
            "PUT",
            &format!("/notificaciones/{}/leer", bobs),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .send("DELETE", &format!("/notificaciones/{}", bobs), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, read) = app
        .send(
            "PUT",
            &format!("/notificaciones/{}/leer", first),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["is_read"], true);
    assert!(!read["read_at"].is_null());

    let (status, marked) = app
        .send(
            "PUT",
            "/notificaciones/leer-varias",
            Some(&alice),
            Some(json!({ "notificacion_ids": [second, bobs] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(marked["updated"], 1);

    let (_, summary) = app
        .send("GET", "/notificaciones/resumen", Some(&alice), None)
        .await;
    assert_eq!(summary["unread"], 1);
    assert_eq!(summary["recent"].as_array().unwrap().len(), 3);

    let (_, marked) = app
        .send("PUT", "/notificaciones/leer-todas", Some(&alice), None)
        .await;
    assert_eq!(marked["updated"], 1);

    let (status, _) = app
        .send("DELETE", &format!("/notificaciones/{}", third), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, unread_only) = app
        .send("GET", "/notificaciones?solo_sin_leer=true", Some(&alice), None)
        .await;
    assert_eq!(unread_only, json!([]));

    let (_, bob_count) = app
        .send("GET", "/notificaciones/sin-leer/count", Some(&bob), None)
        .await;
    assert_eq!(bob_count["unread"], 1);
}

#[tokio::test]
async fn contact_form_is_stored() {
    let Some(app) = common::setup().await else { return };
    let subject = format!("Question {}", Uuid::new_v4());

    let (status, body) = app
        .send(
            "POST",
            "/contacto",
            None,
            Some(json!({
                "email": "Visitor@Example.com",
                "nombre": "Visitor",
                "asunto": subject,
                "mensaje": "How do I register my stall?",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["id"].as_str().is_some());

    let stored: (String, bool) =
        sqlx::query_as("SELECT email, is_read FROM contact_messages WHERE subject = $1")
            .bind(&subject)
            .fetch_one(&app.pool)
            .await
            .unwrap();
    assert_eq!(stored.0, "visitor@example.com");
    assert!(!stored.1);

    let (status, _) = app
        .send(
            "POST",
            "/contacto",
            None,
            Some(json!({ "email": "x@example.com", "asunto": "Hi", "mensaje": "short" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_reports_ok() {
    let Some(app) = common::setup().await else { return };
    let (status, body) = app.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
