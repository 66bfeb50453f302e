mod common;

use axum::http::StatusCode;
use serde_json::json;

struct Marketplace {
    app: common::TestApp,
    vendor: String,
    seeker: String,
    listing_id: String,
}

async fn marketplace() -> Option<Marketplace> {
    let app = common::setup().await?;
    let (institution_id, domain) = app.institution().await;
    let (vendor, _) = app
        .verified_account(institution_id, &domain, "Victor", "vendor")
        .await;
    let (seeker, _) = app
        .verified_account(institution_id, &domain, "Sofia", "seeker")
        .await;

    let (status, listing) = app
        .send(
            "POST",
            "/chazas",
            Some(&vendor),
            Some(json!({
                "title": "Snacks",
                "description": "Snacks between classes, all week",
                "location": "Engineering building",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let listing_id = listing["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            "POST",
            &format!("/chazas/{}/horarios", listing_id),
            Some(&vendor),
            Some(json!({ "weekday": 0, "start_hour": 8, "end_hour": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    Some(Marketplace {
        app,
        vendor,
        seeker,
        listing_id,
    })
}

#[tokio::test]
async fn accepted_application_notifies_both_sides() {
    let Some(m) = marketplace().await else { return };
    let app = &m.app;

    let (status, created) = app
        .send(
            "POST",
            "/solicitudes",
            Some(&m.seeker),
            Some(json!({
                "chaza_id": m.listing_id,
                "horarios_seleccionados": ["0-9"],
                "mensaje": "I can work Monday mornings",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", created);
    assert_eq!(created["state"], "pending");
    let application_id = created["application_id"].as_str().unwrap().to_string();

    let (status, answered) = app
        .send(
            "PUT",
            &format!("/solicitudes/{}/responder", application_id),
            Some(&m.vendor),
            Some(json!({ "estado": "accepted", "respuesta": "See you Monday" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answered["state"], "accepted");
    assert!(!answered["responded_at"].is_null());

    let (_, seeker_feed) = app
        .send("GET", "/notificaciones?solo_sin_leer=true", Some(&m.seeker), None)
        .await;
    let seeker_feed = seeker_feed.as_array().unwrap();
    assert_eq!(seeker_feed.len(), 1);
    assert_eq!(seeker_feed[0]["kind"], "postulacion_aceptada");
    assert_eq!(seeker_feed[0]["is_read"], false);

    let (_, vendor_feed) = app
        .send("GET", "/notificaciones?solo_sin_leer=true", Some(&m.vendor), None)
        .await;
    let vendor_feed = vendor_feed.as_array().unwrap();
    assert_eq!(vendor_feed.len(), 1);
    assert_eq!(vendor_feed[0]["kind"], "nueva_postulacion");
    assert!(vendor_feed[0]["body"]
        .as_str()
        .unwrap()
        .contains("Monday: 9:00"));
    assert_eq!(vendor_feed[0]["application_id"], application_id.as_str());

    // Terminal states do not move.
    let (status, _) = app
        .send(
            "PUT",
            &format!("/solicitudes/{}/responder", application_id),
            Some(&m.vendor),
            Some(json!({ "estado": "rejected" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (_, detail) = app
        .send(
            "GET",
            &format!("/solicitudes/{}", application_id),
            Some(&m.seeker),
            None,
        )
        .await;
    assert_eq!(detail["state"], "accepted");
    assert_eq!(detail["listing_title"], "Snacks");
    assert_eq!(detail["seeker_name"], "Sofia");
    assert_eq!(detail["horarios_formateados"], "Monday: 9:00");
}

#[tokio::test]
async fn second_pending_application_conflicts() {
    let Some(m) = marketplace().await else { return };
    let app = &m.app;
    let body = json!({ "listing_id": m.listing_id, "selected_slots": ["0-8", "0-9"] });

    let (status, first) = app
        .send("POST", "/solicitudes", Some(&m.seeker), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .send("POST", "/solicitudes", Some(&m.seeker), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, mine) = app
        .send("GET", "/solicitudes/mis-solicitudes", Some(&m.seeker), None)
        .await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["state"], "pending");
    assert_eq!(mine[0]["id"], first["application_id"]);

    // After cancelling, a fresh application is allowed.
    let (status, cancelled) = app
        .send(
            "PUT",
            &format!(
                "/solicitudes/{}/cancelar",
                first["application_id"].as_str().unwrap()
            ),
            Some(&m.seeker),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["state"], "cancelled");
    let (status, _) = app
        .send("POST", "/solicitudes", Some(&m.seeker), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, vendor_feed) = app
        .send("GET", "/notificaciones", Some(&m.vendor), None)
        .await;
    let kinds: Vec<&str> = vendor_feed
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["kind"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["nueva_postulacion", "postulacion_cancelada", "nueva_postulacion"]
    );
}

#[tokio::test]
async fn apply_rejects_bad_input_and_own_listing() {
    let Some(m) = marketplace().await else { return };
    let app = &m.app;

    let (status, _) = app
        .send(
            "POST",
            "/solicitudes",
            Some(&m.seeker),
            Some(json!({ "listing_id": m.listing_id, "selected_slots": ["7-9"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/solicitudes",
            Some(&m.seeker),
            Some(json!({ "listing_id": m.listing_id, "selected_slots": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            "POST",
            "/solicitudes",
            Some(&m.seeker),
            Some(json!({ "listing_id": uuid::Uuid::new_v4(), "selected_slots": ["0-9"] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Vendors are not seekers.
    let (status, _) = app
        .send(
            "POST",
            "/solicitudes",
            Some(&m.vendor),
            Some(json!({ "listing_id": m.listing_id, "selected_slots": ["0-9"] })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn only_participants_see_and_act_on_applications() {
    let Some(m) = marketplace().await else { return };
    let app = &m.app;
    let (institution_id, domain) = app.institution().await;
    let (stranger, _) = app
        .verified_account(institution_id, &domain, "Tomas", "seeker")
        .await;

    let (_, created) = app
        .send(
            "POST",
            "/solicitudes",
            Some(&m.seeker),
            Some(json!({ "listing_id": m.listing_id, "selected_slots": ["0-10"] })),
        )
        .await;
    let application_id = created["application_id"].as_str().unwrap();

    let (status, _) = app
        .send(
            "GET",
            &format!("/solicitudes/{}", application_id),
            Some(&stranger),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Someone else's application looks missing on cancel.
    let (status, _) = app
        .send(
            "PUT",
            &format!("/solicitudes/{}/cancelar", application_id),
            Some(&stranger),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(
            "PUT",
            &format!("/solicitudes/{}/responder", application_id),
            Some(&m.seeker),
            Some(json!({ "state": "accepted" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(
            "GET",
            &format!("/solicitudes/chaza/{}", m.listing_id),
            Some(&stranger),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, received) = app
        .send(
            "GET",
            &format!("/solicitudes/chaza/{}?estado=pending", m.listing_id),
            Some(&m.vendor),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let received = received.as_array().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0]["seeker_name"], "Sofia");
    assert!(received[0]["seeker_email"].as_str().is_some());

    let (_, none_accepted) = app
        .send(
            "GET",
            &format!("/solicitudes/chaza/{}?estado=accepted", m.listing_id),
            Some(&m.vendor),
            None,
        )
        .await;
    assert_eq!(none_accepted, json!([]));

    let (status, _) = app
        .send(
            "PUT",
            &format!("/solicitudes/{}/responder", uuid::Uuid::new_v4()),
            Some(&m.vendor),
            Some(json!({ "state": "rejected" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, rejected) = app
        .send(
            "PUT",
            &format!("/solicitudes/{}/responder", application_id),
            Some(&m.vendor),
            Some(json!({ "state": "rejected" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["state"], "rejected");

    let (status, _) = app
        .send(
            "PUT",
            &format!("/solicitudes/{}/cancelar", application_id),
            Some(&m.seeker),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
