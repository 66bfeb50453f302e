mod common;

use axum::http::StatusCode;
use serde_json::json;

fn listing_body(title: &str) -> serde_json::Value {
    json!({
        "titulo": title,
        "descripcion": "Empanadas, coffee and juice all day",
        "ubicacion": "Building 401, ground floor",
        "precio": "2500",
    })
}

#[tokio::test]
async fn vendor_keeps_at_most_one_active_listing() {
    let Some(app) = common::setup().await else { return };
    let (institution_id, domain) = app.institution().await;
    let (vendor, vendor_id) = app
        .verified_account(institution_id, &domain, "Vera", "vendor")
        .await;

    let (status, first) = app
        .send("POST", "/chazas", Some(&vendor), Some(listing_body("Snacks")))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", first);
    assert_eq!(first["owner_id"], vendor_id.to_string());
    assert_eq!(first["institution_id"], institution_id.to_string());
    assert_eq!(first["category"], "comida");

    let (status, _) = app
        .send("POST", "/chazas", Some(&vendor), Some(listing_body("More snacks")))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let first_id = first["id"].as_str().unwrap();
    let (status, _) = app
        .send("DELETE", &format!("/chazas/{}", first_id), Some(&vendor), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Soft delete keeps the row.
    let (status, kept) = app.send("GET", &format!("/chazas/{}", first_id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(kept["is_active"], false);

    let (status, _) = app
        .send("POST", "/chazas", Some(&vendor), Some(listing_body("More snacks")))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Reactivating the old one while another is active conflicts.
    let (status, _) = app
        .send(
            "PUT",
            &format!("/chazas/{}", first_id),
            Some(&vendor),
            Some(json!({ "is_active": true })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, mine) = app.send("GET", "/chazas/mis-chazas", Some(&vendor), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn colliding_titles_get_distinct_slugs() {
    let Some(app) = common::setup().await else { return };
    let (institution_id, domain) = app.institution().await;
    let (first_vendor, _) = app
        .verified_account(institution_id, &domain, "Oscar", "vendor")
        .await;
    let (second_vendor, _) = app
        .verified_account(institution_id, &domain, "Olga", "vendor")
        .await;

    let title = format!("Café Olé {}", &uuid::Uuid::new_v4().simple().to_string()[..6]);
    let folded = title.replace("Café Olé", "cafe-ole");

    let (_, first) = app
        .send("POST", "/chazas", Some(&first_vendor), Some(listing_body(&title)))
        .await;
    let (_, second) = app
        .send("POST", "/chazas", Some(&second_vendor), Some(listing_body(&folded)))
        .await;

    let first_slug = first["slug"].as_str().unwrap();
    let second_slug = second["slug"].as_str().unwrap();
    assert!(first_slug.starts_with("cafe-ole-"));
    assert_ne!(first_slug, second_slug);
    assert!(second_slug.starts_with(first_slug));
    assert_eq!(second_slug.len(), first_slug.len() + 9);

    let (status, found) = app
        .send("GET", &format!("/chazas/slug/{}", second_slug), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], second["id"]);
}

#[tokio::test]
async fn seekers_and_strangers_cannot_manage_listings() {
    let Some(app) = common::setup().await else { return };
    let (institution_id, domain) = app.institution().await;
    let (seeker, _) = app
        .verified_account(institution_id, &domain, "Sara", "seeker")
        .await;
    let (owner, _) = app
        .verified_account(institution_id, &domain, "Omar", "vendor")
        .await;
    let (other, _) = app
        .verified_account(institution_id, &domain, "Otto", "vendor")
        .await;

    let (status, _) = app
        .send("POST", "/chazas", Some(&seeker), Some(listing_body("Nope")))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, listing) = app
        .send("POST", "/chazas", Some(&owner), Some(listing_body("Arepas")))
        .await;
    let id = listing["id"].as_str().unwrap();

    let (status, _) = app
        .send(
            "PUT",
            &format!("/chazas/{}", id),
            Some(&other),
            Some(json!({ "titulo": "Stolen" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .send(
            "PUT",
            &format!("/chazas/{}", id),
            Some(&owner),
            Some(json!({ "ubicacion": "Central library" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["location"], "Central library");
    assert_eq!(updated["title"], "Arepas");

    let (status, _) = app
        .send(
            "PUT",
            &format!("/chazas/{}", uuid::Uuid::new_v4()),
            Some(&owner),
            Some(json!({ "titulo": "Ghost" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schedule_slots_are_validated_and_replaced_atomically() {
    let Some(app) = common::setup().await else { return };
    let (institution_id, domain) = app.institution().await;
    let (owner, _) = app
        .verified_account(institution_id, &domain, "Paula", "vendor")
        .await;
    let (other, _) = app
        .verified_account(institution_id, &domain, "Pedro", "vendor")
        .await;
    let (_, listing) = app
        .send("POST", "/chazas", Some(&owner), Some(listing_body("Jugos")))
        .await;
    let id = listing["id"].as_str().unwrap();
    let slots_uri = format!("/chazas/{}/horarios", id);

    let (status, slot) = app
        .send(
            "POST",
            &slots_uri,
            Some(&owner),
            Some(json!({ "weekday": 0, "start_hour": 8, "end_hour": 12 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    for bad in [
        json!({ "weekday": 7, "start_hour": 8, "end_hour": 12 }),
        json!({ "weekday": 1, "start_hour": 12, "end_hour": 12 }),
        json!({ "weekday": 1, "start_hour": 8, "end_hour": 24 }),
    ] {
        let (status, _) = app.send("POST", &slots_uri, Some(&owner), Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = app
        .send(
            "POST",
            &slots_uri,
            Some(&other),
            Some(json!({ "weekday": 2, "start_hour": 8, "end_hour": 10 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An invalid entry leaves the previous schedule in place.
    let (status, _) = app
        .send(
            "PUT",
            &slots_uri,
            Some(&owner),
            Some(json!([
                { "weekday": 1, "start_hour": 9, "end_hour": 11 },
                { "weekday": 2, "start_hour": 15, "end_hour": 14 }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, current) = app.send("GET", &slots_uri, None, None).await;
    assert_eq!(current.as_array().unwrap().len(), 1);

    let (status, replaced) = app
        .send(
            "PUT",
            &slots_uri,
            Some(&owner),
            Some(json!([
                { "dia_semana": 1, "hora_inicio": 9, "hora_fin": 11 },
                { "dia_semana": 3, "hora_inicio": 14, "hora_fin": 18 }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced.as_array().unwrap().len(), 2);
    let (_, current) = app.send("GET", &slots_uri, None, None).await;
    let current = current.as_array().unwrap();
    assert_eq!(current.len(), 2);
    assert!(current.iter().all(|s| s["id"] != slot["id"]));

    let slot_id = current[0]["id"].as_str().unwrap();
    let (status, _) = app
        .send(
            "DELETE",
            &format!("/chazas/horarios/{}", slot_id),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app
        .send(
            "DELETE",
            &format!("/chazas/horarios/{}", slot_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, unknown) = app
        .send(
            "GET",
            &format!("/chazas/{}/horarios", uuid::Uuid::new_v4()),
            None,
            None,
        )
        .await;
    assert_eq!(unknown, json!([]));
}

#[tokio::test]
async fn public_listing_filters_by_institution() {
    let Some(app) = common::setup().await else { return };
    let (institution_id, domain) = app.institution().await;
    let (owner, _) = app
        .verified_account(institution_id, &domain, "Rosa", "vendor")
        .await;
    let (_, listing) = app
        .send("POST", "/chazas", Some(&owner), Some(listing_body("Tamales")))
        .await;

    let (status, items) = app
        .send(
            "GET",
            &format!("/chazas?universidad_id={}&limit=500", institution_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = items.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], listing["id"]);

    let (status, inst) = app
        .send("GET", &format!("/universidades/{}", institution_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, by_slug) = app
        .send(
            "GET",
            &format!("/universidades/slug/{}", inst["slug"].as_str().unwrap()),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_slug["id"], inst["id"]);
}
