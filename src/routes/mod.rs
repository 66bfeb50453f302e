pub mod applications;
pub mod auth;
pub mod contact;
pub mod health;
pub mod institutions;
pub mod listings;
pub mod notifications;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{
    auth::require_bearer_auth,
    cors::cors_from_origins,
    rate_limit::{new_rps_state, rps_middleware},
};
use crate::AppState;

const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Full HTTP surface with CORS, tracing and body limit applied.
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let public_routes = Router::new()
        .route("/health", get(health::health))
        .route("/universidades", get(institutions::list_institutions))
        .route("/universidades/:id", get(institutions::get_institution))
        .route(
            "/universidades/slug/:slug",
            get(institutions::get_institution_by_slug),
        )
        .route(
            "/universidades/email/:email",
            get(institutions::institution_for_email),
        )
        .route("/chazas", get(listings::list_listings))
        .route("/chazas/slug/:slug", get(listings::get_listing_by_slug))
        .route("/chazas/:id", get(listings::get_listing))
        .route("/chazas/:id/horarios", get(listings::list_slots));

    let limited_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/verify-registration", post(auth::verify_registration))
        .route("/auth/login", post(auth::login))
        .route(
            "/auth/resend-registration-code",
            post(auth::resend_registration_code),
        )
        .route("/contacto", post(contact::submit))
        .layer(from_fn_with_state(
            new_rps_state(config.public_rps, config.trust_proxy_headers),
            rps_middleware,
        ));

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/auth/send-verification", post(auth::send_verification))
        .route("/auth/resend-verification", post(auth::resend_verification))
        .route("/auth/verify-email", post(auth::verify_email))
        .route("/chazas", post(listings::create_listing))
        .route("/chazas/mis-chazas", get(listings::my_listings))
        .route(
            "/chazas/:id",
            put(listings::update_listing).delete(listings::delete_listing),
        )
        .route(
            "/chazas/:id/horarios",
            post(listings::add_slot).put(listings::replace_slots),
        )
        .route("/chazas/horarios/:slot_id", delete(listings::delete_slot))
        .route("/solicitudes", post(applications::apply))
        .route(
            "/solicitudes/mis-solicitudes",
            get(applications::my_applications),
        )
        .route(
            "/solicitudes/chaza/:listing_id",
            get(applications::listing_applications),
        )
        .route("/solicitudes/:id", get(applications::get_application))
        .route("/solicitudes/:id/responder", put(applications::respond))
        .route("/solicitudes/:id/cancelar", put(applications::cancel))
        .route("/notificaciones", get(notifications::list_notifications))
        .route("/notificaciones/resumen", get(notifications::summary))
        .route(
            "/notificaciones/sin-leer/count",
            get(notifications::unread_count),
        )
        .route("/notificaciones/leer-todas", put(notifications::mark_all_read))
        .route(
            "/notificaciones/leer-varias",
            put(notifications::mark_many_read),
        )
        .route("/notificaciones/:id/leer", put(notifications::mark_read))
        .route(
            "/notificaciones/:id",
            delete(notifications::delete_notification),
        )
        .route_layer(from_fn_with_state(state.clone(), require_bearer_auth));

    public_routes
        .merge(limited_routes)
        .merge(protected_routes)
        .with_state(state)
        .layer(cors_from_origins(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
