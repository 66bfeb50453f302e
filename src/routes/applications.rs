use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::application_dto::{
        ApplicationListQuery, ApplicationStateResponse, ApplyPayload, RespondPayload,
    },
    error::Result,
    models::{account::Account, application::ApplicationState},
    services::application_service::NewApplication,
    AppState,
};

#[utoipa::path(
    post,
    path = "/solicitudes",
    request_body = ApplyPayload,
    responses(
        (status = 201, description = "Application created", body = Json<ApplicationStateResponse>),
        (status = 400, description = "Unknown listing, own listing or invalid slots"),
        (status = 403, description = "Not a verified seeker"),
        (status = 409, description = "A pending application already exists")
    )
)]
#[axum::debug_handler]
pub async fn apply(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(payload): Json<ApplyPayload>,
) -> Result<impl IntoResponse> {
    account.require_verified_seeker()?;
    payload.validate()?;
    let application = state
        .application_service
        .apply(
            &account,
            NewApplication {
                listing_id: payload.listing_id,
                selected_slots: payload.selected_slots,
                message: payload.message,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApplicationStateResponse {
            message: "Application sent. The vendor will review it soon.".to_string(),
            application_id: application.id,
            state: application.state,
            responded_at: None,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/solicitudes/mis-solicitudes",
    responses(
        (status = 200, description = "Applications sent by the current account", body = Json<Vec<crate::dto::application_dto::ApplicationView>>)
    )
)]
#[axum::debug_handler]
pub async fn my_applications(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<impl IntoResponse> {
    let items = state.application_service.list_for_seeker(account.id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/solicitudes/chaza/{listing_id}",
    params(
        ("listing_id" = Uuid, Path, description = "Listing ID"),
        ("estado" = Option<String>, Query, description = "pending, accepted, rejected or cancelled")
    ),
    responses(
        (status = 200, description = "Applications received by the listing", body = Json<Vec<crate::dto::application_dto::ApplicationView>>),
        (status = 400, description = "Invalid state filter"),
        (status = 403, description = "Not the owner")
    )
)]
#[axum::debug_handler]
pub async fn listing_applications(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(listing_id): Path<Uuid>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let filter = query
        .state
        .as_deref()
        .map(str::parse::<ApplicationState>)
        .transpose()?;
    let items = state
        .application_service
        .list_for_listing(listing_id, account.id, filter)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/solicitudes/{id}",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application detail", body = Json<crate::dto::application_dto::ApplicationView>),
        (status = 403, description = "Neither applicant nor listing owner"),
        (status = 404, description = "Application not found")
    )
)]
#[axum::debug_handler]
pub async fn get_application(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let view = state.application_service.get_by_id(id, account.id).await?;
    Ok(Json(view))
}

#[utoipa::path(
    put,
    path = "/solicitudes/{id}/responder",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    request_body = RespondPayload,
    responses(
        (status = 200, description = "Application answered", body = Json<ApplicationStateResponse>),
        (status = 400, description = "State must be accepted or rejected"),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application is no longer pending")
    )
)]
#[axum::debug_handler]
pub async fn respond(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RespondPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let next: ApplicationState = payload.state.parse()?;
    let application = state
        .application_service
        .respond(id, account.id, next, payload.response)
        .await?;
    let message = match next {
        ApplicationState::Accepted => "Application accepted",
        _ => "Application rejected",
    };
    Ok(Json(ApplicationStateResponse {
        message: message.to_string(),
        application_id: application.id,
        state: application.state,
        responded_at: application.responded_at,
    }))
}

#[utoipa::path(
    put,
    path = "/solicitudes/{id}/cancelar",
    params(
        ("id" = Uuid, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application cancelled", body = Json<ApplicationStateResponse>),
        (status = 404, description = "Application not found"),
        (status = 409, description = "Application is no longer pending")
    )
)]
#[axum::debug_handler]
pub async fn cancel(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.cancel(id, &account).await?;
    Ok(Json(ApplicationStateResponse {
        message: "Application cancelled".to_string(),
        application_id: application.id,
        state: application.state,
        responded_at: application.responded_at,
    }))
}
