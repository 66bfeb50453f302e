use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::listing_dto::{
        CreateListingPayload, ListingListQuery, ListingResponse, SlotPayload,
        UpdateListingPayload,
    },
    error::Result,
    models::account::Account,
    AppState,
};

#[utoipa::path(
    post,
    path = "/chazas",
    request_body = CreateListingPayload,
    responses(
        (status = 201, description = "Listing created", body = Json<crate::models::listing::Listing>),
        (status = 403, description = "Not a verified vendor"),
        (status = 409, description = "Vendor already has an active listing")
    )
)]
#[axum::debug_handler]
pub async fn create_listing(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(payload): Json<CreateListingPayload>,
) -> Result<impl IntoResponse> {
    account.require_verified_vendor()?;
    payload.validate()?;
    let listing = state.listing_service.create(&account, payload).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

#[utoipa::path(
    get,
    path = "/chazas",
    params(
        ("skip" = Option<i64>, Query, description = "Offset"),
        ("limit" = Option<i64>, Query, description = "Page size, at most 100"),
        ("categoria" = Option<String>, Query, description = "Category filter"),
        ("activas_solo" = Option<bool>, Query, description = "Only active listings (default true)"),
        ("universidad_id" = Option<Uuid>, Query, description = "Institution filter")
    ),
    responses(
        (status = 200, description = "Listings, newest first", body = Json<Vec<crate::models::listing::Listing>>)
    )
)]
#[axum::debug_handler]
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<ListingListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.listing_service.list(&query).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/chazas/mis-chazas",
    responses(
        (status = 200, description = "All listings of the current vendor", body = Json<Vec<crate::models::listing::Listing>>),
        (status = 403, description = "Not a vendor")
    )
)]
#[axum::debug_handler]
pub async fn my_listings(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<impl IntoResponse> {
    account.require_vendor()?;
    let items = state.listing_service.list_by_owner(account.id).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/chazas/slug/{slug}",
    params(
        ("slug" = String, Path, description = "Listing slug")
    ),
    responses(
        (status = 200, description = "Listing with its active schedule", body = Json<ListingResponse>),
        (status = 404, description = "Listing not found")
    )
)]
#[axum::debug_handler]
pub async fn get_listing_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let listing = state.listing_service.get_by_slug(&slug).await?;
    let slots = state.listing_service.list_slots(listing.id).await?;
    Ok(Json(ListingResponse { listing, slots }))
}

#[utoipa::path(
    get,
    path = "/chazas/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Listing with its active schedule", body = Json<ListingResponse>),
        (status = 404, description = "Listing not found")
    )
)]
#[axum::debug_handler]
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let listing = state.listing_service.get_by_id(id).await?;
    let slots = state.listing_service.list_slots(listing.id).await?;
    Ok(Json(ListingResponse { listing, slots }))
}

#[utoipa::path(
    put,
    path = "/chazas/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = UpdateListingPayload,
    responses(
        (status = 200, description = "Listing updated", body = Json<crate::models::listing::Listing>),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found"),
        (status = 409, description = "Another listing is already active")
    )
)]
#[axum::debug_handler]
pub async fn update_listing(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateListingPayload>,
) -> Result<impl IntoResponse> {
    account.require_verified_vendor()?;
    payload.validate()?;
    let listing = state.listing_service.update(id, account.id, payload).await?;
    Ok(Json(listing))
}

#[utoipa::path(
    delete,
    path = "/chazas/{id}",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 204, description = "Listing deactivated"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Listing not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_listing(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    account.require_verified_vendor()?;
    state.listing_service.soft_delete(id, account.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/chazas/{id}/horarios",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = SlotPayload,
    responses(
        (status = 201, description = "Slot added", body = Json<crate::models::schedule::WorkScheduleSlot>),
        (status = 400, description = "Invalid hours or weekday"),
        (status = 403, description = "Not the owner")
    )
)]
#[axum::debug_handler]
pub async fn add_slot(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SlotPayload>,
) -> Result<impl IntoResponse> {
    account.require_verified_vendor()?;
    payload.validate()?;
    let slot = state.listing_service.add_slot(id, account.id, payload).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

#[utoipa::path(
    get,
    path = "/chazas/{id}/horarios",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    responses(
        (status = 200, description = "Active slots", body = Json<Vec<crate::models::schedule::WorkScheduleSlot>>)
    )
)]
#[axum::debug_handler]
pub async fn list_slots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let slots = state.listing_service.list_slots(id).await?;
    Ok(Json(slots))
}

#[utoipa::path(
    put,
    path = "/chazas/{id}/horarios",
    params(
        ("id" = Uuid, Path, description = "Listing ID")
    ),
    request_body = Vec<SlotPayload>,
    responses(
        (status = 200, description = "Schedule replaced", body = Json<Vec<crate::models::schedule::WorkScheduleSlot>>),
        (status = 400, description = "Invalid hours or weekday"),
        (status = 403, description = "Not the owner")
    )
)]
#[axum::debug_handler]
pub async fn replace_slots(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Vec<SlotPayload>>,
) -> Result<impl IntoResponse> {
    account.require_verified_vendor()?;
    for slot in &payload {
        slot.validate()?;
    }
    let slots = state
        .listing_service
        .replace_all_slots(id, account.id, &payload)
        .await?;
    Ok(Json(slots))
}

#[utoipa::path(
    delete,
    path = "/chazas/horarios/{slot_id}",
    params(
        ("slot_id" = Uuid, Path, description = "Schedule slot ID")
    ),
    responses(
        (status = 200, description = "Slot deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Slot not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_slot(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(slot_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    account.require_verified_vendor()?;
    state.listing_service.delete_slot(slot_id, account.id).await?;
    Ok(Json(json!({ "message": "Schedule slot deleted" })))
}
