use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;

use crate::{
    dto::institution_dto::InstitutionListQuery, error::Result, AppState,
};

#[utoipa::path(
    get,
    path = "/universidades",
    params(
        ("solo_activas" = Option<bool>, Query, description = "Only active institutions (default true)")
    ),
    responses(
        (status = 200, description = "Institutions ordered by name", body = Json<Vec<crate::models::institution::Institution>>)
    )
)]
#[axum::debug_handler]
pub async fn list_institutions(
    State(state): State<AppState>,
    Query(query): Query<InstitutionListQuery>,
) -> Result<impl IntoResponse> {
    let items = state.institution_service.list(query.active_only).await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/universidades/{id}",
    params(
        ("id" = Uuid, Path, description = "Institution ID")
    ),
    responses(
        (status = 200, description = "Institution found", body = Json<crate::models::institution::Institution>),
        (status = 404, description = "Institution not found")
    )
)]
#[axum::debug_handler]
pub async fn get_institution(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let institution = state.institution_service.get_by_id(id).await?;
    Ok(Json(institution))
}

#[utoipa::path(
    get,
    path = "/universidades/slug/{slug}",
    params(
        ("slug" = String, Path, description = "Institution slug")
    ),
    responses(
        (status = 200, description = "Institution found", body = Json<crate::models::institution::Institution>),
        (status = 404, description = "Institution not found")
    )
)]
#[axum::debug_handler]
pub async fn get_institution_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let institution = state.institution_service.get_by_slug(&slug).await?;
    Ok(Json(institution))
}

#[utoipa::path(
    get,
    path = "/universidades/email/{email}",
    params(
        ("email" = String, Path, description = "Email whose domain is looked up")
    ),
    responses(
        (status = 200, description = "Institution accepting the email's domain", body = Json<crate::models::institution::Institution>),
        (status = 404, description = "No active institution accepts this domain")
    )
)]
#[axum::debug_handler]
pub async fn institution_for_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<impl IntoResponse> {
    let institution = state
        .institution_service
        .find_for_email(&email)
        .await?
        .ok_or_else(|| {
            crate::error::Error::NotFound(
                "No active institution accepts this email domain".to_string(),
            )
        })?;
    Ok(Json(institution))
}
