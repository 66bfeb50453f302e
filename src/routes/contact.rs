use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::Validate;

use crate::{dto::contact_dto::ContactPayload, error::Result, AppState};

#[utoipa::path(
    post,
    path = "/contacto",
    request_body = ContactPayload,
    responses(
        (status = 201, description = "Message received"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let message = state.contact_service.submit(payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "id": message.id,
            "message": "Thanks for reaching out. We will reply soon.",
        })),
    ))
}
