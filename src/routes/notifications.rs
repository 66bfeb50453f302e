use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::notification_dto::{
        MarkManyPayload, MarkedResponse, NotificationListQuery, NotificationSummary,
        UnreadCountResponse,
    },
    error::{Error, Result},
    models::account::Account,
    AppState,
};

const SUMMARY_RECENT: i64 = 5;

#[utoipa::path(
    get,
    path = "/notificaciones",
    params(
        ("solo_sin_leer" = Option<bool>, Query, description = "Only unread notifications"),
        ("limite" = Option<i64>, Query, description = "Maximum items (default 50)")
    ),
    responses(
        (status = 200, description = "Notifications, newest first", body = Json<Vec<crate::models::notification::Notification>>)
    )
)]
#[axum::debug_handler]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Query(query): Query<NotificationListQuery>,
) -> Result<impl IntoResponse> {
    let items = state
        .notification_service
        .list_for_user(account.id, query.unread_only, query.limit)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/notificaciones/resumen",
    responses(
        (status = 200, description = "Unread count and most recent notifications", body = Json<NotificationSummary>)
    )
)]
#[axum::debug_handler]
pub async fn summary(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<impl IntoResponse> {
    let unread = state.notification_service.count_unread(account.id).await?;
    let recent = state
        .notification_service
        .list_for_user(account.id, false, SUMMARY_RECENT)
        .await?;
    Ok(Json(NotificationSummary { unread, recent }))
}

#[utoipa::path(
    get,
    path = "/notificaciones/sin-leer/count",
    responses(
        (status = 200, description = "Unread count", body = Json<UnreadCountResponse>)
    )
)]
#[axum::debug_handler]
pub async fn unread_count(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<impl IntoResponse> {
    let unread = state.notification_service.count_unread(account.id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

#[utoipa::path(
    put,
    path = "/notificaciones/{id}/leer",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = Json<crate::models::notification::Notification>),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let notification = state
        .notification_service
        .mark_read(id, account.id)
        .await?
        .ok_or_else(|| Error::NotFound("Notification not found".to_string()))?;
    Ok(Json(notification))
}

#[utoipa::path(
    put,
    path = "/notificaciones/leer-todas",
    responses(
        (status = 200, description = "All notifications marked as read", body = Json<MarkedResponse>)
    )
)]
#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
) -> Result<impl IntoResponse> {
    let updated = state.notification_service.mark_all_read(account.id).await?;
    Ok(Json(MarkedResponse {
        message: format!("{} notifications marked as read", updated),
        updated,
    }))
}

#[utoipa::path(
    put,
    path = "/notificaciones/leer-varias",
    request_body = MarkManyPayload,
    responses(
        (status = 200, description = "Selected notifications marked as read", body = Json<MarkedResponse>)
    )
)]
#[axum::debug_handler]
pub async fn mark_many_read(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Json(payload): Json<MarkManyPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let updated = state
        .notification_service
        .mark_many_read(&payload.ids, account.id)
        .await?;
    Ok(Json(MarkedResponse {
        message: format!("{} notifications marked as read", updated),
        updated,
    }))
}

#[utoipa::path(
    delete,
    path = "/notificaciones/{id}",
    params(
        ("id" = Uuid, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted"),
        (status = 404, description = "Notification not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(account): Extension<Account>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    if !state.notification_service.delete(id, account.id).await? {
        return Err(Error::NotFound("Notification not found".to_string()));
    }
    Ok(Json(json!({ "message": "Notification deleted" })))
}
