use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::notification::Notification;

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default, alias = "solo_sin_leer")]
    pub unread_only: bool,
    #[serde(default = "default_limit", alias = "limite")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    crate::services::notification_service::DEFAULT_FEED_LIMIT
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MarkManyPayload {
    #[validate(length(min = 1, max = 200))]
    #[serde(alias = "notificacion_ids")]
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationSummary {
    pub unread: i64,
    pub recent: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkedResponse {
    pub message: String,
    pub updated: u64,
}
