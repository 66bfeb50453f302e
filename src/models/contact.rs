use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub is_answered: bool,
    pub created_at: DateTime<Utc>,
}
