use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Signup awaiting email-code confirmation. At most one per email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PendingRegistration {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub institution_id: Uuid,
    #[serde(skip_serializing)]
    pub verification_code: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub failed_attempts: i32,
    pub created_at: DateTime<Utc>,
}

impl PendingRegistration {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// One-time code for accounts created before email verification was mandatory.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    pub id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub code: String,
    pub is_used: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
