use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::account::Account;
use crate::services::auth_service::NewRegistration;
use crate::utils::validation::trimmed;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterPayload {
    #[validate(length(min = 2, max = 100))]
    #[serde(alias = "nombre", deserialize_with = "trimmed")]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[serde(alias = "tipo_usuario")]
    pub role: String,
    #[serde(alias = "universidad_id")]
    pub institution_id: Uuid,
}

impl From<RegisterPayload> for NewRegistration {
    fn from(payload: RegisterPayload) -> Self {
        Self {
            name: payload.name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
            institution_id: payload.institution_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub email: String,
    pub requires_verification: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyRegistrationPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ResendCodePayload {
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Legacy path: account created unverified, code confirmed later.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyEmailPayload {
    #[validate(length(equal = 6))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: Account,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: Account) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            user,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
