use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{trimmed, trimmed_opt};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactPayload {
    #[validate(email)]
    pub email: String,
    #[validate(length(max = 100))]
    #[serde(default, alias = "nombre", deserialize_with = "trimmed_opt")]
    pub name: Option<String>,
    #[validate(length(min = 3, max = 200))]
    #[serde(alias = "asunto", deserialize_with = "trimmed")]
    pub subject: String,
    #[validate(length(min = 10, max = 2000))]
    #[serde(alias = "mensaje", deserialize_with = "trimmed")]
    pub message: String,
}
