use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::application::Application;
use crate::utils::schedule::format_slot_tokens;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApplyPayload {
    #[serde(alias = "chaza_id")]
    pub listing_id: Uuid,
    #[validate(length(min = 1))]
    #[serde(alias = "horarios_seleccionados")]
    pub selected_slots: Vec<String>,
    #[validate(length(max = 1000))]
    #[serde(alias = "mensaje")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RespondPayload {
    #[serde(alias = "estado")]
    pub state: String,
    #[validate(length(max = 1000))]
    #[serde(alias = "respuesta")]
    pub response: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApplicationListQuery {
    #[serde(alias = "estado")]
    pub state: Option<String>,
}

/// Application joined with the listing title and, where the caller may see it,
/// the applicant's name and email.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub listing_title: String,
    pub seeker_name: Option<String>,
    pub seeker_email: Option<String>,
    pub horarios_formateados: String,
}

impl ApplicationView {
    pub fn new(
        application: Application,
        listing_title: String,
        seeker_name: Option<String>,
        seeker_email: Option<String>,
    ) -> Self {
        let horarios_formateados = format_slot_tokens(&application.selected_slots);
        Self {
            application,
            listing_title,
            seeker_name,
            seeker_email,
            horarios_formateados,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApplicationStateResponse {
    pub message: String,
    pub application_id: Uuid,
    pub state: String,
    pub responded_at: Option<DateTime<Utc>>,
}
