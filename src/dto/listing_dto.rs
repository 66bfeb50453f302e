use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::listing::Listing;
use crate::models::schedule::WorkScheduleSlot;
use crate::utils::validation::{trimmed, trimmed_opt};

pub const DEFAULT_CATEGORY: &str = "comida";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateListingPayload {
    #[validate(length(min = 3, max = 200))]
    #[serde(alias = "titulo", deserialize_with = "trimmed")]
    pub title: String,
    #[validate(length(min = 10))]
    #[serde(alias = "descripcion", deserialize_with = "trimmed")]
    pub description: String,
    #[validate(length(min = 1, max = 50))]
    #[serde(default, alias = "categoria", deserialize_with = "trimmed_opt")]
    pub category: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    #[serde(alias = "precio")]
    pub price: Option<Decimal>,
    #[validate(length(min = 3, max = 200))]
    #[serde(alias = "ubicacion", deserialize_with = "trimmed")]
    pub location: String,
    #[validate(length(max = 50))]
    #[serde(default, alias = "duracion_estimada", deserialize_with = "trimmed_opt")]
    pub opening_hours: Option<String>,
    #[validate(length(max = 20))]
    #[serde(default, alias = "telefono", deserialize_with = "trimmed_opt")]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default, alias = "imagen_url", deserialize_with = "trimmed_opt")]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateListingPayload {
    #[validate(length(min = 3, max = 200))]
    #[serde(default, alias = "titulo", deserialize_with = "trimmed_opt")]
    pub title: Option<String>,
    #[validate(length(min = 10))]
    #[serde(default, alias = "descripcion", deserialize_with = "trimmed_opt")]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50))]
    #[serde(default, alias = "categoria", deserialize_with = "trimmed_opt")]
    pub category: Option<String>,
    #[validate(custom(function = "non_negative_price"))]
    #[serde(alias = "precio")]
    pub price: Option<Decimal>,
    #[validate(length(min = 3, max = 200))]
    #[serde(default, alias = "ubicacion", deserialize_with = "trimmed_opt")]
    pub location: Option<String>,
    #[validate(length(max = 50))]
    #[serde(default, alias = "duracion_estimada", deserialize_with = "trimmed_opt")]
    pub opening_hours: Option<String>,
    #[validate(length(max = 20))]
    #[serde(default, alias = "telefono", deserialize_with = "trimmed_opt")]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    #[serde(default, alias = "imagen_url", deserialize_with = "trimmed_opt")]
    pub image_url: Option<String>,
    #[serde(alias = "activa")]
    pub is_active: Option<bool>,
    #[serde(alias = "completada")]
    pub is_completed: Option<bool>,
}

fn non_negative_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("price_must_be_non_negative"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingListQuery {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(alias = "categoria")]
    pub category: Option<String>,
    #[serde(default = "default_true", alias = "activas_solo")]
    pub active_only: bool,
    #[serde(alias = "universidad_id")]
    pub institution_id: Option<Uuid>,
}

impl Default for ListingListQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
            category: None,
            active_only: true,
            institution_id: None,
        }
    }
}

fn default_limit() -> i64 {
    100
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct SlotPayload {
    #[validate(range(min = 0, max = 6))]
    #[serde(alias = "dia_semana")]
    pub weekday: i16,
    #[validate(range(min = 0, max = 23))]
    #[serde(alias = "hora_inicio")]
    pub start_hour: i16,
    #[validate(range(min = 0, max = 23))]
    #[serde(alias = "hora_fin")]
    pub end_hour: i16,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingResponse {
    #[serde(flatten)]
    pub listing: Listing,
    pub slots: Vec<WorkScheduleSlot>,
}
