use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const LISTING_COLUMNS: &str = "id, title, slug, description, category, price, location, \
     opening_hours, phone, image_url, owner_id, institution_id, is_active, is_completed, \
     created_at, updated_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Listing {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub price: Option<Decimal>,
    pub location: String,
    pub opening_hours: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub owner_id: Uuid,
    pub institution_id: Uuid,
    pub is_active: bool,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}
