use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::dto::listing_dto::{
    CreateListingPayload, ListingListQuery, SlotPayload, UpdateListingPayload, DEFAULT_CATEGORY,
};
use crate::error::{unique_violation, Error, Result};
use crate::models::account::Account;
use crate::models::listing::{Listing, LISTING_COLUMNS};
use crate::models::schedule::{SlotSpec, WorkScheduleSlot};
use crate::utils::slug::slugify;
use crate::utils::token::random_suffix;

const SLOT_COLUMNS: &str = "id, listing_id, weekday, start_hour, end_hour, is_active";

const ONE_ACTIVE_PER_OWNER: &str = "listings_one_active_per_owner";
const SLUG_KEY: &str = "listings_slug_key";
const SLUG_ATTEMPTS: usize = 5;
const MAX_PAGE: i64 = 100;

#[derive(Clone)]
pub struct ListingService {
    pool: PgPool,
}

impl ListingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, owner: &Account, payload: CreateListingPayload) -> Result<Listing> {
        if !owner.is_vendor() {
            return Err(Error::Forbidden(
                "Only vendors can create listings".to_string(),
            ));
        }
        if self.active_for_owner(owner.id).await?.is_some() {
            return Err(already_active());
        }

        let base = slugify(&payload.title);
        let mut slug = self.available_slug(&base).await?;
        let category = payload
            .category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

        let query = format!(
            r#"
            INSERT INTO listings (
                title, slug, description, category, price, location,
                opening_hours, phone, image_url, owner_id, institution_id
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            LISTING_COLUMNS
        );

        // A concurrent insert can still take the slug between the check and the write.
        for _ in 0..SLUG_ATTEMPTS {
            let inserted = sqlx::query_as::<_, Listing>(&query)
                .bind(payload.title.trim())
                .bind(&slug)
                .bind(&payload.description)
                .bind(&category)
                .bind(payload.price)
                .bind(payload.location.trim())
                .bind(&payload.opening_hours)
                .bind(&payload.phone)
                .bind(&payload.image_url)
                .bind(owner.id)
                .bind(owner.institution_id)
                .fetch_one(&self.pool)
                .await;

            match inserted {
                Ok(listing) => {
                    tracing::info!(listing_id = %listing.id, owner_id = %owner.id, slug = %listing.slug, "listing created");
                    return Ok(listing);
                }
                Err(err) => match unique_violation(&err).as_deref() {
                    Some(ONE_ACTIVE_PER_OWNER) => return Err(already_active()),
                    Some(SLUG_KEY) => slug = suffixed(&base),
                    _ => return Err(err.into()),
                },
            }
        }

        Err(Error::Conflict(
            "Could not allocate a unique slug for this listing".to_string(),
        ))
    }

    pub async fn list(&self, query: &ListingListQuery) -> Result<Vec<Listing>> {
        let skip = query.skip.max(0);
        let limit = query.limit.clamp(1, MAX_PAGE);

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {} FROM listings WHERE TRUE", LISTING_COLUMNS));
        if query.active_only {
            builder.push(" AND is_active = TRUE");
        }
        if let Some(category) = &query.category {
            builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(institution_id) = query.institution_id {
            builder
                .push(" AND institution_id = ")
                .push_bind(institution_id);
        }
        builder
            .push(" ORDER BY created_at DESC OFFSET ")
            .push_bind(skip)
            .push(" LIMIT ")
            .push_bind(limit);

        let items = builder
            .build_query_as::<Listing>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Listing> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Listing not found".to_string()))
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>> {
        let query = format!("SELECT {} FROM listings WHERE id = $1", LISTING_COLUMNS);
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Listing> {
        let query = format!("SELECT {} FROM listings WHERE slug = $1", LISTING_COLUMNS);
        sqlx::query_as::<_, Listing>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Listing not found".to_string()))
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Listing>> {
        let query = format!(
            "SELECT {} FROM listings WHERE owner_id = $1 ORDER BY created_at DESC",
            LISTING_COLUMNS
        );
        let items = sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        payload: UpdateListingPayload,
    ) -> Result<Listing> {
        self.owned(id, owner_id).await?;

        let query = format!(
            r#"
            UPDATE listings
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                location = COALESCE($6, location),
                opening_hours = COALESCE($7, opening_hours),
                phone = COALESCE($8, phone),
                image_url = COALESCE($9, image_url),
                is_active = COALESCE($10, is_active),
                is_completed = COALESCE($11, is_completed),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            LISTING_COLUMNS
        );
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .bind(payload.title.as_deref().map(str::trim))
            .bind(&payload.description)
            .bind(&payload.category)
            .bind(payload.price)
            .bind(payload.location.as_deref().map(str::trim))
            .bind(&payload.opening_hours)
            .bind(&payload.phone)
            .bind(&payload.image_url)
            .bind(payload.is_active)
            .bind(payload.is_completed)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e).as_deref() {
                Some(ONE_ACTIVE_PER_OWNER) => already_active(),
                _ => Error::from(e),
            })?;
        Ok(listing)
    }

    /// Marks the listing inactive. Rows are kept so applications still resolve.
    pub async fn soft_delete(&self, id: Uuid, owner_id: Uuid) -> Result<()> {
        self.owned(id, owner_id).await?;
        sqlx::query("UPDATE listings SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::info!(listing_id = %id, owner_id = %owner_id, "listing deactivated");
        Ok(())
    }

    pub async fn add_slot(
        &self,
        listing_id: Uuid,
        owner_id: Uuid,
        slot: SlotPayload,
    ) -> Result<WorkScheduleSlot> {
        let spec = SlotSpec::new(slot.weekday, slot.start_hour, slot.end_hour)?;
        self.owned(listing_id, owner_id).await?;

        let query = format!(
            r#"
            INSERT INTO work_schedule_slots (listing_id, weekday, start_hour, end_hour)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SLOT_COLUMNS
        );
        let created = sqlx::query_as::<_, WorkScheduleSlot>(&query)
            .bind(listing_id)
            .bind(spec.weekday)
            .bind(spec.start_hour)
            .bind(spec.end_hour)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    /// Active slots of a listing; empty for unknown listings.
    pub async fn list_slots(&self, listing_id: Uuid) -> Result<Vec<WorkScheduleSlot>> {
        let query = format!(
            r#"
            SELECT {}
            FROM work_schedule_slots
            WHERE listing_id = $1 AND is_active = TRUE
            ORDER BY weekday, start_hour
            "#,
            SLOT_COLUMNS
        );
        let slots = sqlx::query_as::<_, WorkScheduleSlot>(&query)
            .bind(listing_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(slots)
    }

    /// Swaps the whole schedule of a listing in one transaction.
    pub async fn replace_all_slots(
        &self,
        listing_id: Uuid,
        owner_id: Uuid,
        slots: &[SlotPayload],
    ) -> Result<Vec<WorkScheduleSlot>> {
        let specs = slots
            .iter()
            .map(|s| SlotSpec::new(s.weekday, s.start_hour, s.end_hour))
            .collect::<Result<Vec<_>>>()?;
        self.owned(listing_id, owner_id).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM work_schedule_slots WHERE listing_id = $1")
            .bind(listing_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            r#"
            INSERT INTO work_schedule_slots (listing_id, weekday, start_hour, end_hour)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            SLOT_COLUMNS
        );
        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            let slot = sqlx::query_as::<_, WorkScheduleSlot>(&query)
                .bind(listing_id)
                .bind(spec.weekday)
                .bind(spec.start_hour)
                .bind(spec.end_hour)
                .fetch_one(&mut *tx)
                .await?;
            created.push(slot);
        }
        tx.commit().await?;

        tracing::info!(listing_id = %listing_id, count = created.len(), "schedule replaced");
        Ok(created)
    }

    pub async fn delete_slot(&self, slot_id: Uuid, owner_id: Uuid) -> Result<()> {
        let listing_id: Option<(Uuid,)> =
            sqlx::query_as("SELECT listing_id FROM work_schedule_slots WHERE id = $1")
                .bind(slot_id)
                .fetch_optional(&self.pool)
                .await?;
        let (listing_id,) =
            listing_id.ok_or_else(|| Error::NotFound("Schedule slot not found".to_string()))?;
        self.owned(listing_id, owner_id).await?;

        sqlx::query("DELETE FROM work_schedule_slots WHERE id = $1")
            .bind(slot_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// The listing if `owner_id` owns it: NotFound when missing, Forbidden otherwise.
    pub async fn owned(&self, id: Uuid, owner_id: Uuid) -> Result<Listing> {
        let listing = self.get_by_id(id).await?;
        if listing.owner_id != owner_id {
            return Err(Error::Forbidden(
                "You do not have permission to manage this listing".to_string(),
            ));
        }
        Ok(listing)
    }

    async fn active_for_owner(&self, owner_id: Uuid) -> Result<Option<Listing>> {
        let query = format!(
            "SELECT {} FROM listings WHERE owner_id = $1 AND is_active = TRUE",
            LISTING_COLUMNS
        );
        let listing = sqlx::query_as::<_, Listing>(&query)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(listing)
    }

    async fn available_slug(&self, base: &str) -> Result<String> {
        let taken: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM listings WHERE slug = $1)")
            .bind(base)
            .fetch_one(&self.pool)
            .await?;
        if taken.0 || base.is_empty() {
            Ok(suffixed(base))
        } else {
            Ok(base.to_string())
        }
    }
}

fn already_active() -> Error {
    Error::Conflict(
        "You already have an active listing. Deactivate it before creating a new one".to_string(),
    )
}

fn suffixed(base: &str) -> String {
    if base.is_empty() {
        random_suffix(8)
    } else {
        format!("{}-{}", base, random_suffix(8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffixed_slug_keeps_base() {
        let slug = suffixed("cafe-ole");
        assert!(slug.starts_with("cafe-ole-"));
        assert_eq!(slug.len(), "cafe-ole-".len() + 8);
        assert_ne!(suffixed("cafe-ole"), slug);
    }

    #[test]
    fn empty_base_becomes_bare_suffix() {
        assert_eq!(suffixed("").len(), 8);
    }
}
