use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::Result;
use crate::models::notification::{NewNotification, Notification, NotificationKind};

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, kind, title, body, listing_id, \
     application_id, is_read, created_at, read_at";

pub const DEFAULT_FEED_LIMIT: i64 = 50;

/// Per-account notification feed. Rows are only ever appended, marked read or
/// deleted by their recipient.
#[derive(Clone)]
pub struct NotificationService {
    pool: PgPool,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewNotification) -> Result<Notification> {
        insert(&self.pool, &new).await
    }

    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>> {
        let limit = if limit <= 0 { DEFAULT_FEED_LIMIT } else { limit.min(100) };
        let query = format!(
            r#"
            SELECT {}
            FROM notifications
            WHERE recipient_id = $1 AND ($2 = FALSE OR is_read = FALSE)
            ORDER BY created_at DESC
            LIMIT $3
            "#,
            NOTIFICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(unread_only)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn count_unread(&self, user_id: Uuid) -> Result<i64> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count.0)
    }

    /// `None` when the notification does not exist or belongs to someone else.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<Option<Notification>> {
        let query = format!(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
            WHERE id = $1 AND recipient_id = $2
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );
        let row = sqlx::query_as::<_, Notification>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn mark_all_read(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = NOW()
            WHERE recipient_id = $1 AND is_read = FALSE
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn mark_many_read(&self, ids: &[Uuid], user_id: Uuid) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = TRUE, read_at = NOW()
            WHERE id = ANY($1) AND recipient_id = $2 AND is_read = FALSE
            "#,
        )
        .bind(ids)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Appends a notification on any executor, so callers can write it inside
/// the transaction that caused it.
pub async fn insert<'e, E>(executor: E, new: &NewNotification) -> Result<Notification>
where
    E: PgExecutor<'e>,
{
    let query = format!(
        r#"
        INSERT INTO notifications (recipient_id, kind, title, body, listing_id, application_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {}
        "#,
        NOTIFICATION_COLUMNS
    );
    let row = sqlx::query_as::<_, Notification>(&query)
        .bind(new.recipient_id)
        .bind(new.kind.as_str())
        .bind(&new.title)
        .bind(&new.body)
        .bind(new.listing_id)
        .bind(new.application_id)
        .fetch_one(executor)
        .await?;
    Ok(row)
}

/// Notification texts for application lifecycle events.
pub mod templates {
    use super::*;

    pub fn new_application(
        owner_id: Uuid,
        seeker_name: &str,
        listing_title: &str,
        formatted_slots: &str,
        listing_id: Uuid,
        application_id: Uuid,
    ) -> NewNotification {
        NewNotification {
            recipient_id: owner_id,
            kind: NotificationKind::NuevaPostulacion,
            title: "New job application".to_string(),
            body: format!(
                "{} wants to work at {}. Schedule: {}",
                seeker_name, listing_title, formatted_slots
            ),
            listing_id: Some(listing_id),
            application_id: Some(application_id),
        }
    }

    pub fn application_accepted(
        seeker_id: Uuid,
        listing_title: &str,
        listing_id: Uuid,
        application_id: Uuid,
    ) -> NewNotification {
        NewNotification {
            recipient_id: seeker_id,
            kind: NotificationKind::PostulacionAceptada,
            title: "Application accepted".to_string(),
            body: format!(
                "Your application for {} has been accepted. The vendor will contact you.",
                listing_title
            ),
            listing_id: Some(listing_id),
            application_id: Some(application_id),
        }
    }

    pub fn application_rejected(
        seeker_id: Uuid,
        listing_title: &str,
        listing_id: Uuid,
        application_id: Uuid,
    ) -> NewNotification {
        NewNotification {
            recipient_id: seeker_id,
            kind: NotificationKind::PostulacionRechazada,
            title: "Application not selected".to_string(),
            body: format!(
                "Your application for {} was not selected this time. Keep trying!",
                listing_title
            ),
            listing_id: Some(listing_id),
            application_id: Some(application_id),
        }
    }

    pub fn application_cancelled(
        owner_id: Uuid,
        seeker_name: &str,
        listing_title: &str,
        listing_id: Uuid,
        application_id: Uuid,
    ) -> NewNotification {
        NewNotification {
            recipient_id: owner_id,
            kind: NotificationKind::PostulacionCancelada,
            title: "Application cancelled".to_string(),
            body: format!(
                "{} has cancelled their application for {}",
                seeker_name, listing_title
            ),
            listing_id: Some(listing_id),
            application_id: Some(application_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::templates::*;
    use super::*;

    #[test]
    fn new_application_mentions_applicant_and_schedule() {
        let owner = Uuid::new_v4();
        let n = new_application(
            owner,
            "Ana",
            "Snacks",
            "Monday: 9:00",
            Uuid::new_v4(),
            Uuid::new_v4(),
        );
        assert_eq!(n.recipient_id, owner);
        assert_eq!(n.kind, NotificationKind::NuevaPostulacion);
        assert!(n.body.contains("Ana"));
        assert!(n.body.contains("Monday: 9:00"));
    }

    #[test]
    fn response_variants_target_the_seeker() {
        let seeker = Uuid::new_v4();
        let listing = Uuid::new_v4();
        let app = Uuid::new_v4();
        let accepted = application_accepted(seeker, "Snacks", listing, app);
        let rejected = application_rejected(seeker, "Snacks", listing, app);
        assert_eq!(accepted.kind, NotificationKind::PostulacionAceptada);
        assert_eq!(rejected.kind, NotificationKind::PostulacionRechazada);
        assert_eq!(accepted.recipient_id, seeker);
        assert_eq!(rejected.listing_id, Some(listing));
    }
}
