use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::dto::application_dto::ApplicationView;
use crate::error::{unique_violation, Error, Result};
use crate::models::account::Account;
use crate::models::application::{Application, ApplicationState, APPLICATION_COLUMNS};
use crate::models::listing::Listing;
use crate::models::notification::NewNotification;
use crate::services::email_service::{notification_email, EmailDispatcher};
use crate::services::listing_service::ListingService;
use crate::services::notification_service::{self, templates};
use crate::utils::schedule::{format_slot_tokens, validate_slot_tokens};

const ONE_PENDING_PER_SEEKER: &str = "applications_one_pending_per_seeker";
const LISTING_REMOVED: &str = "Listing removed";
const UNKNOWN_SEEKER: &str = "Unknown";

pub struct NewApplication {
    pub listing_id: Uuid,
    pub selected_slots: Vec<String>,
    pub message: Option<String>,
}

#[derive(Debug, FromRow)]
struct Contact {
    name: String,
    email: String,
}

/// Job-application lifecycle: `pending` moves once to `accepted`/`rejected`
/// (vendor) or `cancelled` (seeker). Every transition notifies the other side.
#[derive(Clone)]
pub struct ApplicationService {
    pool: PgPool,
    listings: ListingService,
    mailer: EmailDispatcher,
}

impl ApplicationService {
    pub fn new(pool: PgPool, listings: ListingService, mailer: EmailDispatcher) -> Self {
        Self {
            pool,
            listings,
            mailer,
        }
    }

    pub async fn apply(&self, seeker: &Account, req: NewApplication) -> Result<Application> {
        validate_slot_tokens(&req.selected_slots)?;

        let listing = self
            .listings
            .find_by_id(req.listing_id)
            .await?
            .ok_or_else(|| Error::BadRequest("The listing does not exist".to_string()))?;
        if listing.owner_id == seeker.id {
            return Err(Error::BadRequest(
                "You cannot apply to your own listing".to_string(),
            ));
        }

        let pending: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM applications
                WHERE seeker_id = $1 AND listing_id = $2 AND state = 'pending'
            )
            "#,
        )
        .bind(seeker.id)
        .bind(listing.id)
        .fetch_one(&self.pool)
        .await?;
        if pending.0 {
            return Err(already_pending());
        }

        let mut tx = self.pool.begin().await?;
        let query = format!(
            r#"
            INSERT INTO applications (seeker_id, listing_id, selected_slots, message, state)
            VALUES ($1, $2, $3, $4, 'pending')
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(seeker.id)
            .bind(listing.id)
            .bind(&req.selected_slots)
            .bind(req.message.as_deref().map(str::trim).filter(|m| !m.is_empty()))
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match unique_violation(&e).as_deref() {
                Some(ONE_PENDING_PER_SEEKER) => already_pending(),
                _ => Error::from(e),
            })?;

        let notice = templates::new_application(
            listing.owner_id,
            &seeker.name,
            &listing.title,
            &format_slot_tokens(&application.selected_slots),
            listing.id,
            application.id,
        );
        notification_service::insert(&mut *tx, &notice).await?;
        tx.commit().await?;

        tracing::info!(
            application_id = %application.id,
            listing_id = %listing.id,
            seeker_id = %seeker.id,
            "application created"
        );
        self.email_recipient(&notice).await;
        Ok(application)
    }

    pub async fn list_for_seeker(&self, seeker_id: Uuid) -> Result<Vec<ApplicationView>> {
        let query = format!(
            "SELECT {} FROM applications WHERE seeker_id = $1 ORDER BY created_at DESC",
            APPLICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Application>(&query)
            .bind(seeker_id)
            .fetch_all(&self.pool)
            .await?;

        let mut views = Vec::with_capacity(items.len());
        for application in items {
            let title = self
                .listings
                .find_by_id(application.listing_id)
                .await?
                .map(|l| l.title)
                .unwrap_or_else(|| LISTING_REMOVED.to_string());
            views.push(ApplicationView::new(application, title, None, None));
        }
        Ok(views)
    }

    pub async fn list_for_listing(
        &self,
        listing_id: Uuid,
        owner_id: Uuid,
        state: Option<ApplicationState>,
    ) -> Result<Vec<ApplicationView>> {
        let listing = self.listings.find_by_id(listing_id).await?;
        let listing = match listing {
            Some(l) if l.owner_id == owner_id => l,
            _ => {
                return Err(Error::Forbidden(
                    "You do not have permission to view these applications".to_string(),
                ))
            }
        };

        let query = format!(
            r#"
            SELECT {}
            FROM applications
            WHERE listing_id = $1 AND ($2::TEXT IS NULL OR state = $2)
            ORDER BY created_at DESC
            "#,
            APPLICATION_COLUMNS
        );
        let items = sqlx::query_as::<_, Application>(&query)
            .bind(listing.id)
            .bind(state.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;

        let mut views = Vec::with_capacity(items.len());
        for application in items {
            views.push(self.seeker_view(application, listing.title.clone()).await?);
        }
        Ok(views)
    }

    /// Visible to the applicant and to the listing owner only.
    pub async fn get_by_id(&self, id: Uuid, requester_id: Uuid) -> Result<ApplicationView> {
        let application = self.get(id).await?;
        let listing = self.listings.find_by_id(application.listing_id).await?;

        let is_owner = listing
            .as_ref()
            .map(|l| l.owner_id == requester_id)
            .unwrap_or(false);
        if application.seeker_id != requester_id && !is_owner {
            return Err(Error::Forbidden(
                "You do not have permission to view this application".to_string(),
            ));
        }

        let title = listing
            .map(|l| l.title)
            .unwrap_or_else(|| LISTING_REMOVED.to_string());
        self.seeker_view(application, title).await
    }

    pub async fn respond(
        &self,
        id: Uuid,
        owner_id: Uuid,
        next: ApplicationState,
        response: Option<String>,
    ) -> Result<Application> {
        if !matches!(next, ApplicationState::Accepted | ApplicationState::Rejected) {
            return Err(Error::BadRequest(
                "Applications can only be accepted or rejected".to_string(),
            ));
        }

        let application = self.get(id).await?;
        let listing = self.listing_owned_by(&application, owner_id).await?;
        let current = application.state()?;
        if !current.can_transition_to(next) {
            return Err(Error::Conflict(
                "This application has already been answered".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let query = format!(
            r#"
            UPDATE applications
            SET state = $2, response = $3, responded_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND state = 'pending'
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let updated = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(next.as_str())
            .bind(response.as_deref().map(str::trim).filter(|r| !r.is_empty()))
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                Error::Conflict("This application has already been answered".to_string())
            })?;

        let notice = match next {
            ApplicationState::Accepted => templates::application_accepted(
                updated.seeker_id,
                &listing.title,
                listing.id,
                updated.id,
            ),
            _ => templates::application_rejected(
                updated.seeker_id,
                &listing.title,
                listing.id,
                updated.id,
            ),
        };
        notification_service::insert(&mut *tx, &notice).await?;
        tx.commit().await?;

        tracing::info!(application_id = %updated.id, state = %next, "application answered");
        self.email_recipient(&notice).await;
        Ok(updated)
    }

    /// Another seeker's application is reported as missing, not forbidden.
    pub async fn cancel(&self, id: Uuid, seeker: &Account) -> Result<Application> {
        let query = format!(
            "SELECT {} FROM applications WHERE id = $1 AND seeker_id = $2",
            APPLICATION_COLUMNS
        );
        let application = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .bind(seeker.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)?;
        if !application.state()?.can_transition_to(ApplicationState::Cancelled) {
            return Err(Error::Conflict(
                "Only pending applications can be cancelled".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        let query = format!(
            r#"
            UPDATE applications
            SET state = 'cancelled', updated_at = NOW()
            WHERE id = $1 AND state = 'pending'
            RETURNING {}
            "#,
            APPLICATION_COLUMNS
        );
        let updated = sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                Error::Conflict("Only pending applications can be cancelled".to_string())
            })?;

        let listing = self.listings.find_by_id(updated.listing_id).await?;
        let notice = listing.map(|l| {
            templates::application_cancelled(l.owner_id, &seeker.name, &l.title, l.id, updated.id)
        });
        if let Some(notice) = &notice {
            notification_service::insert(&mut *tx, notice).await?;
        }
        tx.commit().await?;

        tracing::info!(application_id = %updated.id, seeker_id = %seeker.id, "application cancelled");
        if let Some(notice) = &notice {
            self.email_recipient(notice).await;
        }
        Ok(updated)
    }

    async fn get(&self, id: Uuid) -> Result<Application> {
        let query = format!("SELECT {} FROM applications WHERE id = $1", APPLICATION_COLUMNS);
        sqlx::query_as::<_, Application>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(not_found)
    }

    async fn listing_owned_by(&self, application: &Application, owner_id: Uuid) -> Result<Listing> {
        match self.listings.find_by_id(application.listing_id).await? {
            Some(listing) if listing.owner_id == owner_id => Ok(listing),
            _ => Err(Error::Forbidden(
                "You do not have permission to answer this application".to_string(),
            )),
        }
    }

    async fn seeker_view(&self, application: Application, title: String) -> Result<ApplicationView> {
        let seeker = self.contact(application.seeker_id).await?;
        let (name, email) = match seeker {
            Some(c) => (c.name, Some(c.email)),
            None => (UNKNOWN_SEEKER.to_string(), None),
        };
        Ok(ApplicationView::new(application, title, Some(name), email))
    }

    async fn contact(&self, account_id: Uuid) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>("SELECT name, email FROM accounts WHERE id = $1")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(contact)
    }

    /// Mirrors an in-app notification by email. Failures are logged only.
    async fn email_recipient(&self, notice: &NewNotification) {
        match self.contact(notice.recipient_id).await {
            Ok(Some(recipient)) => {
                self.mailer.dispatch(notification_email(
                    &recipient.email,
                    &notice.title,
                    &notice.body,
                ));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, recipient_id = %notice.recipient_id, "could not resolve notification email")
            }
        }
    }
}

fn already_pending() -> Error {
    Error::Conflict("You already have a pending application for this listing".to_string())
}

fn not_found() -> Error {
    Error::NotFound("Application not found".to_string())
}
