use sqlx::PgPool;

use crate::dto::contact_dto::ContactPayload;
use crate::error::Result;
use crate::models::contact::ContactMessage;
use crate::services::email_service::{contact_email, EmailDispatcher};
use crate::utils::validation::normalize_email;

#[derive(Clone)]
pub struct ContactService {
    pool: PgPool,
    mailer: EmailDispatcher,
}

impl ContactService {
    pub fn new(pool: PgPool, mailer: EmailDispatcher) -> Self {
        Self { pool, mailer }
    }

    /// Stores the message and forwards it to the admin inbox when one is configured.
    pub async fn submit(&self, payload: ContactPayload) -> Result<ContactMessage> {
        let name = payload
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (email, name, subject, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, subject, message, is_read, is_answered, created_at
            "#,
        )
        .bind(normalize_email(&payload.email))
        .bind(name)
        .bind(payload.subject.trim())
        .bind(payload.message.trim())
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(contact_id = %message.id, "contact message stored");
        match self.mailer.admin_email() {
            Some(admin) => {
                self.mailer.dispatch(contact_email(
                    admin,
                    &message.email,
                    message.name.as_deref(),
                    &message.subject,
                    &message.message,
                ));
            }
            None => tracing::debug!("ADMIN_EMAIL not set, contact message not forwarded"),
        }
        Ok(message)
    }
}
