use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{unique_violation, Error, Result};
use crate::models::account::{Account, Role};
use crate::models::pending_registration::{PendingRegistration, VerificationCode};
use crate::services::email_service::{verification_email, EmailDispatcher};
use crate::services::institution_service::InstitutionService;
use crate::utils::crypto::{
    codes_match, generate_verification_code, hash_password, verify_password,
};
use crate::utils::time::{expires_in_minutes, now};
use crate::utils::token::issue_access_token;
use crate::utils::validation::normalize_email;

const ACCOUNT_COLUMNS: &str = "id, name, email, password_hash, role, institution_id, \
     is_active, is_verified, created_at, updated_at";

const PENDING_COLUMNS: &str = "id, name, email, password_hash, role, institution_id, \
     verification_code, expires_at, failed_attempts, created_at";

/// Wrong codes tolerated before the pending record is discarded.
pub const MAX_CODE_ATTEMPTS: i32 = 5;

pub struct NewRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub institution_id: Uuid,
}

/// Issued bearer token plus the account it is bound to.
pub struct AuthSession {
    pub access_token: String,
    pub account: Account,
}

#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    institutions: InstitutionService,
    mailer: EmailDispatcher,
    jwt_secret: String,
    token_ttl_minutes: i64,
    code_ttl_minutes: i64,
}

impl AuthService {
    pub fn new(
        pool: PgPool,
        institutions: InstitutionService,
        mailer: EmailDispatcher,
        config: &Config,
    ) -> Self {
        Self {
            pool,
            institutions,
            mailer,
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_minutes: config.access_token_expire_minutes,
            code_ttl_minutes: config.verification_code_expire_minutes,
        }
    }

    pub fn jwt_secret(&self) -> &str {
        &self.jwt_secret
    }

    /// First phase of signup: validates the request and stores a pending record
    /// whose code is emailed to the applicant.
    pub async fn begin_registration(&self, req: NewRegistration) -> Result<PendingRegistration> {
        let role: Role = req.role.parse()?;
        let email = normalize_email(&req.email);

        let institution = self
            .institutions
            .find_by_id(req.institution_id)
            .await?
            .ok_or_else(|| Error::NotFound("The selected institution does not exist".to_string()))?;
        if !institution.is_active {
            return Err(Error::NotFound(
                "The selected institution is not active on the platform".to_string(),
            ));
        }
        if !institution.accepts_email(&email) {
            let domains = institution.domains().join(", @");
            return Err(Error::DomainMismatch(format!(
                "You must use your {} institutional email. Allowed domains: @{}",
                institution.short_name, domains
            )));
        }
        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("This email is already registered".to_string()));
        }

        let password_hash = hash_password(&req.password)?;
        let code = generate_verification_code();
        let expires_at = expires_in_minutes(self.code_ttl_minutes);

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM pending_registrations WHERE email = $1")
            .bind(&email)
            .execute(&mut *tx)
            .await?;
        let query = format!(
            r#"
            INSERT INTO pending_registrations
                (name, email, password_hash, role, institution_id, verification_code, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            PENDING_COLUMNS
        );
        let pending = sqlx::query_as::<_, PendingRegistration>(&query)
            .bind(req.name.trim())
            .bind(&email)
            .bind(&password_hash)
            .bind(role.as_str())
            .bind(institution.id)
            .bind(&code)
            .bind(expires_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => Error::Conflict(
                    "A registration for this email is already in progress".to_string(),
                ),
                None => Error::from(e),
            })?;
        tx.commit().await?;

        tracing::info!(email = %pending.email, role = %role, "pending registration created");
        self.mailer.dispatch(verification_email(
            &pending.email,
            &pending.name,
            &code,
            self.code_ttl_minutes,
        ));
        Ok(pending)
    }

    /// Second phase of signup: promotes the pending record into a verified account.
    pub async fn complete_registration(&self, email: &str, code: &str) -> Result<AuthSession> {
        let email = normalize_email(email);
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "SELECT {} FROM pending_registrations WHERE email = $1 FOR UPDATE",
            PENDING_COLUMNS
        );
        let pending = sqlx::query_as::<_, PendingRegistration>(&query)
            .bind(&email)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                Error::NotFound(
                    "There is no pending registration for this email. Register first.".to_string(),
                )
            })?;

        if pending.is_expired_at(now()) {
            sqlx::query("DELETE FROM pending_registrations WHERE id = $1")
                .bind(pending.id)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Err(Error::Expired(
                "The code has expired. Register again.".to_string(),
            ));
        }

        if !codes_match(&pending.verification_code, code) {
            let attempts = pending.failed_attempts + 1;
            if attempts >= MAX_CODE_ATTEMPTS {
                sqlx::query("DELETE FROM pending_registrations WHERE id = $1")
                    .bind(pending.id)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
                tracing::warn!(
                    email = %pending.email,
                    "pending registration discarded after repeated wrong codes"
                );
                return Err(Error::InvalidCode(
                    "Too many incorrect codes. Register again.".to_string(),
                ));
            }
            sqlx::query("UPDATE pending_registrations SET failed_attempts = $2 WHERE id = $1")
                .bind(pending.id)
                .bind(attempts)
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
            return Err(Error::InvalidCode(
                "Incorrect code. Check it and try again.".to_string(),
            ));
        }

        let query = format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, role, institution_id, is_active, is_verified)
            VALUES ($1, $2, $3, $4, $5, TRUE, TRUE)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(&pending.name)
            .bind(&pending.email)
            .bind(&pending.password_hash)
            .bind(&pending.role)
            .bind(pending.institution_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => Error::Conflict("This email is already registered".to_string()),
                None => Error::from(e),
            })?;

        sqlx::query("DELETE FROM pending_registrations WHERE id = $1")
            .bind(pending.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(account_id = %account.id, email = %account.email, "registration completed");
        self.session_for(account)
    }

    /// Regenerates code and expiry of an existing pending record in place.
    pub async fn resend_code(&self, email: &str) -> Result<PendingRegistration> {
        let email = normalize_email(email);
        let code = generate_verification_code();
        let query = format!(
            r#"
            UPDATE pending_registrations
            SET verification_code = $2, expires_at = $3, failed_attempts = 0
            WHERE email = $1
            RETURNING {}
            "#,
            PENDING_COLUMNS
        );
        let pending = sqlx::query_as::<_, PendingRegistration>(&query)
            .bind(&email)
            .bind(&code)
            .bind(expires_in_minutes(self.code_ttl_minutes))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                Error::NotFound("There is no pending registration for this email".to_string())
            })?;

        self.mailer.dispatch(verification_email(
            &pending.email,
            &pending.name,
            &code,
            self.code_ttl_minutes,
        ));
        Ok(pending)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let email = normalize_email(email);
        let invalid = || Error::Unauthorized("Incorrect email or password".to_string());

        let account = self.find_by_email(&email).await?.ok_or_else(invalid)?;
        if !verify_password(password, &account.password_hash) {
            return Err(invalid());
        }
        if !account.is_active {
            return Err(Error::Forbidden(
                "Account is deactivated. Contact support.".to_string(),
            ));
        }
        self.session_for(account)
    }

    /// Direct account creation without the pending phase. The account starts unverified.
    pub async fn create_account(&self, req: NewRegistration) -> Result<Account> {
        let role: Role = req.role.parse()?;
        let email = normalize_email(&req.email);
        let password_hash = hash_password(&req.password)?;
        let query = format!(
            r#"
            INSERT INTO accounts (name, email, password_hash, role, institution_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ACCOUNT_COLUMNS
        );
        sqlx::query_as::<_, Account>(&query)
            .bind(req.name.trim())
            .bind(&email)
            .bind(&password_hash)
            .bind(role.as_str())
            .bind(req.institution_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => Error::Conflict("This email is already registered".to_string()),
                None => Error::from(e),
            })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        let query = format!("SELECT {} FROM accounts WHERE email = $1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        let query = format!("SELECT {} FROM accounts WHERE id = $1", ACCOUNT_COLUMNS);
        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    /// Replaces any unused code of an unverified account with a fresh one and emails it.
    pub async fn send_account_verification(&self, account: &Account) -> Result<()> {
        if account.is_verified {
            return Err(Error::BadRequest(
                "Your account is already verified".to_string(),
            ));
        }
        let code = generate_verification_code();
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM verification_codes WHERE account_id = $1 AND is_used = FALSE")
            .bind(account.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            INSERT INTO verification_codes (account_id, email, code, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&code)
        .bind(expires_in_minutes(self.code_ttl_minutes))
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        self.mailer.dispatch(verification_email(
            &account.email,
            &account.name,
            &code,
            self.code_ttl_minutes,
        ));
        Ok(())
    }

    /// Consumes a code issued by [`Self::send_account_verification`]. Returns the
    /// (possibly already) verified account.
    pub async fn verify_account_email(&self, account: &Account, code: &str) -> Result<Account> {
        if account.is_verified {
            return Ok(account.clone());
        }
        let mut tx = self.pool.begin().await?;
        let candidates = sqlx::query_as::<_, VerificationCode>(
            r#"
            SELECT id, account_id, email, code, is_used, expires_at, created_at
            FROM verification_codes
            WHERE account_id = $1 AND is_used = FALSE AND expires_at > NOW()
            FOR UPDATE
            "#,
        )
        .bind(account.id)
        .fetch_all(&mut *tx)
        .await?;

        let Some(matched) = candidates.iter().find(|c| codes_match(&c.code, code)) else {
            return Err(Error::InvalidCode(
                "Invalid or expired code. Request a new one.".to_string(),
            ));
        };

        sqlx::query("UPDATE verification_codes SET is_used = TRUE WHERE id = $1")
            .bind(matched.id)
            .execute(&mut *tx)
            .await?;
        let query = format!(
            "UPDATE accounts SET is_verified = TRUE, updated_at = NOW() WHERE id = $1 RETURNING {}",
            ACCOUNT_COLUMNS
        );
        let verified = sqlx::query_as::<_, Account>(&query)
            .bind(account.id)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(account_id = %verified.id, "account email verified");
        Ok(verified)
    }

    fn session_for(&self, account: Account) -> Result<AuthSession> {
        let access_token = issue_access_token(
            &self.jwt_secret,
            &account.email,
            account.id,
            self.token_ttl_minutes,
        )?;
        Ok(AuthSession {
            access_token,
            account,
        })
    }
}
