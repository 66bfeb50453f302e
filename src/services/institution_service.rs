use sqlx::PgPool;
use uuid::Uuid;

use crate::config::InstitutionSeed;
use crate::error::{Error, Result};
use crate::models::institution::{email_domain, parse_domains, Institution};
use crate::utils::slug::slugify;

const INSTITUTION_COLUMNS: &str =
    "id, name, short_name, slug, email_domains, city, is_active, created_at";

#[derive(Clone)]
pub struct InstitutionService {
    pool: PgPool,
}

impl InstitutionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts every seed whose name is not already present. Safe to run on each start.
    pub async fn seed(&self, seeds: &[InstitutionSeed]) -> Result<u64> {
        let mut inserted = 0;
        for seed in seeds {
            let domains = parse_domains(&seed.email_domains).join(",");
            let result = sqlx::query(
                r#"
                INSERT INTO institutions (name, short_name, slug, email_domains, city)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(&seed.name)
            .bind(&seed.short_name)
            .bind(slugify(&seed.short_name))
            .bind(domains)
            .bind(&seed.city)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected();
        }
        if inserted > 0 {
            tracing::info!(inserted, "seeded institutions");
        }
        Ok(inserted)
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Institution>> {
        let query = format!(
            "SELECT {} FROM institutions WHERE ($1 = FALSE OR is_active) ORDER BY name",
            INSTITUTION_COLUMNS
        );
        let items = sqlx::query_as::<_, Institution>(&query)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Institution>> {
        let query = format!("SELECT {} FROM institutions WHERE id = $1", INSTITUTION_COLUMNS);
        let item = sqlx::query_as::<_, Institution>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(item)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Institution> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound("Institution not found".to_string()))
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Institution> {
        let query = format!("SELECT {} FROM institutions WHERE slug = $1", INSTITUTION_COLUMNS);
        sqlx::query_as::<_, Institution>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Institution not found".to_string()))
    }

    /// Active institution accepting the email's domain, if any.
    pub async fn find_for_email(&self, email: &str) -> Result<Option<Institution>> {
        if email_domain(email).is_none() {
            return Ok(None);
        }
        let institutions = self.list(true).await?;
        Ok(institutions.into_iter().find(|inst| inst.accepts_email(email)))
    }
}
