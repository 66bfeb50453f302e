pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::services::{
    application_service::ApplicationService, auth_service::AuthService,
    contact_service::ContactService, email_service::EmailDispatcher,
    institution_service::InstitutionService, listing_service::ListingService,
    notification_service::NotificationService,
};
use reqwest::Client;
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub institution_service: InstitutionService,
    pub listing_service: ListingService,
    pub application_service: ApplicationService,
    pub notification_service: NotificationService,
    pub contact_service: ContactService,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;
        let mailer = EmailDispatcher::from_config(&config.email, http_client);
        Ok(Self::with_mailer(pool, config, mailer))
    }

    /// Same wiring as [`AppState::new`] with a caller-supplied email dispatcher.
    pub fn with_mailer(pool: PgPool, config: Config, mailer: EmailDispatcher) -> Self {
        let institution_service = InstitutionService::new(pool.clone());
        let auth_service = AuthService::new(
            pool.clone(),
            institution_service.clone(),
            mailer.clone(),
            &config,
        );
        let listing_service = ListingService::new(pool.clone());
        let application_service =
            ApplicationService::new(pool.clone(), listing_service.clone(), mailer.clone());
        let notification_service = NotificationService::new(pool.clone());
        let contact_service = ContactService::new(pool.clone(), mailer);

        Self {
            pool,
            config: Arc::new(config),
            auth_service,
            institution_service,
            listing_service,
            application_service,
            notification_service,
            contact_service,
        }
    }
}
