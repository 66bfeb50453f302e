#![allow(dead_code)]

use std::env;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use chazas_backend::{
    config::{Config, EmailConfig, InstitutionSeed},
    database::pool::{create_pool, run_migrations},
    routes,
    services::email_service::{EmailDispatcher, LogTransport},
    AppState,
};
use serde_json::{json, Value as JsonValue};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub pool: PgPool,
    pub state: AppState,
}

/// Builds the app against `DATABASE_URL`. `None` when no database is configured.
pub async fn setup() -> Option<TestApp> {
    dotenvy::dotenv().ok();
    let Ok(database_url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    let config = Config {
        server_address: "127.0.0.1:0".to_string(),
        database_url,
        database_max_connections: 5,
        jwt_secret: "test_secret_key".to_string(),
        access_token_expire_minutes: 60,
        verification_code_expire_minutes: 15,
        cors_origins: vec!["*".to_string()],
        public_rps: 1000,
        trust_proxy_headers: false,
        email: EmailConfig {
            resend_api_key: None,
            from: "Chazas <test@example.com>".to_string(),
            admin_email: Some("admin@example.com".to_string()),
        },
        institutions: Vec::new(),
    };

    let pool = create_pool(&config).await.expect("pool");
    run_migrations(&pool).await.expect("migrations");

    let mailer = EmailDispatcher::new(Arc::new(LogTransport), config.email.admin_email.clone());
    let state = AppState::with_mailer(pool.clone(), config, mailer);
    let router = routes::router(state.clone());
    Some(TestApp {
        router,
        pool,
        state,
    })
}

impl TestApp {
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<JsonValue>,
    ) -> (StatusCode, JsonValue) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        let value = if bytes.is_empty() {
            JsonValue::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
        };
        (status, value)
    }

    /// Seeds a fresh institution with its own domain. Returns `(id, domain)`.
    pub async fn institution(&self) -> (Uuid, String) {
        let tag = Uuid::new_v4().simple().to_string();
        let domain = format!("u{}.edu", &tag[..12]);
        let seed = InstitutionSeed {
            name: format!("Test University {}", tag),
            short_name: format!("TU {}", &tag[..8]),
            email_domains: domain.clone(),
            city: "Bogotá".to_string(),
        };
        self.state
            .institution_service
            .seed(&[seed])
            .await
            .expect("seed institution");
        let id = self
            .state
            .institution_service
            .find_for_email(&format!("probe@{}", domain))
            .await
            .expect("lookup")
            .expect("institution exists")
            .id;
        (id, domain)
    }

    pub async fn pending_code(&self, email: &str) -> String {
        let row: (String,) =
            sqlx::query_as("SELECT verification_code FROM pending_registrations WHERE email = $1")
                .bind(email)
                .fetch_one(&self.pool)
                .await
                .expect("pending registration");
        row.0
    }

    /// Registers and verifies an account. Returns `(token, account id)`.
    pub async fn verified_account(
        &self,
        institution_id: Uuid,
        domain: &str,
        name: &str,
        role: &str,
    ) -> (String, Uuid) {
        let email = format!("{}.{}@{}", name.to_lowercase(), &Uuid::new_v4().simple().to_string()[..8], domain);
        let (status, body) = self
            .send(
                "POST",
                "/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "secret123",
                    "role": role,
                    "institution_id": institution_id,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let code = self.pending_code(&email).await;
        let (status, body) = self
            .send(
                "POST",
                "/auth/verify-registration",
                None,
                Some(json!({ "email": email, "code": code })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "verify failed: {}", body);
        let token = body["access_token"].as_str().unwrap().to_string();
        let id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, id)
    }
}
