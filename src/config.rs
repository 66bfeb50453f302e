use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub access_token_expire_minutes: i64,
    pub verification_code_expire_minutes: i64,
    pub cors_origins: Vec<String>,
    pub public_rps: u32,
    /// Honor `X-Forwarded-For` when rate limiting. Only safe behind a proxy that overwrites it.
    pub trust_proxy_headers: bool,
    pub email: EmailConfig,
    pub institutions: Vec<InstitutionSeed>,
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub resend_api_key: Option<String>,
    pub from: String,
    pub admin_email: Option<String>,
}

/// Institution created at startup when no institution with the same name exists.
#[derive(Debug, Clone, Deserialize)]
pub struct InstitutionSeed {
    pub name: String,
    pub short_name: String,
    pub email_domains: String,
    pub city: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let institutions = match env::var("INSTITUTIONS_SEED") {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                Error::Config(format!("Invalid value for INSTITUTIONS_SEED: {}", e))
            })?,
            Err(_) => default_institutions(),
        };

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", "0.0.0.0:8000"),
            database_url: get_env("DATABASE_URL")?,
            database_max_connections: get_env_parse_or("DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret: get_env("JWT_SECRET")?,
            access_token_expire_minutes: get_env_parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", 1440)?,
            verification_code_expire_minutes: get_env_parse_or(
                "VERIFICATION_CODE_EXPIRE_MINUTES",
                15,
            )?,
            cors_origins: split_list(&get_env_or("CORS_ORIGINS", "http://localhost:3000")),
            public_rps: get_env_parse_or("PUBLIC_RPS", 20)?,
            trust_proxy_headers: get_env_parse_or("TRUST_PROXY_HEADERS", false)?,
            email: EmailConfig {
                resend_api_key: get_optional("RESEND_API_KEY"),
                from: get_env_or("EMAIL_FROM", "Chazas <onboarding@resend.dev>"),
                admin_email: get_optional("ADMIN_EMAIL"),
            },
            institutions,
        })
    }
}

pub fn default_institutions() -> Vec<InstitutionSeed> {
    vec![InstitutionSeed {
        name: "Universidad Nacional de Colombia - Sede Bogotá".to_string(),
        short_name: "UNAL Bogotá".to_string(),
        email_domains: "unal.edu.co".to_string(),
        city: "Bogotá".to_string(),
    }]
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    get_optional(name).unwrap_or_else(|| default.to_string())
}

fn get_optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_optional(name) {
        Some(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
