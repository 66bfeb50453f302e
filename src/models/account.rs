use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Seeker,
    Vendor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Seeker => "seeker",
            Role::Vendor => "vendor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "seeker" | "estudiante" => Ok(Role::Seeker),
            "vendor" | "chazero" => Ok(Role::Vendor),
            _ => Err(Error::BadRequest(
                "Account role must be 'seeker' or 'vendor'".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub institution_id: Uuid,
    pub is_active: bool,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

// Access gates used by the HTTP layer. Each unmet gate fails with its own reason.
impl Account {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    pub fn is_vendor(&self) -> bool {
        self.role() == Some(Role::Vendor)
    }

    pub fn is_seeker(&self) -> bool {
        self.role() == Some(Role::Seeker)
    }

    pub fn require_active(&self) -> Result<()> {
        if !self.is_active {
            return Err(Error::Forbidden("Account is deactivated".to_string()));
        }
        Ok(())
    }

    pub fn require_vendor(&self) -> Result<()> {
        if !self.is_vendor() {
            return Err(Error::Forbidden(
                "Only vendors can perform this action".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_seeker(&self) -> Result<()> {
        if !self.is_seeker() {
            return Err(Error::Forbidden(
                "Only seekers can perform this action".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_verified(&self) -> Result<()> {
        if !self.is_verified {
            return Err(Error::Forbidden(
                "You must verify your email address to perform this action".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_verified_vendor(&self) -> Result<()> {
        self.require_vendor()?;
        if !self.is_verified {
            return Err(Error::Forbidden(
                "You must verify your email address to create or modify listings".to_string(),
            ));
        }
        Ok(())
    }

    pub fn require_verified_seeker(&self) -> Result<()> {
        self.require_seeker()?;
        if !self.is_verified {
            return Err(Error::Forbidden(
                "You must verify your email address to apply to listings".to_string(),
            ));
        }
        Ok(())
    }
}
