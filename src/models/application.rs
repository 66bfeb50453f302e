use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

pub const APPLICATION_COLUMNS: &str = "id, seeker_id, listing_id, selected_slots, message, \
     state, response, created_at, updated_at, responded_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationState {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
}

impl ApplicationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationState::Pending => "pending",
            ApplicationState::Accepted => "accepted",
            ApplicationState::Rejected => "rejected",
            ApplicationState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ApplicationState::Pending)
    }

    /// Vendors move pending applications to accepted/rejected; seekers may only cancel.
    pub fn can_transition_to(&self, next: ApplicationState) -> bool {
        matches!(
            (self, next),
            (
                ApplicationState::Pending,
                ApplicationState::Accepted | ApplicationState::Rejected | ApplicationState::Cancelled
            )
        )
    }
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(ApplicationState::Pending),
            "accepted" | "aceptada" => Ok(ApplicationState::Accepted),
            "rejected" | "rechazada" => Ok(ApplicationState::Rejected),
            "cancelled" | "cancelada" => Ok(ApplicationState::Cancelled),
            other => Err(Error::BadRequest(format!(
                "Invalid application state '{}'. Options: pending, accepted, rejected, cancelled",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub seeker_id: Uuid,
    pub listing_id: Uuid,
    pub selected_slots: Vec<String>,
    pub message: Option<String>,
    pub state: String,
    pub response: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Application {
    pub fn state(&self) -> Result<ApplicationState> {
        self.state.parse()
    }
}
