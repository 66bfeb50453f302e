use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Vendor: a seeker applied to their listing.
    NuevaPostulacion,
    /// Vendor: a seeker withdrew an application.
    PostulacionCancelada,
    PostulacionAceptada,
    PostulacionRechazada,
    MensajeNuevo,
    Sistema,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::NuevaPostulacion => "nueva_postulacion",
            NotificationKind::PostulacionCancelada => "postulacion_cancelada",
            NotificationKind::PostulacionAceptada => "postulacion_aceptada",
            NotificationKind::PostulacionRechazada => "postulacion_rechazada",
            NotificationKind::MensajeNuevo => "mensaje_nuevo",
            NotificationKind::Sistema => "sistema",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub listing_id: Option<Uuid>,
    pub application_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub recipient_id: Uuid,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub listing_id: Option<Uuid>,
    pub application_id: Option<Uuid>,
}
