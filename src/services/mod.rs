pub mod application_service;
pub mod auth_service;
pub mod contact_service;
pub mod email_service;
pub mod institution_service;
pub mod listing_service;
pub mod notification_service;
