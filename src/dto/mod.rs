pub mod application_dto;
pub mod auth_dto;
pub mod contact_dto;
pub mod institution_dto;
pub mod listing_dto;
pub mod notification_dto;
