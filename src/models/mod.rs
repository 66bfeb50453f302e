pub mod account;
pub mod application;
pub mod contact;
pub mod institution;
pub mod listing;
pub mod notification;
pub mod pending_registration;
pub mod schedule;
