pub mod crypto;
pub mod schedule;
pub mod slug;
pub mod time;
pub mod token;
pub mod validation;
