//! Data models and API request/response types.

pub mod account;
pub mod card;
pub mod transaction;
pub mod transference;
pub mod user;
