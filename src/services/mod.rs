//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, uniqueness checks and ledger writes.

pub mod account_service;
pub mod card_service;
pub mod identifiers;
pub mod transaction_service;
pub mod transference_service;
pub mod user_service;
