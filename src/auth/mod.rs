//! Session tokens, password hashing and the logout revocation set.

pub mod jwt;
pub mod password;
pub mod revocation;

pub use jwt::JwtKeys;
pub use revocation::RevokedTokens;
