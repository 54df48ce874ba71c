//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- Session token generation and validation.
//! - [`session`] -- The session cookie carrying the token.

pub mod jwt;
pub mod password;
pub mod session;
