//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations, free of any domain vocabulary:
//! - Cryptographic utilities (HMAC-SHA256, random tokens, Base64)
//! - Signed access/refresh tokens and opaque email-link tokens
//! - Password hashing (Argon2id) and password policy
//! - Cookie and header helpers
//! - Allow-listed generic SQL helpers (the query layer)
//! - Outbound mail transports

pub mod client;
pub mod cookie;
pub mod crypto;
pub mod db;
pub mod mail;
pub mod password;
pub mod token;
