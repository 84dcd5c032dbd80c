//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation. Statistics payloads are served straight from
//! [`crate::domain::entities::stats`].

pub mod filter;
pub mod health;
pub mod ownership;
pub mod pagination;
pub mod patent;
pub mod person;
