//! CareNest booking core.
//!
//! Domain types and pure logic for booking healthcare services across
//! verticals (doctors, home visits, lab tests, nursing, elderly care,
//! medicine delivery), plus the collaborator traits the adapters implement.

pub mod auth;
pub mod booking;
pub mod catalogue;
pub mod config;
pub mod conversation;
pub mod error;
pub mod notification;
pub mod pricing;
pub mod provider_link;

// Re-export common error type
pub use error::{CareNestError, Result, ValidationError};
