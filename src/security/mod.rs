//! Security Module
//!
//! Provides the request-facing safety features of the analysis API:
//! - CORS and security headers
//! - Request validation

pub mod middleware;
pub mod validation;

pub use validation::{Validatable, ValidationError, ValidationResult};
