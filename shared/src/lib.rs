//! Shared types and models for the Supply Chain Management API
//!
//! This crate contains the transport-independent domain model used by the
//! backend services and by any client that talks to the API.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
