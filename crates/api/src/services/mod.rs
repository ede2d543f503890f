//! Clients for external services.

pub mod translation;
