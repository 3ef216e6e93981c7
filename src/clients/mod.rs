//! Clients - HTTP Clients for External APIs
//!
//! This module contains the client for the external passport backend.

pub mod passport_client;

pub use passport_client::{BackendError, HttpPassportClient, PassportBackend, API_KEY_HEADER};
