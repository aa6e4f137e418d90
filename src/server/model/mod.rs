//! Server-side domain models.
//!
//! This module contains domain models used throughout the service layer. Message listings
//! from Discord are decoded straight into these types by the REST client.

pub mod clear;
pub mod message;
