//! Request and response shapes exchanged over HTTP.

pub mod api;
pub mod interaction;
