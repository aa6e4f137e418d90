//! HTTP request handlers.
//!
//! Controllers decode requests, hand them to the service layer, and turn the result into a
//! response. They hold no logic of their own.

pub mod interaction;
pub mod status;

#[cfg(test)]
mod test;
