//! Service layer for slash command handling.
//!
//! Services sit between the HTTP controllers and the Discord REST client. They decide how
//! an interaction is answered and what work it starts, but never touch axum types.
//!
//! - **`interaction`**: Routes a decoded interaction to the handler for its type and command
//! - **`clear`**: The `/clear` command and its background deletion runs
//! - **`command`**: Publishes the bot's command definitions to Discord

pub mod clear;
pub mod command;
pub mod interaction;

#[cfg(test)]
mod test;
