//! Command Handlers module
//!
//! Write operations. Each handler validates its input before touching
//! storage, owns the transaction and translates constraint violations.

mod event_handler;
mod item_handler;
mod registration_handler;
mod user_handler;

#[cfg(test)]
mod tests;

pub use event_handler::EventHandler;
pub use item_handler::ItemHandler;
pub use registration_handler::{registration_insert_error, RegistrationHandler};
pub use user_handler::UserHandler;
