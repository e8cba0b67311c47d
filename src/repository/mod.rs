//! Repositories
//!
//! Plain SQL access per table. Every function takes a connection so callers
//! decide whether it runs inside a transaction.

mod event_repository;
mod item_repository;
mod registration_repository;
mod user_repository;

pub use event_repository::EventRepository;
pub use item_repository::ItemRepository;
pub use registration_repository::RegistrationRepository;
pub use user_repository::UserRepository;
