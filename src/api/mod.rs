//! API module
//!
//! HTTP API endpoints and middleware.

pub mod extract;
mod items;
pub mod middleware;
pub mod routes;
mod users;

pub use routes::{build_app, create_router};
