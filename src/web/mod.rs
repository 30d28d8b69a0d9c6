//! Web API module for anonboard.
//!
//! This module provides the JSON API over threads and replies, along with
//! the middleware every board deployment carries.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
pub use server::WebServer;
