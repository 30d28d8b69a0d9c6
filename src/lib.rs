//! anonboard - Anonymous message board backend
//!
//! Boards hold threads, threads hold replies. Anyone may post, report, or
//! delete with the password chosen at posting time. Served as a JSON API.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{validate_password, Hasher, PasswordError};
pub use board::{BoardName, NewReply, NewThread, Reply, ReplyRepository, Thread, ThreadRepository};
pub use config::Config;
pub use db::Database;
pub use error::{BoardError, Result};
pub use web::WebServer;
