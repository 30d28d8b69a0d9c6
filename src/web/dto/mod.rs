//! Data Transfer Objects for the web API.

pub mod extract;
pub mod request;
pub mod response;

pub use extract::{BoardForm, BoardPath, BoardQuery};
pub use request::*;
pub use response::*;
