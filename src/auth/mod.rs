//! Delete-password handling for anonboard.
//!
//! Threads and replies carry their own delete password; there are no user
//! accounts.

mod password;

pub use password::{validate_password, Hasher, PasswordError, MAX_PASSWORD_LENGTH};
