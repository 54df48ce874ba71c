//! Domain primitives shared by the database and HTTP layers.
//!
//! Nothing in this crate touches the network or the database: it holds the
//! error type, id/timestamp aliases, pagination math, form validation and
//! the upload checks that the handlers build on.

pub mod admin;
pub mod error;
pub mod forms;
pub mod media;
pub mod pagination;
pub mod slug;
pub mod types;
pub mod users;
