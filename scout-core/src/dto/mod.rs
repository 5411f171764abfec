//! Data Transfer Objects for the pattern store API
//!
//! Request and response bodies exchanged with the backend. Field names follow
//! the wire format exactly; optional fields are omitted when unset.

pub mod natural;
pub mod pattern;
pub mod user;
