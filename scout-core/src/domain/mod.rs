//! Core domain types
//!
//! This module contains the core domain structures used across Scout crates.
//! These types mirror what the pattern store returns and are shared between
//! the client (transport) and the workbench (session logic).

pub mod pattern;
pub mod result;
pub(crate) mod timestamp;
pub mod user;
