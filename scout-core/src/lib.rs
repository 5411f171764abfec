//! Scout Core
//!
//! Core types and abstractions for the Scout query-pattern workbench.
//!
//! This crate contains:
//! - Domain types: Core business entities (QueryPattern, ExecutionResult, etc.)
//! - DTOs: Request and response bodies exchanged with the pattern store
//! - Error envelope: The normalized error shape every layer branches on
//! - Pipeline text parsing for hand-written pipelines

pub mod domain;
pub mod dto;
pub mod error;
pub mod pipeline;
