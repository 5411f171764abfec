//! Scout Workbench
//!
//! Session logic for exploring, running and authoring query patterns.
//!
//! Architecture:
//! - Execution session: browse the catalog, bind parameters, run a pattern
//! - Natural-query session: translate free text, refine, save or delete
//! - Manual session: hand-edit a pipeline, test it, save it
//! - User session: login/logout and the user's pattern collection
//! - Projector: turn result records into table columns and cells
//!
//! Sessions own their state and talk to the backend through the
//! [`PatternStore`](scout_client::PatternStore) trait. Each remote call is
//! split into a `begin_*` step that records a [`Ticket`] and a `finish_*` step
//! that applies the response only if the ticket is still current, so a late
//! response can never overwrite newer state.

pub mod execution;
pub mod manual;
pub mod natural;
pub mod notice;
pub mod projector;
pub mod session;
pub mod ticket;

#[cfg(test)]
mod fake;

pub use execution::{ExecutionPhase, ExecutionSession};
pub use manual::{ManualDraft, ManualPipelineSession, PipelineSource};
pub use natural::{NaturalPhase, NaturalQuerySession, SaveDialog};
pub use notice::{Notice, NoticeLevel, Notices};
pub use session::Session;
pub use ticket::{Ticket, TicketIssuer};
