//! Edit Engine - Command system and single-writer editing session
//!
//! Every change to a planner document goes through a [`Command`]. The
//! [`EditingEngine`] applies commands one at a time, gates destructive ones
//! behind a confirmation, keeps the document's cursor invariants, and records
//! a short history. [`EditorSession`] puts the engine behind a channel so
//! that a UI and an exporter can share it.

mod block_commands;
mod bundle_commands;
mod command;
mod error;
mod executor;
mod log;
mod page_commands;
mod session;

pub use block_commands::*;
pub use bundle_commands::*;
pub use command::*;
pub use error::*;
pub use executor::*;
pub use log::*;
pub use page_commands::*;
pub use session::*;
