//! Command system for document editing
//!
//! Every mutation of a [`PlannerDocument`] is a command: a pure transition
//! from one document state to the next. The engine owns the only mutable
//! copy and swaps in the result, so commands never alias shared state.

use doc_model::{BlockId, PlannerDocument};
use serde::{Deserialize, Serialize};

/// What a command did to the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    /// The document changed
    Applied,
    /// The command was valid but had nothing to do
    Unchanged,
    /// The user declined a destructive command
    Declined,
}

/// Result of applying a command
#[derive(Debug)]
pub struct CommandResult {
    /// The document after the command
    pub document: PlannerDocument,
    /// Whether anything changed
    pub outcome: Outcome,
}

impl CommandResult {
    pub fn applied(document: PlannerDocument) -> Self {
        Self {
            document,
            outcome: Outcome::Applied,
        }
    }

    pub fn unchanged(document: &PlannerDocument) -> Self {
        Self {
            document: document.clone(),
            outcome: Outcome::Unchanged,
        }
    }
}

/// Trait for all editing commands
pub trait Command: std::fmt::Debug + Send + Sync {
    /// Apply this command to a document, producing the next state
    fn apply(&self, document: &PlannerDocument) -> crate::Result<CommandResult>;

    /// Get a display name for this command
    fn display_name(&self) -> &str;

    /// Destructive commands discard content irreversibly and must be
    /// confirmed by the user before they run
    fn is_destructive(&self) -> bool {
        false
    }

    /// Question to put to the user before a destructive command
    fn confirmation_prompt(&self) -> Option<&str> {
        None
    }

    /// Clone this command into a box
    fn clone_box(&self) -> Box<dyn Command>;
}

impl Clone for Box<dyn Command> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Asks the user to confirm a destructive command
pub trait Confirmer {
    fn confirm(&self, prompt: &str) -> bool;
}

/// A decision made ahead of time
impl Confirmer for bool {
    fn confirm(&self, _prompt: &str) -> bool {
        *self
    }
}

/// Which block a block command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockTarget {
    /// Whatever is currently selected; no-op when nothing is
    Selected,
    /// A specific block on the current page
    Id(BlockId),
}

impl BlockTarget {
    /// Resolve to a concrete block id, or `None` when targeting an empty selection
    pub fn resolve(self, document: &PlannerDocument) -> Option<BlockId> {
        match self {
            BlockTarget::Selected => document.selected_block_id(),
            BlockTarget::Id(id) => Some(id),
        }
    }
}

impl From<BlockId> for BlockTarget {
    fn from(id: BlockId) -> Self {
        BlockTarget::Id(id)
    }
}
