//! Command execution engine

use crate::{Command, CommandLog, Confirmer, EditError, Outcome, Result};
use doc_model::{DocumentConfig, PlannerDocument};
use tracing::{debug, info};

/// Owns the document and runs every command against it.
///
/// A command either succeeds and its result replaces the document, or fails
/// and the document is left exactly as it was.
pub struct EditingEngine {
    /// Current document
    document: PlannerDocument,
    /// History of executed commands
    log: CommandLog,
}

impl EditingEngine {
    /// Create an editing engine with a fresh single-page document
    pub fn new(config: DocumentConfig) -> Self {
        Self::with_document(PlannerDocument::new(config))
    }

    /// Create an editing engine around an existing document
    pub fn with_document(document: PlannerDocument) -> Self {
        Self {
            document,
            log: CommandLog::new(),
        }
    }

    /// Get the current document
    pub fn document(&self) -> &PlannerDocument {
        &self.document
    }

    /// Get the command history
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Give up the engine and keep the document
    pub fn into_document(self) -> PlannerDocument {
        self.document
    }

    /// Execute a command.
    ///
    /// Destructive commands are refused with [`EditError::ConfirmationRequired`];
    /// run them through [`EditingEngine::execute_confirmed`].
    pub fn execute(&mut self, command: &dyn Command) -> Result<Outcome> {
        if command.is_destructive() {
            let prompt = command
                .confirmation_prompt()
                .unwrap_or(command.display_name())
                .to_string();
            return Err(EditError::ConfirmationRequired(prompt));
        }
        self.run(command)
    }

    /// Execute a command, asking `confirmer` first if it is destructive
    pub fn execute_confirmed(
        &mut self,
        command: &dyn Command,
        confirmer: &dyn Confirmer,
    ) -> Result<Outcome> {
        if command.is_destructive() {
            let prompt = command
                .confirmation_prompt()
                .unwrap_or(command.display_name());
            if !confirmer.confirm(prompt) {
                debug!(command = command.display_name(), "destructive command declined");
                self.log.record(command.display_name(), Outcome::Declined);
                return Ok(Outcome::Declined);
            }
        }
        self.run(command)
    }

    fn run(&mut self, command: &dyn Command) -> Result<Outcome> {
        let result = command.apply(&self.document).map_err(|err| {
            debug!(command = command.display_name(), error = %err, "command rejected");
            err
        })?;

        let mut document = result.document;
        document.normalize();
        self.document = document;

        self.log.record(command.display_name(), result.outcome);
        info!(
            command = command.display_name(),
            outcome = ?result.outcome,
            pages = self.document.page_count(),
            current = self.document.current_page_index(),
            "command executed"
        );
        Ok(result.outcome)
    }
}

impl Default for EditingEngine {
    fn default() -> Self {
        Self::new(DocumentConfig::default())
    }
}
