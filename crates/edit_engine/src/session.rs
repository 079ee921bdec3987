//! Single-writer editing session.
//!
//! The engine lives on one task; every other part of the host (UI, exporter)
//! talks to it through an [`EditorHandle`]. Requests are processed strictly
//! in arrival order, so two commands never interleave and a snapshot always
//! reflects every command sent before it.

use crate::{Command, CommandLog, Confirmer, EditError, EditingEngine, LogEntry, Outcome, Result};
use doc_model::PlannerDocument;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::debug;

/// Default depth of the request queue
pub const DEFAULT_QUEUE_DEPTH: usize = 64;

/// A confirmer that can travel to the session task
pub type BoxedConfirmer = Box<dyn Confirmer + Send>;

enum Request {
    Execute {
        command: Box<dyn Command>,
        reply: oneshot::Sender<Result<Outcome>>,
    },
    ExecuteConfirmed {
        command: Box<dyn Command>,
        confirmer: BoxedConfirmer,
        reply: oneshot::Sender<Result<Outcome>>,
    },
    Snapshot {
        reply: oneshot::Sender<PlannerDocument>,
    },
    History {
        reply: oneshot::Sender<Vec<LogEntry>>,
    },
}

/// Owns an [`EditingEngine`] on a background task
pub struct EditorSession;

impl EditorSession {
    /// Start a session on the current tokio runtime.
    ///
    /// The session runs until every handle is dropped; the join handle then
    /// yields the engine with its final document.
    pub fn spawn(engine: EditingEngine) -> (EditorHandle, JoinHandle<EditingEngine>) {
        Self::spawn_with_depth(engine, DEFAULT_QUEUE_DEPTH)
    }

    pub fn spawn_with_depth(
        engine: EditingEngine,
        depth: usize,
    ) -> (EditorHandle, JoinHandle<EditingEngine>) {
        let (tx, rx) = mpsc::channel(depth.max(1));
        let task = tokio::spawn(run(engine, rx));
        (EditorHandle { tx }, task)
    }
}

async fn run(mut engine: EditingEngine, mut rx: mpsc::Receiver<Request>) -> EditingEngine {
    while let Some(request) = rx.recv().await {
        match request {
            Request::Execute { command, reply } => {
                let _ = reply.send(engine.execute(command.as_ref()));
            }
            Request::ExecuteConfirmed {
                command,
                confirmer,
                reply,
            } => {
                let _ = reply.send(engine.execute_confirmed(command.as_ref(), confirmer.as_ref()));
            }
            Request::Snapshot { reply } => {
                let _ = reply.send(engine.document().clone());
            }
            Request::History { reply } => {
                let _ = reply.send(history(engine.log()));
            }
        }
    }
    debug!("editor session closed");
    engine
}

fn history(log: &CommandLog) -> Vec<LogEntry> {
    log.entries().cloned().collect()
}

/// Cloneable sender side of an editing session
#[derive(Clone)]
pub struct EditorHandle {
    tx: mpsc::Sender<Request>,
}

impl EditorHandle {
    /// Execute a non-destructive command
    pub async fn execute(&self, command: impl Command + 'static) -> Result<Outcome> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Execute {
            command: Box::new(command),
            reply,
        })
        .await?;
        rx.await.map_err(|_| EditError::SessionClosed)?
    }

    /// Execute a command, consulting `confirmer` if it is destructive
    pub async fn execute_confirmed(
        &self,
        command: impl Command + 'static,
        confirmer: impl Confirmer + Send + 'static,
    ) -> Result<Outcome> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::ExecuteConfirmed {
            command: Box::new(command),
            confirmer: Box::new(confirmer),
            reply,
        })
        .await?;
        rx.await.map_err(|_| EditError::SessionClosed)?
    }

    /// Copy of the document after every previously sent command
    pub async fn snapshot(&self) -> Result<PlannerDocument> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::Snapshot { reply }).await?;
        rx.await.map_err(|_| EditError::SessionClosed)
    }

    /// Recent command history, oldest first
    pub async fn history(&self) -> Result<Vec<LogEntry>> {
        let (reply, rx) = oneshot::channel();
        self.send(Request::History { reply }).await?;
        rx.await.map_err(|_| EditError::SessionClosed)
    }

    async fn send(&self, request: Request) -> Result<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| EditError::SessionClosed)
    }
}
