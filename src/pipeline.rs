//! Background worker that turns submitted text into a draft reply.
//!
//! The provider runs off the event loop so a slow backend never stalls page
//! interaction. Exactly one message comes back per job; the event loop keeps
//! at most one job outstanding and decides whether the result still applies.

use anyhow::Result;
use crossbeam_channel::{bounded, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Produces a reply for submitted text. Implementations may block; they run
/// on a dedicated worker thread. Swapping in a real backend call only means
/// providing another implementation of this trait.
pub trait ReplyProvider: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String>;

    /// Short name for logs and status output.
    fn name(&self) -> &'static str {
        "provider"
    }
}

/// Reference provider: waits a fixed simulated latency, then returns a
/// canned reply regardless of the prompt.
pub struct CannedReplyProvider {
    reply: String,
    latency: Duration,
}

impl CannedReplyProvider {
    pub fn new(reply: impl Into<String>, latency: Duration) -> Self {
        Self {
            reply: reply.into(),
            latency,
        }
    }
}

impl ReplyProvider for CannedReplyProvider {
    fn generate(&self, _prompt: &str) -> Result<String> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "canned"
    }
}

/// Messages sent from the worker back to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationMessage {
    Draft { text: String, epoch: u64 },
    Failed { message: String, epoch: u64 },
}

impl GenerationMessage {
    pub fn epoch(&self) -> u64 {
        match self {
            GenerationMessage::Draft { epoch, .. } => *epoch,
            GenerationMessage::Failed { epoch, .. } => *epoch,
        }
    }
}

/// Handle the event loop uses to poll the worker for its single result.
pub struct GenerationJob {
    pub receiver: Receiver<GenerationMessage>,
    pub handle: Option<thread::JoinHandle<()>>,
    pub epoch: u64,
}

impl GenerationJob {
    /// Reap the worker thread once its message has been received.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawn a worker thread that generates one draft and reports back.
pub fn start_generation_job(
    provider: Arc<dyn ReplyProvider>,
    prompt: String,
    epoch: u64,
) -> GenerationJob {
    let (tx, rx) = bounded(1);
    let handle = thread::spawn(move || {
        let message = match provider.generate(&prompt) {
            Ok(text) => GenerationMessage::Draft { text, epoch },
            Err(err) => GenerationMessage::Failed {
                message: format!("{err:#}"),
                epoch,
            },
        };
        let _ = tx.send(message);
    });
    GenerationJob {
        receiver: rx,
        handle: Some(handle),
        epoch,
    }
}
