//! Per-session anchor and staleness tracking for the overlay.

use replypad::page::NodeId;

/// The one piece of state shared across components: which container the
/// overlay is working against, and which epoch results must match to apply.
#[derive(Debug, Default)]
pub(crate) struct OverlaySession {
    container: Option<NodeId>,
    epoch: u64,
}

impl OverlaySession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Point the session at a container. Last write wins; nothing queues.
    pub(crate) fn anchor(&mut self, container: NodeId) {
        self.container = Some(container);
    }

    pub(crate) fn container(&self) -> Option<NodeId> {
        self.container
    }

    pub(crate) fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Close out the session: drop the anchor and invalidate any result
    /// still in flight from the previous epoch.
    pub(crate) fn reset(&mut self) {
        self.container = None;
        self.epoch += 1;
    }

    /// Whether a pipeline result from `epoch` still applies.
    pub(crate) fn accepts(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }
}
