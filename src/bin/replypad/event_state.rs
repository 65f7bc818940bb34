//! Shared state and dependencies for the overlay event loop.

use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Receiver;
use replypad::page::Page;
use replypad::{GenerationJob, ReplyProvider};

use crate::detector::TargetDetector;
use crate::icons::IconSet;
use crate::input::PageEvent;
use crate::overlay::{OverlayState, OverlayView};
use crate::session::OverlaySession;
use crate::trigger::TriggerRegistry;

pub(crate) struct EventLoopState {
    pub(crate) overlay: OverlayState,
    pub(crate) session: OverlaySession,
    pub(crate) triggers: TriggerRegistry,
    /// The single outstanding pipeline job, if any.
    pub(crate) generation: Option<GenerationJob>,
    pub(crate) generation_started_at: Option<Instant>,
}

impl EventLoopState {
    pub(crate) fn new() -> Self {
        Self {
            overlay: OverlayState::new(),
            session: OverlaySession::new(),
            triggers: TriggerRegistry::new(),
            generation: None,
            generation_started_at: None,
        }
    }
}

pub(crate) struct EventLoopDeps {
    pub(crate) page: Page,
    pub(crate) view: OverlayView,
    pub(crate) detector: TargetDetector,
    pub(crate) provider: Arc<dyn ReplyProvider>,
    pub(crate) input_rx: Receiver<PageEvent>,
    pub(crate) icons: &'static IconSet,
}
