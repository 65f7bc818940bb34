//! Page interaction events and the scripted source that feeds them.
//!
//! Targets are addressed by selector string (`#id`, `.class`, or tag) and
//! resolved against the page at dispatch time, so a script can reference
//! elements that only exist after injection (the trigger, the overlay).

use crossbeam_channel::Sender;
use std::thread;
use std::time::Duration;

use replypad::log_debug;

/// One interaction observed on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PageEvent {
    /// Pointer press; the payload is the event target.
    Pointer { target: String },
    /// The overlay input's value changed.
    Input { text: String },
    /// Explicit request to close the overlay.
    Close,
    /// End of the session.
    Exit,
}

/// A scripted interaction step: wait, then emit.
#[derive(Debug, Clone)]
pub(crate) struct ScriptStep {
    pub after: Duration,
    pub event: PageEvent,
}

impl ScriptStep {
    pub(crate) fn new(after: Duration, event: PageEvent) -> Self {
        Self { after, event }
    }
}

/// Replay a script on its own thread so the event loop sees interactions
/// arrive the way real input would.
pub(crate) fn spawn_script_thread(
    steps: Vec<ScriptStep>,
    tx: Sender<PageEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for step in steps {
            if !step.after.is_zero() {
                thread::sleep(step.after);
            }
            if tx.send(step.event).is_err() {
                log_debug("script channel closed before replay finished");
                return;
            }
        }
    })
}
