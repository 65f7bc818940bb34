//! Pointer-event inspection that resolves the active message container.

use replypad::host::{HostSurface, MessagingSurface};
use replypad::log_debug;
use replypad::page::{NodeId, Page};

/// Watches page-wide pointer events for the editable message field and
/// resolves the container that anchors the trigger affordance.
pub(crate) struct TargetDetector {
    surface: MessagingSurface,
}

impl TargetDetector {
    pub(crate) fn new(surface: MessagingSurface) -> Self {
        Self { surface }
    }

    pub(crate) fn surface(&self) -> &MessagingSurface {
        &self.surface
    }

    /// Inspect one pointer target. Returns the resolved container when the
    /// target is (or sits inside) the editable field; a miss is a silent
    /// skip, not an error.
    pub(crate) fn observe_pointer(&self, page: &mut Page, target: NodeId) -> Option<NodeId> {
        let field = self.surface.locate_field(page, target)?;
        let container = self.surface.locate_container(page, field)?;
        // Best-effort interop: mirror the host's own active/focused state.
        // Only mark when the wrapper hierarchy is present, as the host does.
        if let Some(wrapper) = self.surface.locate_content_wrapper(page, container) {
            self.surface.set_active_state(page, wrapper);
            self.surface.set_focused_state(page, container);
        }
        Some(container)
    }

    /// Re-assert the host focus attribute while the overlay holds the
    /// user's attention. Skipped silently when there is no anchor.
    pub(crate) fn refocus(&self, page: &mut Page, container: Option<NodeId>) {
        match container {
            Some(container) => self.surface.set_focused_state(page, container),
            None => log_debug("refocus skipped: no container anchored"),
        }
    }
}
