//! One-time trigger affordance injected into each detected container.

use std::collections::HashMap;

use replypad::page::{NodeId, Page};

use crate::icons::IconSet;

/// Marker class that makes re-detection of a container skip re-injection.
pub(crate) const TRIGGER_CLASS: &str = "reply-trigger";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TriggerOutcome {
    Injected(NodeId),
    AlreadyPresent(NodeId),
}

impl TriggerOutcome {
    pub(crate) fn node(self) -> NodeId {
        match self {
            TriggerOutcome::Injected(id) | TriggerOutcome::AlreadyPresent(id) => id,
        }
    }
}

/// Maps injected trigger nodes back to the container they anchor, so a
/// trigger click can re-anchor the session after a reset.
#[derive(Debug, Default)]
pub(crate) struct TriggerRegistry {
    anchors: HashMap<NodeId, NodeId>,
}

impl TriggerRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_trigger(&self, id: NodeId) -> bool {
        self.anchors.contains_key(&id)
    }

    pub(crate) fn container_for(&self, trigger: NodeId) -> Option<NodeId> {
        self.anchors.get(&trigger).copied()
    }

    fn register(&mut self, trigger: NodeId, container: NodeId) {
        self.anchors.insert(trigger, container);
    }
}

/// Attach the trigger icon to `container` unless it already carries one.
/// Duplicate injection is a silent no-op reported as `AlreadyPresent`.
pub(crate) fn ensure_trigger(
    page: &mut Page,
    registry: &mut TriggerRegistry,
    container: NodeId,
    icons: &IconSet,
) -> TriggerOutcome {
    if let Some(existing) = page.find_class_in(container, TRIGGER_CLASS) {
        return TriggerOutcome::AlreadyPresent(existing);
    }
    page.set_style(container, "position", "relative");
    let icon = page.append_element(container, "img");
    page.add_class(icon, TRIGGER_CLASS);
    page.set_attribute(icon, "src", icons.edit);
    page.set_attribute(icon, "alt", "Draft a reply");
    page.set_style(icon, "position", "absolute");
    page.set_style(icon, "bottom", "5px");
    page.set_style(icon, "right", "5px");
    page.set_style(icon, "cursor", "pointer");
    registry.register(icon, container);
    TriggerOutcome::Injected(icon)
}
