//! The overlay subtree injected into the page, with stable identifiers so
//! tests and automation can address every control.

use replypad::page::{NodeId, Page};

use crate::icons::IconSet;

use super::state::{OverlayPhase, OverlayState, TranscriptRole};

pub(crate) const OVERLAY_ID: &str = "reply-overlay";
pub(crate) const PANEL_ID: &str = "reply-panel";
pub(crate) const TRANSCRIPT_ID: &str = "reply-transcript";
pub(crate) const INPUT_ID: &str = "reply-input";
pub(crate) const INSERT_BTN_ID: &str = "reply-insert-btn";
pub(crate) const GENERATE_BTN_ID: &str = "reply-generate-btn";

const USER_MSG_CLASS: &str = "reply-msg--user";
const ASSISTANT_MSG_CLASS: &str = "reply-msg--assistant";

/// Handles to the injected overlay elements.
#[derive(Debug)]
pub(crate) struct OverlayView {
    root: NodeId,
    transcript: NodeId,
    input: NodeId,
    insert_btn: NodeId,
    generate_btn: NodeId,
    generate_icon: NodeId,
}

impl OverlayView {
    /// Build the overlay subtree at the end of the document body, hidden.
    pub(crate) fn mount(page: &mut Page, icons: &IconSet) -> Self {
        let root = page.append_element(page.root(), "div");
        page.set_dom_id(root, OVERLAY_ID);
        page.set_style(root, "position", "fixed");
        page.set_style(root, "display", "none");

        let panel = page.append_element(root, "div");
        page.set_dom_id(panel, PANEL_ID);

        let transcript = page.append_element(panel, "div");
        page.set_dom_id(transcript, TRANSCRIPT_ID);

        let input = page.append_element(panel, "input");
        page.set_dom_id(input, INPUT_ID);
        page.set_attribute(input, "type", "text");
        page.set_attribute(input, "placeholder", "Enter your prompt...");

        let actions = page.append_element(panel, "div");

        let insert_btn = page.append_element(actions, "button");
        page.set_dom_id(insert_btn, INSERT_BTN_ID);
        page.set_style(insert_btn, "display", "none");
        let insert_icon = page.append_element(insert_btn, "img");
        page.set_attribute(insert_icon, "src", icons.insert);
        page.set_attribute(insert_icon, "alt", "Insert");
        page.set_text(insert_btn, "Insert");

        let generate_btn = page.append_element(actions, "button");
        page.set_dom_id(generate_btn, GENERATE_BTN_ID);
        let generate_icon = page.append_element(generate_btn, "img");
        page.set_attribute(generate_icon, "src", icons.generate);
        page.set_attribute(generate_icon, "alt", "Generate");
        page.set_text(generate_btn, "Generate");

        Self {
            root,
            transcript,
            input,
            insert_btn,
            generate_btn,
            generate_icon,
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn show(&self, page: &mut Page) {
        page.set_style(self.root, "display", "flex");
    }

    pub(crate) fn hide(&self, page: &mut Page) {
        page.set_style(self.root, "display", "none");
    }

    /// Whether `id` sits inside the overlay subtree (outside-click check).
    pub(crate) fn contains(&self, page: &Page, id: NodeId) -> bool {
        page.contains(self.root, id)
    }

    pub(crate) fn is_generate(&self, id: NodeId) -> bool {
        id == self.generate_btn
    }

    pub(crate) fn is_insert(&self, id: NodeId) -> bool {
        id == self.insert_btn
    }

    pub(crate) fn is_input(&self, id: NodeId) -> bool {
        id == self.input
    }

    pub(crate) fn set_input(&self, page: &mut Page, value: &str) {
        page.set_attribute(self.input, "value", value);
    }

    pub(crate) fn clear_input(&self, page: &mut Page) {
        self.set_input(page, "");
    }

    /// Append one transcript line to the messages region.
    pub(crate) fn append_entry(&self, page: &mut Page, role: TranscriptRole, text: &str) {
        let entry = page.append_element(self.transcript, "div");
        let class = match role {
            TranscriptRole::User => USER_MSG_CLASS,
            TranscriptRole::Assistant => ASSISTANT_MSG_CLASS,
        };
        page.add_class(entry, class);
        page.set_text(entry, text);
    }

    /// Reconcile button labels, icons, and visibility with the state.
    pub(crate) fn sync_controls(&self, page: &mut Page, state: &OverlayState, icons: &IconSet) {
        page.set_text(self.generate_btn, state.phase.generate_label());
        let icon = match state.phase {
            OverlayPhase::Ready => icons.regenerate,
            _ => icons.generate,
        };
        page.set_attribute(self.generate_icon, "src", icon);
        if state.phase == OverlayPhase::Pending {
            page.set_attribute(self.generate_btn, "disabled", "true");
        } else {
            page.remove_attribute(self.generate_btn, "disabled");
        }
        let insert_display = if state.insert_visible { "inline-block" } else { "none" };
        page.set_style(self.insert_btn, "display", insert_display);
    }
}
