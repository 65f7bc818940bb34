//! Writes the reviewed draft back into the host page's message field.

use replypad::host::HostProfile;
use replypad::log_debug;
use replypad::page::{NodeId, Page};

/// What happened when a commit was attempted. Skips are expected states,
/// not errors; the preconditions simply were not met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CommitOutcome {
    Committed,
    SkippedNoDraft,
    SkippedNoContainer,
}

/// Replace the container's text content with the draft. Locates the first
/// text-bearing child or creates one, so repeated commits rewrite the same
/// node instead of stacking paragraphs. Clears the host's stale
/// accessibility label so it cannot contradict the inserted text.
pub(crate) fn commit_draft(
    page: &mut Page,
    profile: &HostProfile,
    container: Option<NodeId>,
    draft: Option<&str>,
) -> CommitOutcome {
    let Some(text) = draft.filter(|draft| !draft.is_empty()) else {
        log_debug("commit skipped: no draft to insert");
        return CommitOutcome::SkippedNoDraft;
    };
    let Some(container) = container else {
        log_debug("commit skipped: no container anchored");
        return CommitOutcome::SkippedNoContainer;
    };

    let slot = match page.first_child_with_tag(container, &profile.text_tag) {
        Some(existing) => existing,
        None => page.append_element(container, &profile.text_tag),
    };
    page.set_text(slot, text);
    page.remove_attribute(container, &profile.aria_label_attr);
    CommitOutcome::Committed
}
