//! Core runtime loop that routes pointer events, overlay actions, and
//! pipeline completions through one single-threaded state machine.

use std::time::{Duration, Instant};

use crossbeam_channel::{never, select};
use replypad::page::NodeId;
use replypad::{log_debug, log_debug_content, start_generation_job, GenerationMessage};

use crate::committer::{commit_draft, CommitOutcome};
use crate::event_state::{EventLoopDeps, EventLoopState};
use crate::input::PageEvent;
use crate::overlay::{OverlayPhase, TranscriptRole};
use crate::trigger::ensure_trigger;

const EVENT_LOOP_IDLE_MS: u64 = 25;

pub(crate) fn run_event_loop(state: &mut EventLoopState, deps: &mut EventLoopDeps) {
    let tick_interval = Duration::from_millis(EVENT_LOOP_IDLE_MS);
    let input_rx = deps.input_rx.clone();
    let mut running = true;
    while running {
        let idle_guard = never::<GenerationMessage>();
        let generation_rx = state
            .generation
            .as_ref()
            .map(|job| job.receiver.clone());
        let generation_rx = generation_rx.as_ref().unwrap_or(&idle_guard);
        select! {
            recv(input_rx) -> event => match event {
                Ok(PageEvent::Pointer { target }) => handle_pointer_selector(state, deps, &target),
                Ok(PageEvent::Input { text }) => handle_input(state, deps, text),
                Ok(PageEvent::Close) => {
                    if state.overlay.is_visible() {
                        close_overlay(state, deps);
                    }
                }
                Ok(PageEvent::Exit) | Err(_) => running = false,
            },
            recv(generation_rx) -> message => {
                if let Some(job) = state.generation.take() {
                    job.join();
                }
                match message {
                    Ok(message) => apply_generation_message(state, deps, message),
                    Err(_) => log_debug("generation worker exited without a result"),
                }
            },
            default(tick_interval) => {}
        }
    }
}

fn handle_pointer_selector(state: &mut EventLoopState, deps: &mut EventLoopDeps, selector: &str) {
    match deps.page.resolve(selector) {
        Some(target) => handle_pointer(state, deps, target),
        None => log_debug(&format!("pointer target {selector} not on page")),
    }
}

/// Route one pointer press by target, the way the page-wide listener would.
pub(crate) fn handle_pointer(state: &mut EventLoopState, deps: &mut EventLoopDeps, target: NodeId) {
    // Trigger clicks open the overlay and never reach outside-click handling.
    if state.triggers.is_trigger(target) {
        if !state.overlay.is_visible() {
            match state.triggers.container_for(target) {
                Some(container) => open_overlay(state, deps, container),
                None => log_debug("trigger click with no registered container"),
            }
        }
        return;
    }

    // Presses inside the open overlay keep host focus and drive its actions.
    if state.overlay.is_visible() && deps.view.contains(&deps.page, target) {
        deps.detector
            .refocus(&mut deps.page, state.session.container());
        if deps.view.is_generate(target) {
            submit(state, deps);
        } else if deps.view.is_insert(target) {
            commit(state, deps);
        }
        return;
    }

    // Page-wide detection: anchor the container and install its trigger.
    if let Some(container) = deps.detector.observe_pointer(&mut deps.page, target) {
        state.session.anchor(container);
        ensure_trigger(&mut deps.page, &mut state.triggers, container, deps.icons);
    }

    // Anything else while open is an outside click.
    if state.overlay.is_visible() {
        close_overlay(state, deps);
    }
}

fn handle_input(state: &mut EventLoopState, deps: &mut EventLoopDeps, text: String) {
    deps.view.set_input(&mut deps.page, &text);
    state.overlay.input_value = text;
    if state.overlay.is_visible() {
        deps.detector
            .refocus(&mut deps.page, state.session.container());
    }
}

fn open_overlay(state: &mut EventLoopState, deps: &mut EventLoopDeps, container: NodeId) {
    state.session.anchor(container);
    state.overlay.phase = OverlayPhase::Idle;
    deps.view.show(&mut deps.page);
    deps.view
        .sync_controls(&mut deps.page, &state.overlay, deps.icons);
    deps.detector.refocus(&mut deps.page, Some(container));
    log_debug("overlay opened");
}

fn close_overlay(state: &mut EventLoopState, deps: &mut EventLoopDeps) {
    state.overlay.phase = OverlayPhase::Hidden;
    state.session.reset();
    deps.view.hide(&mut deps.page);
    log_debug("overlay closed");
}

/// Submit the input box content to the pipeline. Empty text and busy states
/// are rejected without transcript changes.
fn submit(state: &mut EventLoopState, deps: &mut EventLoopDeps) {
    if state.overlay.phase == OverlayPhase::Pending || state.generation.is_some() {
        log_debug("submission rejected: generation already in flight");
        return;
    }
    let prompt = state.overlay.input_value.trim().to_string();
    if prompt.is_empty() {
        log_debug("submission rejected: empty prompt");
        return;
    }

    state.overlay.push_user(prompt.clone());
    deps.view
        .append_entry(&mut deps.page, TranscriptRole::User, &prompt);
    state.overlay.phase = OverlayPhase::Pending;
    deps.view
        .sync_controls(&mut deps.page, &state.overlay, deps.icons);
    log_debug_content(&format!("prompt submitted: {prompt}"));

    let job = start_generation_job(deps.provider.clone(), prompt, state.session.epoch());
    state.generation = Some(job);
    state.generation_started_at = Some(Instant::now());
}

/// Apply one pipeline completion, or drop it when the session moved on.
pub(crate) fn apply_generation_message(
    state: &mut EventLoopState,
    deps: &mut EventLoopDeps,
    message: GenerationMessage,
) {
    if let Some(started) = state.generation_started_at.take() {
        log_debug(&format!(
            "timing|phase=generate|elapsed_ms={}",
            started.elapsed().as_millis()
        ));
    }
    if !state.session.accepts(message.epoch()) {
        log_debug("discarded generation result from a closed session");
        return;
    }
    match message {
        GenerationMessage::Draft { text, .. } => {
            state.overlay.push_assistant(text.clone());
            deps.view
                .append_entry(&mut deps.page, TranscriptRole::Assistant, &text);
            state.overlay.last_draft = Some(text);
            state.overlay.input_value.clear();
            deps.view.clear_input(&mut deps.page);
            state.overlay.insert_visible = true;
            state.overlay.phase = OverlayPhase::Ready;
        }
        GenerationMessage::Failed { message, .. } => {
            let text = format!("Reply generation failed: {message}");
            state.overlay.push_assistant(text.clone());
            deps.view
                .append_entry(&mut deps.page, TranscriptRole::Assistant, &text);
            state.overlay.phase = OverlayPhase::Idle;
        }
    }
    deps.view
        .sync_controls(&mut deps.page, &state.overlay, deps.icons);
}

/// Insert the reviewed draft into the anchored container, then close.
fn commit(state: &mut EventLoopState, deps: &mut EventLoopDeps) {
    let outcome = commit_draft(
        &mut deps.page,
        deps.detector.surface().profile(),
        state.session.container(),
        state.overlay.last_draft.as_deref(),
    );
    if outcome == CommitOutcome::Committed {
        state.overlay.insert_visible = false;
        deps.view
            .sync_controls(&mut deps.page, &state.overlay, deps.icons);
        close_overlay(state, deps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::TargetDetector;
    use crate::icons::SVG_ICONS;
    use crate::overlay::OverlayView;
    use crate::trigger::TRIGGER_CLASS;
    use anyhow::anyhow;
    use crossbeam_channel::{bounded, Sender};
    use replypad::host::{HostProfile, MessagingSurface};
    use replypad::page::Page;
    use replypad::{CannedReplyProvider, ReplyProvider};
    use std::sync::Arc;

    struct FailingProvider;

    impl ReplyProvider for FailingProvider {
        fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Err(anyhow!("backend unreachable"))
        }
    }

    struct Fixture {
        state: EventLoopState,
        deps: EventLoopDeps,
        field: NodeId,
        container: NodeId,
        outside: NodeId,
        input_tx: Sender<PageEvent>,
    }

    fn fixture_with(provider: Arc<dyn ReplyProvider>) -> Fixture {
        let profile = HostProfile::default();
        let mut page = Page::new();
        let wrapper = page.append_element(page.root(), "div");
        page.add_class(wrapper, &profile.content_wrapper_class);
        let container = page.append_element(wrapper, "div");
        page.add_class(container, &profile.container_classes[0]);
        page.set_attribute(container, &profile.aria_label_attr, "Write a message");
        let field = page.append_element(container, "div");
        page.add_class(field, &profile.field_class);
        let outside = page.append_element(page.root(), "div");

        let view = OverlayView::mount(&mut page, &SVG_ICONS);
        let detector = TargetDetector::new(MessagingSurface::new(profile, None));
        let (input_tx, input_rx) = bounded(16);
        Fixture {
            state: EventLoopState::new(),
            deps: EventLoopDeps {
                page,
                view,
                detector,
                provider,
                input_rx,
                icons: &SVG_ICONS,
            },
            field,
            container,
            outside,
            input_tx,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(Arc::new(CannedReplyProvider::new(
            "drafted reply",
            Duration::ZERO,
        )))
    }

    fn detect_and_open(fx: &mut Fixture) -> NodeId {
        handle_pointer(&mut fx.state, &mut fx.deps, fx.field);
        let trigger = fx
            .deps
            .page
            .find_class_in(fx.container, TRIGGER_CLASS)
            .expect("trigger injected");
        handle_pointer(&mut fx.state, &mut fx.deps, trigger);
        trigger
    }

    fn submit_text(fx: &mut Fixture, text: &str) {
        handle_input(&mut fx.state, &mut fx.deps, text.to_string());
        let generate = fx
            .deps
            .page
            .resolve("#reply-generate-btn")
            .expect("generate button");
        handle_pointer(&mut fx.state, &mut fx.deps, generate);
    }

    fn drain_generation(fx: &mut Fixture) {
        let job = fx.state.generation.take().expect("job outstanding");
        let message = job
            .receiver
            .recv_timeout(Duration::from_secs(2))
            .expect("generation message");
        job.join();
        apply_generation_message(&mut fx.state, &mut fx.deps, message);
    }

    #[test]
    fn detection_anchors_container_and_injects_trigger() {
        let mut fx = fixture();
        handle_pointer(&mut fx.state, &mut fx.deps, fx.field);
        assert_eq!(fx.state.session.container(), Some(fx.container));
        assert!(fx
            .deps
            .page
            .find_class_in(fx.container, TRIGGER_CLASS)
            .is_some());
        assert!(!fx.state.overlay.is_visible());
    }

    #[test]
    fn repeated_detection_keeps_one_trigger() {
        let mut fx = fixture();
        handle_pointer(&mut fx.state, &mut fx.deps, fx.field);
        handle_pointer(&mut fx.state, &mut fx.deps, fx.field);
        let triggers = fx
            .deps
            .page
            .children(fx.container)
            .iter()
            .filter(|&&child| fx.deps.page.has_class(child, TRIGGER_CLASS))
            .count();
        assert_eq!(triggers, 1);
    }

    #[test]
    fn detection_is_last_write_wins() {
        let mut fx = fixture();
        let profile = HostProfile::default();
        let second_container = fx.deps.page.append_element(fx.deps.page.root(), "div");
        fx.deps
            .page
            .add_class(second_container, &profile.container_classes[0]);
        let second_field = fx.deps.page.append_element(second_container, "div");
        fx.deps.page.add_class(second_field, &profile.field_class);

        handle_pointer(&mut fx.state, &mut fx.deps, fx.field);
        handle_pointer(&mut fx.state, &mut fx.deps, second_field);
        assert_eq!(fx.state.session.container(), Some(second_container));
    }

    #[test]
    fn trigger_click_opens_idle_overlay() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Idle);
        let root = fx.deps.page.resolve("#reply-overlay").expect("overlay");
        assert_eq!(fx.deps.page.style(root, "display").as_deref(), Some("flex"));
    }

    #[test]
    fn trigger_click_while_open_is_noop() {
        let mut fx = fixture();
        let trigger = detect_and_open(&mut fx);
        handle_pointer(&mut fx.state, &mut fx.deps, trigger);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Idle);
    }

    #[test]
    fn empty_submission_never_mutates_transcript_or_starts_job() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        submit_text(&mut fx, "   ");
        assert!(fx.state.overlay.transcript.is_empty());
        assert!(fx.state.generation.is_none());
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Idle);
    }

    #[test]
    fn submission_appends_user_entry_and_goes_pending() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Pending);
        assert_eq!(fx.state.overlay.transcript.len(), 1);
        assert_eq!(fx.state.overlay.transcript[0].role, TranscriptRole::User);
        assert_eq!(fx.state.overlay.transcript[0].text, "hello");
        assert!(fx.state.generation.is_some());
        let generate = fx.deps.page.resolve("#reply-generate-btn").expect("button");
        assert_eq!(
            fx.deps.page.attribute(generate, "disabled"),
            Some("true")
        );
    }

    #[test]
    fn resubmission_is_rejected_while_pending() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        submit_text(&mut fx, "again");
        assert_eq!(fx.state.overlay.transcript.len(), 1);
    }

    #[test]
    fn completed_generation_yields_one_user_and_one_assistant_entry() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        drain_generation(&mut fx);

        assert_eq!(fx.state.overlay.phase, OverlayPhase::Ready);
        assert_eq!(fx.state.overlay.transcript.len(), 2);
        assert_eq!(fx.state.overlay.transcript[0].role, TranscriptRole::User);
        assert_eq!(
            fx.state.overlay.transcript[1].role,
            TranscriptRole::Assistant
        );
        assert_eq!(fx.state.overlay.transcript[1].text, "drafted reply");
        assert_eq!(fx.state.overlay.last_draft.as_deref(), Some("drafted reply"));
        assert!(fx.state.overlay.insert_visible);
        assert!(fx.state.overlay.input_value.is_empty());
        let generate = fx.deps.page.resolve("#reply-generate-btn").expect("button");
        assert_eq!(fx.deps.page.text(generate), "Regenerate");
    }

    #[test]
    fn commit_writes_draft_and_hides_overlay() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        drain_generation(&mut fx);

        let insert = fx.deps.page.resolve("#reply-insert-btn").expect("button");
        handle_pointer(&mut fx.state, &mut fx.deps, insert);

        let slot = fx
            .deps
            .page
            .first_child_with_tag(fx.container, "p")
            .expect("committed paragraph");
        assert_eq!(fx.deps.page.text(slot), "drafted reply");
        assert_eq!(
            fx.deps.page.attribute(fx.container, "aria-label"),
            None
        );
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Hidden);
        assert!(!fx.state.overlay.insert_visible);
        let root = fx.deps.page.resolve("#reply-overlay").expect("overlay");
        assert_eq!(fx.deps.page.style(root, "display").as_deref(), Some("none"));
    }

    #[test]
    fn commit_without_draft_leaves_overlay_open() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        let insert = fx.deps.page.resolve("#reply-insert-btn").expect("button");
        handle_pointer(&mut fx.state, &mut fx.deps, insert);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Idle);
        assert!(fx
            .deps
            .page
            .first_child_with_tag(fx.container, "p")
            .is_none());
    }

    #[test]
    fn outside_click_closes_overlay() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        let outside = fx.outside;
        handle_pointer(&mut fx.state, &mut fx.deps, outside);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Hidden);
        assert_eq!(fx.state.session.container(), None);
    }

    #[test]
    fn close_while_pending_discards_late_result() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        let outside = fx.outside;
        handle_pointer(&mut fx.state, &mut fx.deps, outside);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Hidden);

        drain_generation(&mut fx);
        assert_eq!(fx.state.overlay.transcript.len(), 1);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Hidden);
        assert!(fx.state.overlay.last_draft.is_none());
        let root = fx.deps.page.resolve("#reply-overlay").expect("overlay");
        assert_eq!(fx.deps.page.style(root, "display").as_deref(), Some("none"));
    }

    #[test]
    fn stale_result_after_reopen_is_discarded() {
        let mut fx = fixture();
        let trigger = detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        let outside = fx.outside;
        handle_pointer(&mut fx.state, &mut fx.deps, outside);
        handle_pointer(&mut fx.state, &mut fx.deps, trigger);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Idle);

        drain_generation(&mut fx);
        assert_eq!(fx.state.overlay.transcript.len(), 1);
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Idle);
        assert!(fx.state.overlay.last_draft.is_none());
    }

    #[test]
    fn failed_generation_surfaces_error_and_returns_to_idle() {
        let mut fx = fixture_with(Arc::new(FailingProvider));
        detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        drain_generation(&mut fx);

        assert_eq!(fx.state.overlay.phase, OverlayPhase::Idle);
        assert_eq!(fx.state.overlay.transcript.len(), 2);
        assert_eq!(
            fx.state.overlay.transcript[1].role,
            TranscriptRole::Assistant
        );
        assert!(fx.state.overlay.transcript[1]
            .text
            .contains("backend unreachable"));
        assert!(!fx.state.overlay.insert_visible);
        assert!(fx.state.overlay.last_draft.is_none());
    }

    #[test]
    fn regenerate_runs_a_second_cycle() {
        let mut fx = fixture();
        detect_and_open(&mut fx);
        submit_text(&mut fx, "hello");
        drain_generation(&mut fx);
        submit_text(&mut fx, "make it warmer");
        assert_eq!(fx.state.overlay.phase, OverlayPhase::Pending);
        drain_generation(&mut fx);
        assert_eq!(fx.state.overlay.transcript.len(), 4);
        assert_eq!(fx.state.overlay.last_draft.as_deref(), Some("drafted reply"));
    }

    #[test]
    fn run_event_loop_exits_on_exit_event() {
        let mut fx = fixture();
        fx.input_tx
            .send(PageEvent::Exit)
            .expect("send exit");
        run_event_loop(&mut fx.state, &mut fx.deps);
    }

    #[test]
    fn run_event_loop_processes_scripted_cycle() {
        let mut fx = fixture();
        fx.deps.page.set_dom_id(fx.field, "demo-field");
        for event in [
            PageEvent::Pointer {
                target: "#demo-field".to_string(),
            },
            PageEvent::Pointer {
                target: ".reply-trigger".to_string(),
            },
            PageEvent::Input {
                text: "hello".to_string(),
            },
            PageEvent::Pointer {
                target: "#reply-generate-btn".to_string(),
            },
        ] {
            fx.input_tx.send(event).expect("send event");
        }
        // Give the zero-latency worker time to resolve, then commit and exit.
        std::thread::spawn({
            let tx = fx.input_tx.clone();
            move || {
                std::thread::sleep(Duration::from_millis(300));
                let _ = tx.send(PageEvent::Pointer {
                    target: "#reply-insert-btn".to_string(),
                });
                let _ = tx.send(PageEvent::Exit);
            }
        });
        run_event_loop(&mut fx.state, &mut fx.deps);

        let slot = fx
            .deps
            .page
            .first_child_with_tag(fx.container, "p")
            .expect("committed paragraph");
        assert_eq!(fx.deps.page.text(slot), "drafted reply");
        assert_eq!(fx.state.overlay.transcript.len(), 2);
    }
}
