//! Replypad entrypoint so the host page, overlay, and pipeline run as one
//! session.
//!
//! Builds a sample messaging page, replays a scripted interaction against
//! it, and prints the resulting transcript and field content.
//!
//! # Architecture
//!
//! - Script thread: replays pointer/typing events the way real input would
//! - Generation worker: produces one draft per submission off the loop
//! - Event loop: routes events through the overlay state machine

mod committer;
mod config;
mod detector;
mod event_loop;
mod event_state;
mod icons;
mod input;
mod overlay;
mod session;
mod trigger;

use anyhow::Result;
use crossbeam_channel::bounded;
use std::panic;
use std::sync::Arc;
use std::time::Duration;

use replypad::host::{HostProfile, MessagingSurface};
use replypad::page::{NodeId, Page};
use replypad::{
    init_logging, init_tracing, log_panic, CannedReplyProvider, ReplyProvider,
};

use crate::config::OverlayConfig;
use crate::detector::TargetDetector;
use crate::event_loop::run_event_loop;
use crate::event_state::{EventLoopDeps, EventLoopState};
use crate::icons::get_icons;
use crate::input::{spawn_script_thread, PageEvent, ScriptStep};
use crate::overlay::OverlayView;

/// Max pending input events before backpressure.
const INPUT_CHANNEL_CAPACITY: usize = 256;

/// DOM id given to the sample page's editable field so scripts can hit it.
const FIELD_DOM_ID: &str = "demo-field";

/// Margin added to the configured latency before the script moves on.
const SETTLE_MARGIN_MS: u64 = 200;

fn main() -> Result<()> {
    let config = OverlayConfig::parse_validated()?;
    init_logging(&config.app);
    init_tracing(&config.app);
    panic::set_hook(Box::new(|info| log_panic(info)));

    let profile = config.resolve_profile()?;
    let field_regex = config.resolve_field_regex()?;
    let icons = get_icons(config.glyph_icons);

    let mut page = Page::new();
    let field = build_sample_page(&mut page, &profile);
    page.set_dom_id(field, FIELD_DOM_ID);
    let view = OverlayView::mount(&mut page, icons);

    let detector = TargetDetector::new(MessagingSurface::new(profile, field_regex));
    let provider: Arc<dyn ReplyProvider> = Arc::new(CannedReplyProvider::new(
        config.app.canned_reply.clone(),
        config.app.reply_latency(),
    ));

    let (input_tx, input_rx) = bounded(INPUT_CHANNEL_CAPACITY);
    let script = if config.close_early {
        close_early_script(&config)
    } else {
        insert_script(&config)
    };
    let script_handle = spawn_script_thread(script, input_tx);

    let mut state = EventLoopState::new();
    let mut deps = EventLoopDeps {
        page,
        view,
        detector,
        provider,
        input_rx,
        icons,
    };
    run_event_loop(&mut state, &mut deps);
    let _ = script_handle.join();

    print_session_summary(&state, &deps)
}

/// Build the messaging markup the default profile expects: a content
/// wrapper around a labelled container around the editable field.
fn build_sample_page(page: &mut Page, profile: &HostProfile) -> NodeId {
    let wrapper = page.append_element(page.root(), "div");
    page.add_class(wrapper, &profile.content_wrapper_class);
    let container = page.append_element(wrapper, "div");
    let container_class = profile
        .container_classes
        .first()
        .cloned()
        .unwrap_or_else(|| profile.field_class.clone());
    page.add_class(container, &container_class);
    page.set_attribute(container, &profile.aria_label_attr, "Write a message");
    let field = page.append_element(container, "div");
    page.add_class(field, &profile.field_class);
    field
}

fn pointer(target: &str) -> PageEvent {
    PageEvent::Pointer {
        target: target.to_string(),
    }
}

fn settle_delay(config: &OverlayConfig) -> Duration {
    config.app.reply_latency() + Duration::from_millis(SETTLE_MARGIN_MS)
}

/// Happy path: detect, open, generate, wait out the latency, insert.
fn insert_script(config: &OverlayConfig) -> Vec<ScriptStep> {
    let step = config.step_delay();
    vec![
        ScriptStep::new(step, pointer("#demo-field")),
        ScriptStep::new(step, pointer(".reply-trigger")),
        ScriptStep::new(
            step,
            PageEvent::Input {
                text: "Thanks for reaching out about the role".to_string(),
            },
        ),
        ScriptStep::new(step, pointer("#reply-generate-btn")),
        ScriptStep::new(settle_delay(config), pointer("#reply-insert-btn")),
        ScriptStep::new(step, PageEvent::Exit),
    ]
}

/// Stale-result walkthrough: close while the pipeline is still working,
/// then linger long enough for the late result to arrive and be dropped.
fn close_early_script(config: &OverlayConfig) -> Vec<ScriptStep> {
    let step = config.step_delay();
    vec![
        ScriptStep::new(step, pointer("#demo-field")),
        ScriptStep::new(step, pointer(".reply-trigger")),
        ScriptStep::new(
            step,
            PageEvent::Input {
                text: "Thanks for reaching out about the role".to_string(),
            },
        ),
        ScriptStep::new(step, pointer("#reply-generate-btn")),
        ScriptStep::new(step, PageEvent::Close),
        ScriptStep::new(settle_delay(config), PageEvent::Exit),
    ]
}

fn print_session_summary(state: &EventLoopState, deps: &EventLoopDeps) -> Result<()> {
    let transcript = serde_json::to_string_pretty(&state.overlay.transcript)?;
    println!("session transcript:");
    println!("{transcript}");

    let profile = deps.detector.surface().profile();
    let committed = deps
        .page
        .find_dom_id(FIELD_DOM_ID)
        .and_then(|field| deps.page.parent(field))
        .and_then(|container| deps.page.first_child_with_tag(container, &profile.text_tag))
        .map(|slot| deps.page.text(slot).to_string());
    match committed {
        Some(text) if !text.is_empty() => println!("field content: {text}"),
        _ => println!("field content: (unchanged)"),
    }
    Ok(())
}
