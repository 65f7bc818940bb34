//! Overlay phases and session transcript, one source of truth for rendering.

use serde::Serialize;

/// Where the overlay is in the generate → review → insert workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum OverlayPhase {
    /// Not shown; initial and terminal between sessions.
    #[default]
    Hidden,
    /// Visible, waiting for a prompt.
    Idle,
    /// Visible, generation in flight; resubmission disabled.
    Pending,
    /// Visible with a draft ready to insert.
    Ready,
}

impl OverlayPhase {
    /// Label shown on the generate button in this phase.
    pub(crate) fn generate_label(self) -> &'static str {
        match self {
            OverlayPhase::Pending => "Loading...",
            OverlayPhase::Ready => "Regenerate",
            OverlayPhase::Hidden | OverlayPhase::Idle => "Generate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum TranscriptRole {
    User,
    Assistant,
}

/// One exchange line shown in the overlay for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct TranscriptEntry {
    pub role: TranscriptRole,
    pub text: String,
}

/// Everything the overlay knows that outlives a single render.
#[derive(Debug, Default)]
pub(crate) struct OverlayState {
    pub phase: OverlayPhase,
    /// Append-only; never cleared while the page lives.
    pub transcript: Vec<TranscriptEntry>,
    /// Current value of the overlay input box.
    pub input_value: String,
    /// Most recent completed draft; overwritten, never accumulated.
    pub last_draft: Option<String>,
    /// Whether the insert affordance is showing.
    pub insert_visible: bool,
}

impl OverlayState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.phase != OverlayPhase::Hidden
    }

    pub(crate) fn push_user(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role: TranscriptRole::User,
            text: text.into(),
        });
    }

    pub(crate) fn push_assistant(&mut self, text: impl Into<String>) {
        self.transcript.push(TranscriptEntry {
            role: TranscriptRole::Assistant,
            text: text.into(),
        });
    }
}
