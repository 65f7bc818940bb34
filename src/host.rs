//! Host page selector profile and the surface capability the overlay uses.
//!
//! The overlay never walks host markup directly; it goes through
//! [`HostSurface`] so the interaction machine can run against any page that
//! provides the same shape, including the fakes used in tests.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::page::{NodeId, Page};

/// Selector profile for one host page family. Loadable from YAML so a
/// markup change on the host side is a config edit, not a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HostProfile {
    /// Class carried by the editable message field.
    pub field_class: String,
    /// Candidate container classes, most specific first.
    pub container_classes: Vec<String>,
    /// Class of the content wrapper enclosing the container.
    pub content_wrapper_class: String,
    /// Class the host toggles on the wrapper when a composer is active.
    pub active_class: String,
    /// Attribute the host sets on the container while it has focus.
    pub focused_attr: String,
    /// Accessibility label attribute cleared on insert.
    pub aria_label_attr: String,
    /// Tag of the text-bearing child drafts are written into.
    pub text_tag: String,
}

impl Default for HostProfile {
    fn default() -> Self {
        Self {
            field_class: "msg-form__contenteditable".to_string(),
            container_classes: vec![
                "msg-form__container".to_string(),
                "msg-form__contenteditable".to_string(),
            ],
            content_wrapper_class: "msg-form_msg-content-container".to_string(),
            active_class: "msg-form_msg-content-container--is-active".to_string(),
            focused_attr: "data-artdeco-is-focused".to_string(),
            aria_label_attr: "aria-label".to_string(),
            text_tag: "p".to_string(),
        }
    }
}

impl HostProfile {
    pub fn from_yaml(source: &str) -> Result<Self> {
        serde_yaml::from_str(source).context("failed to parse host profile YAML")
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read host profile {}", path.display()))?;
        Self::from_yaml(&source)
    }
}

/// What the overlay needs from a host page, and nothing more.
pub trait HostSurface {
    /// Resolve the editable field at or above `target`, if any.
    fn locate_field(&self, page: &Page, target: NodeId) -> Option<NodeId>;
    /// Resolve the stable container anchoring `field`.
    fn locate_container(&self, page: &Page, field: NodeId) -> Option<NodeId>;
    /// Resolve the content wrapper enclosing `container`, if present.
    fn locate_content_wrapper(&self, page: &Page, container: NodeId) -> Option<NodeId>;
    /// Mark the wrapper active the way the host itself would.
    fn set_active_state(&self, page: &mut Page, wrapper: NodeId);
    /// Mark the container focused the way the host itself would.
    fn set_focused_state(&self, page: &mut Page, container: NodeId);
}

/// [`HostSurface`] over the in-process page model, driven by a profile plus
/// an optional regex override for the field selector.
pub struct MessagingSurface {
    profile: HostProfile,
    field_regex: Option<Regex>,
}

impl MessagingSurface {
    pub fn new(profile: HostProfile, field_regex: Option<Regex>) -> Self {
        Self {
            profile,
            field_regex,
        }
    }

    pub fn profile(&self) -> &HostProfile {
        &self.profile
    }

    fn is_field(&self, page: &Page, id: NodeId) -> bool {
        if page.has_class(id, &self.profile.field_class) {
            return true;
        }
        match &self.field_regex {
            Some(regex) => page.classes(id).iter().any(|class| regex.is_match(class)),
            None => false,
        }
    }
}

impl HostSurface for MessagingSurface {
    fn locate_field(&self, page: &Page, target: NodeId) -> Option<NodeId> {
        page.closest_by(target, |page, id| self.is_field(page, id))
    }

    fn locate_container(&self, page: &Page, field: NodeId) -> Option<NodeId> {
        for class in &self.profile.container_classes {
            if let Some(container) = page.closest_class(field, class) {
                return Some(container);
            }
        }
        // No richer ancestor: the field itself anchors the trigger.
        Some(field)
    }

    fn locate_content_wrapper(&self, page: &Page, container: NodeId) -> Option<NodeId> {
        page.closest_class(container, &self.profile.content_wrapper_class)
    }

    fn set_active_state(&self, page: &mut Page, wrapper: NodeId) {
        page.add_class(wrapper, &self.profile.active_class);
    }

    fn set_focused_state(&self, page: &mut Page, container: NodeId) {
        page.set_attribute(container, &self.profile.focused_attr, "true");
    }
}
