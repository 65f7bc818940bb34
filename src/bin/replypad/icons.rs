//! Icon vocabulary for the overlay affordances.
//!
//! Assets are referenced by stable identifier so a bundler can swap the
//! whole set without touching the overlay wiring.

/// The four affordance icons the overlay consumes.
#[derive(Debug, Clone, Copy)]
pub struct IconSet {
    /// Trigger affordance injected into the message container
    pub edit: &'static str,
    /// Insert/commit button
    pub insert: &'static str,
    /// Generate button while idle
    pub generate: &'static str,
    /// Generate button once a draft exists
    pub regenerate: &'static str,
}

/// Bundled SVG asset identifiers, the default set.
pub static SVG_ICONS: IconSet = IconSet {
    edit: "assets/edit.svg",
    insert: "assets/insert.svg",
    generate: "assets/generate.svg",
    regenerate: "assets/regenerate.svg",
};

/// Glyph fallbacks for surfaces that render text instead of images.
pub static GLYPH_ICONS: IconSet = IconSet {
    edit: "✎",
    insert: "⤵",
    generate: "✦",
    regenerate: "↻",
};

/// Select the icon set to wire into the overlay.
pub fn get_icons(glyphs: bool) -> &'static IconSet {
    if glyphs {
        &GLYPH_ICONS
    } else {
        &SVG_ICONS
    }
}
