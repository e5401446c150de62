//! The token catalog: every color variable the generator manages.
//!
//! Token names are slash-separated paths (`namespace/group/token`) so that
//! hosts which render variable names as folders group them sensibly. The
//! catalog is fixed: generation always writes exactly these tokens, and
//! updates recreate any of them that have gone missing.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Alpha applied to the shadow and overlay tokens in both modes.
///
/// These two tokens are translucent by construction. Whatever base color a
/// recipe supplies, their written value carries this opacity.
pub const TRANSLUCENT_ALPHA: f64 = 0.2;

/// Token whose Light-mode value seeds the primary picker when a
/// collection is loaded for update.
pub const SEED_PRIMARY: &str = "accent/primary/primary";
/// Token whose Light-mode value seeds the secondary picker.
pub const SEED_SECONDARY: &str = "accent/secondary/secondary";
/// Token whose Light-mode value seeds the tertiary picker.
pub const SEED_TERTIARY: &str = "accent/tertiary/tertiary";

/// Metadata for one token in the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenInfo {
    /// Full slash-separated name, e.g. `"accent/primary/primary"`.
    pub name: &'static str,
    /// Description written onto the variable so pickers can explain it.
    pub description: &'static str,
    /// Fixed alpha forced onto this token's value in both modes, if the
    /// token is translucent by construction.
    pub alpha: Option<f64>,
}

impl TokenInfo {
    /// The top-level namespace of the token (`"accent"`, `"base"` or
    /// `"feedback"`).
    #[must_use]
    pub fn namespace(&self) -> &'static str {
        self.name.split('/').next().unwrap_or(self.name)
    }
}

const fn token(name: &'static str, description: &'static str) -> TokenInfo {
    TokenInfo {
        name,
        description,
        alpha: None,
    }
}

const fn translucent(name: &'static str, description: &'static str) -> TokenInfo {
    TokenInfo {
        name,
        description,
        alpha: Some(TRANSLUCENT_ALPHA),
    }
}

/// Every token the generator writes, in creation order.
pub static CATALOG: [TokenInfo; 33] = [
    token(
        "accent/primary/primary",
        "The primary brand color, used for key interactive elements such as buttons and active states.",
    ),
    token(
        "accent/primary/on-primary",
        "Text and icons placed on top of the primary color.",
    ),
    token(
        "accent/primary/primary-container",
        "A tinted container color derived from the primary color, for banners and highlighted regions.",
    ),
    token(
        "accent/primary/on-primary-container",
        "Text and icons placed on top of the primary-container color.",
    ),
    token(
        "accent/secondary/secondary",
        "An accent color for less prominent components that still need attention, such as filter chips and secondary buttons.",
    ),
    token(
        "accent/secondary/on-secondary",
        "Text and icons placed on top of the secondary color.",
    ),
    token(
        "accent/secondary/secondary-container",
        "A tinted container color derived from the secondary color.",
    ),
    token(
        "accent/secondary/on-secondary-container",
        "Text and icons placed on top of the secondary-container color.",
    ),
    token(
        "accent/tertiary/tertiary",
        "A tertiary accent color for lower-priority highlights.",
    ),
    token(
        "accent/tertiary/on-tertiary",
        "Text and icons placed on top of the tertiary color.",
    ),
    token(
        "accent/tertiary/tertiary-container",
        "A tinted container color derived from the tertiary color.",
    ),
    token(
        "accent/tertiary/on-tertiary-container",
        "Text and icons placed on top of the tertiary-container color.",
    ),
    token(
        "base/surface/surface-lowest",
        "The lowest surface layer, typically the main page background.",
    ),
    token(
        "base/surface/surface",
        "The default surface color for components such as cards, dialogs and menus.",
    ),
    token(
        "base/surface/surface-variant",
        "A slightly emphasized surface color, often used for input backgrounds.",
    ),
    token(
        "base/surface/on-surface",
        "The primary color for text and icons on any surface color.",
    ),
    token(
        "base/surface/on-surface-variant",
        "A muted color for secondary text, placeholders and disabled states.",
    ),
    token(
        "base/other/outline",
        "The default border color for components that need visual separation, such as inputs and outlined buttons.",
    ),
    token(
        "base/other/outline-variant",
        "A subtle border color for decorative separation, such as dividers.",
    ),
    translucent(
        "base/other/shadow",
        "The color used for drop shadows to convey elevation.",
    ),
    translucent(
        "base/other/overlay",
        "The color of the backdrop that dims the rest of the UI while a modal or drawer is open.",
    ),
    token(
        "feedback/error/error",
        "The color used to signal error states.",
    ),
    token(
        "feedback/error/on-error",
        "Text and icons placed on top of the error color.",
    ),
    token(
        "feedback/error/error-container",
        "A tinted container color for error hints, such as the background of an error banner.",
    ),
    token(
        "feedback/error/on-error-container",
        "Text and icons placed on top of the error-container color.",
    ),
    token(
        "feedback/success/success",
        "The color used to signal success states.",
    ),
    token(
        "feedback/success/on-success",
        "Text and icons placed on top of the success color.",
    ),
    token(
        "feedback/success/success-container",
        "A tinted container color for success hints.",
    ),
    token(
        "feedback/success/on-success-container",
        "Text and icons placed on top of the success-container color.",
    ),
    token(
        "feedback/info/info",
        "The color used to signal informational hints.",
    ),
    token(
        "feedback/info/on-info",
        "Text and icons placed on top of the info color.",
    ),
    token(
        "feedback/info/info-container",
        "A tinted container color for informational hints.",
    ),
    token(
        "feedback/info/on-info-container",
        "Text and icons placed on top of the info-container color.",
    ),
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static TokenInfo>> =
    LazyLock::new(|| CATALOG.iter().map(|info| (info.name, info)).collect());

/// Looks up a catalog token by its full name.
#[must_use]
pub fn find(name: &str) -> Option<&'static TokenInfo> {
    BY_NAME.get(name).copied()
}

/// The names of every catalog token, in creation order.
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|info| info.name)
}
