//! Resolving a collection's Light and Dark modes, and reading token
//! values out of them.
//!
//! Collections produced by this crate always carry canonically named
//! modes (`<theme>/Light`, `<theme>/Dark`), but updates must also cope
//! with collections made by hand or by other tools. [`resolve_modes`]
//! decides which existing mode plays which role; [`ValueResolver`] reads
//! the color a token shows in one mode, following a single alias link.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

use crate::color::Rgba;
use crate::store::{CollectionId, ModeId, Variable, VariableCollection, VariableId, VariableValue};

/// The two faces of a generated theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// The mode-name suffix, including the separating slash.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Light => "/Light",
            Self::Dark => "/Dark",
        }
    }

    /// The canonical mode name for a theme, e.g. `Ocean/Light`.
    #[must_use]
    pub fn qualified_name(self, theme: &str) -> String {
        format!("{theme}{}", self.suffix())
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        })
    }
}

/// The mode ids resolved for the two faces of one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModePair {
    pub light: ModeId,
    pub dark: ModeId,
}

/// Error produced when modes or token values cannot be resolved.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// Neither naming nor position identified both modes.
    #[error("could not determine Light and Dark modes of collection {collection:?}")]
    ModesUnavailable { collection: String },
    /// Light and Dark collapsed onto the only mode the collection has.
    #[error("collection {collection:?} has a single mode; Light and Dark need two")]
    SingleMode { collection: String },
    /// The token has no variable in the collection.
    #[error("variable {token:?} not found")]
    VariableNotFound { token: String },
    /// The variable exists but holds no value in any mode.
    #[error("variable {token:?} has no value in any mode")]
    NoValues { token: String },
    /// An alias points at a variable that does not exist.
    #[error("alias target {target} does not exist")]
    UnknownAliasTarget { target: VariableId },
    /// The alias target exists but holds no value in any mode.
    #[error("alias target {target:?} has no value in any mode")]
    AliasTargetEmpty { target: String },
    /// The value was still an alias after following one link.
    #[error("variable {token:?} aliases another alias; chains are not followed")]
    NestedAlias { token: String },
}

/// Determines which mode of `collection` is Light and which is Dark.
///
/// Each face is matched by name first (the exact `<theme>/Light` or
/// `<theme>/Dark` name, then any name with the right suffix), and by
/// position as a last resort: the first mode plays Light, the second
/// plays Dark. When both faces land on the same mode, the second mode is
/// taken for Dark, so a collection whose modes are still named `Mode 1`
/// and `Mode 2` resolves sensibly.
///
/// # Errors
///
/// Returns [`ResolveError::ModesUnavailable`] when a face cannot be
/// matched at all, and [`ResolveError::SingleMode`] when both faces
/// collapse onto the only mode there is.
pub fn resolve_modes(
    collection: &VariableCollection,
    theme_name: &str,
) -> Result<ModePair, ResolveError> {
    let face = |mode: ThemeMode| {
        collection
            .mode_named(&mode.qualified_name(theme_name))
            .or_else(|| {
                collection
                    .modes
                    .iter()
                    .find(|candidate| candidate.name.ends_with(mode.suffix()))
            })
    };

    let light = face(ThemeMode::Light).or_else(|| collection.modes.first());
    let dark = face(ThemeMode::Dark).or_else(|| collection.modes.get(1));

    let (Some(light), Some(dark)) = (light, dark) else {
        return Err(ResolveError::ModesUnavailable {
            collection: collection.name.clone(),
        });
    };

    if light.id == dark.id {
        let Some(second) = collection.modes.get(1) else {
            return Err(ResolveError::SingleMode {
                collection: collection.name.clone(),
            });
        };
        debug!(
            collection = %collection.name,
            mode = %second.name,
            "light and dark matched the same mode, taking the second mode as dark"
        );
        return Ok(ModePair {
            light: light.id.clone(),
            dark: second.id.clone(),
        });
    }

    Ok(ModePair {
        light: light.id.clone(),
        dark: dark.id.clone(),
    })
}

/// Reads the colors tokens show in one collection.
///
/// Built over the full variable set because alias links may point at
/// variables outside the collection being read.
pub struct ValueResolver<'a> {
    scope: Vec<&'a Variable>,
    by_id: HashMap<&'a VariableId, &'a Variable>,
}

impl<'a> ValueResolver<'a> {
    /// Builds a resolver scoped to `collection` over `all` variables.
    #[must_use]
    pub fn new(all: &'a [Variable], collection: &CollectionId) -> Self {
        Self {
            scope: all
                .iter()
                .filter(|variable| &variable.collection == collection)
                .collect(),
            by_id: all.iter().map(|variable| (&variable.id, variable)).collect(),
        }
    }

    /// Resolves the color the named token shows in `mode`.
    ///
    /// When the variable holds no value for `mode`, its first available
    /// value stands in, with a warning. A single alias link is followed,
    /// again preferring `mode` over the target's first available value.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the token has no variable, the
    /// variable (or its alias target) holds no values, the alias target
    /// is missing, or the value is an alias of an alias.
    pub fn resolve(&self, token: &str, mode: &ModeId) -> Result<Rgba, ResolveError> {
        let variable = self
            .scope
            .iter()
            .find(|candidate| candidate.name == token)
            .ok_or_else(|| ResolveError::VariableNotFound {
                token: token.to_owned(),
            })?;

        let value = match variable.value_for(mode) {
            Some(value) => value,
            None => {
                warn!(token, mode = %mode, "no value for requested mode, using first available");
                let (_, value) = variable.first_value().ok_or_else(|| ResolveError::NoValues {
                    token: token.to_owned(),
                })?;
                value
            }
        };

        let value = if let VariableValue::Alias { id } = value {
            let target =
                self.by_id
                    .get(id)
                    .copied()
                    .ok_or_else(|| ResolveError::UnknownAliasTarget {
                        target: id.clone(),
                    })?;
            target
                .value_for(mode)
                .or_else(|| target.first_value().map(|(_, value)| value))
                .ok_or_else(|| ResolveError::AliasTargetEmpty {
                    target: target.name.clone(),
                })?
        } else {
            value
        };

        match value {
            VariableValue::Color(color) => Ok(*color),
            VariableValue::Alias { .. } => Err(ResolveError::NestedAlias {
                token: token.to_owned(),
            }),
        }
    }
}
