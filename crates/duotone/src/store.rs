//! The variable-store model and the host seam.
//!
//! [`VariableStore`] abstracts a design tool's local variable API:
//! collections that own modes, and variables that carry one value per
//! mode. The generator speaks only to this trait, so the same code runs
//! against [`MemoryStore`](crate::MemoryStore) in tests and against a
//! thin adapter over the real host in a plugin.
//!
//! Host calls are asynchronous and each one can fail; mutations are
//! applied one at a time with no transaction around them. The reconciler
//! is written for exactly that contract.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Rgba;

/// Name hosts give the single mode of a freshly created collection.
pub const DEFAULT_MODE_NAME: &str = "Mode 1";

/// Identifier of a [`VariableCollection`], assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionId(pub String);

impl CollectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a [`Mode`] within a collection, assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeId(pub String);

impl ModeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a [`Variable`], assigned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub String);

impl VariableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One mode of a collection, e.g. `Ocean/Light`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    pub id: ModeId,
    pub name: String,
}

/// A named group of variables sharing a set of modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableCollection {
    pub id: CollectionId,
    pub name: String,
    /// Modes in host order. The host's "first" and "second" mode are
    /// meaningful to mode resolution, so order is preserved.
    pub modes: Vec<Mode>,
}

impl VariableCollection {
    /// The mode with the given id, if the collection has it.
    #[must_use]
    pub fn mode(&self, id: &ModeId) -> Option<&Mode> {
        self.modes.iter().find(|mode| &mode.id == id)
    }

    /// The mode with the given name, if the collection has it.
    #[must_use]
    pub fn mode_named(&self, name: &str) -> Option<&Mode> {
        self.modes.iter().find(|mode| mode.name == name)
    }
}

/// The value a variable holds in one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VariableValue {
    /// A concrete color.
    Color(Rgba),
    /// A reference to another variable; the value is whatever that
    /// variable holds.
    Alias { id: VariableId },
}

impl VariableValue {
    /// The concrete color, if this value is not an alias.
    #[must_use]
    pub fn as_color(&self) -> Option<Rgba> {
        match self {
            Self::Color(color) => Some(*color),
            Self::Alias { .. } => None,
        }
    }

    /// Whether this value points at another variable.
    #[must_use]
    pub const fn is_alias(&self) -> bool {
        matches!(self, Self::Alias { .. })
    }
}

/// A color variable: one value per mode of its collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub id: VariableId,
    pub name: String,
    pub collection: CollectionId,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub values_by_mode: BTreeMap<ModeId, VariableValue>,
}

impl Variable {
    /// The value this variable holds in the given mode.
    #[must_use]
    pub fn value_for(&self, mode: &ModeId) -> Option<&VariableValue> {
        self.values_by_mode.get(mode)
    }

    /// The first value in mode-id order, used as a fallback when the
    /// requested mode holds none.
    #[must_use]
    pub fn first_value(&self) -> Option<(&ModeId, &VariableValue)> {
        self.values_by_mode.iter().next()
    }
}

/// Error produced by a [`VariableStore`] operation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No collection with the given id.
    #[error("unknown collection: {0}")]
    UnknownCollection(CollectionId),
    /// No variable with the given id.
    #[error("unknown variable: {0}")]
    UnknownVariable(VariableId),
    /// The mode does not belong to the collection being addressed.
    #[error("unknown mode {mode} in collection {collection}")]
    UnknownMode {
        collection: CollectionId,
        mode: ModeId,
    },
    /// A variable with the same name already exists in the collection.
    #[error("variable {name:?} already exists in collection {collection}")]
    DuplicateVariable {
        collection: CollectionId,
        name: String,
    },
    /// The host rejected or failed the call for its own reasons, e.g. a
    /// plan limit on modes.
    #[error("host call failed: {0}")]
    Host(String),
}

/// The host seam: everything the generator needs from a variable store.
///
/// Implementations must tolerate interleaved calls arriving from a single
/// logical task; [`MemoryStore`](crate::MemoryStore) is the reference
/// implementation.
#[async_trait]
pub trait VariableStore: Send + Sync {
    /// All collections, in host order.
    async fn collections(&self) -> Result<Vec<VariableCollection>, StoreError>;

    /// The collection with the given id, or `None` if it does not exist.
    ///
    /// The default implementation scans [`collections`](Self::collections);
    /// hosts with a direct lookup should override it.
    async fn collection(&self, id: &CollectionId) -> Result<Option<VariableCollection>, StoreError> {
        Ok(self
            .collections()
            .await?
            .into_iter()
            .find(|collection| &collection.id == id))
    }

    /// All color variables across every collection.
    async fn variables(&self) -> Result<Vec<Variable>, StoreError>;

    /// The variables belonging to one collection.
    ///
    /// The default implementation filters [`variables`](Self::variables).
    async fn variables_in(&self, collection: &CollectionId) -> Result<Vec<Variable>, StoreError> {
        Ok(self
            .variables()
            .await?
            .into_iter()
            .filter(|variable| &variable.collection == collection)
            .collect())
    }

    /// Creates a collection. It arrives with a single mode named
    /// [`DEFAULT_MODE_NAME`].
    async fn create_collection(&self, name: &str) -> Result<VariableCollection, StoreError>;

    /// Renames an existing collection.
    async fn rename_collection(&self, id: &CollectionId, name: &str) -> Result<(), StoreError>;

    /// Adds a mode to a collection and returns its id.
    ///
    /// Hosts that cap the number of modes surface that as
    /// [`StoreError::Host`].
    async fn add_mode(&self, collection: &CollectionId, name: &str) -> Result<ModeId, StoreError>;

    /// Renames an existing mode of a collection.
    async fn rename_mode(
        &self,
        collection: &CollectionId,
        mode: &ModeId,
        name: &str,
    ) -> Result<(), StoreError>;

    /// Creates a color variable in a collection. The new variable starts
    /// with an empty description and no per-mode values.
    async fn create_color_variable(
        &self,
        name: &str,
        collection: &CollectionId,
    ) -> Result<Variable, StoreError>;

    /// Sets a variable's value for one mode of its collection.
    async fn set_value(
        &self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<(), StoreError>;

    /// Replaces a variable's description.
    async fn set_description(&self, variable: &VariableId, description: &str)
        -> Result<(), StoreError>;
}
