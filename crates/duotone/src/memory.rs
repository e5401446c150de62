//! An in-memory [`VariableStore`].
//!
//! Backs tests and demos with the observable behavior the generator
//! expects from a real host: new collections arrive with one default
//! mode, duplicate variable names within a collection are rejected, and
//! values can only be written for modes the owning collection has.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::store::{
    CollectionId, Mode, ModeId, StoreError, Variable, VariableCollection, VariableId,
    VariableStore, VariableValue, DEFAULT_MODE_NAME,
};

/// An in-memory variable store with host-like semantics.
///
/// Ids come from a single monotonic counter, so no two entities ever
/// share one regardless of kind.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    collections: Vec<VariableCollection>,
    variables: Vec<Variable>,
    next_id: u64,
}

impl Inner {
    fn next(&mut self, kind: &str) -> String {
        self.next_id += 1;
        format!("{kind}:{}", self.next_id)
    }

    fn collection_mut(&mut self, id: &CollectionId) -> Result<&mut VariableCollection, StoreError> {
        self.collections
            .iter_mut()
            .find(|collection| &collection.id == id)
            .ok_or_else(|| StoreError::UnknownCollection(id.clone()))
    }

    fn variable_mut(&mut self, id: &VariableId) -> Result<&mut Variable, StoreError> {
        self.variables
            .iter_mut()
            .find(|variable| &variable.id == id)
            .ok_or_else(|| StoreError::UnknownVariable(id.clone()))
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collection with the given name, if any.
    #[must_use]
    pub fn collection_named(&self, name: &str) -> Option<VariableCollection> {
        self.inner
            .read()
            .collections
            .iter()
            .find(|collection| collection.name == name)
            .cloned()
    }

    /// Snapshot of the variable with the given id, if any.
    #[must_use]
    pub fn variable(&self, id: &VariableId) -> Option<Variable> {
        self.inner
            .read()
            .variables
            .iter()
            .find(|variable| &variable.id == id)
            .cloned()
    }

    /// Snapshot of the named variable within one collection, if any.
    #[must_use]
    pub fn variable_named(&self, collection: &CollectionId, name: &str) -> Option<Variable> {
        self.inner
            .read()
            .variables
            .iter()
            .find(|variable| &variable.collection == collection && variable.name == name)
            .cloned()
    }
}

#[async_trait]
impl VariableStore for MemoryStore {
    async fn collections(&self) -> Result<Vec<VariableCollection>, StoreError> {
        Ok(self.inner.read().collections.clone())
    }

    async fn variables(&self) -> Result<Vec<Variable>, StoreError> {
        Ok(self.inner.read().variables.clone())
    }

    async fn create_collection(&self, name: &str) -> Result<VariableCollection, StoreError> {
        let mut inner = self.inner.write();
        let id = CollectionId::new(inner.next("collection"));
        let default_mode = Mode {
            id: ModeId::new(inner.next("mode")),
            name: DEFAULT_MODE_NAME.to_string(),
        };
        let collection = VariableCollection {
            id,
            name: name.to_string(),
            modes: vec![default_mode],
        };
        inner.collections.push(collection.clone());
        Ok(collection)
    }

    async fn rename_collection(&self, id: &CollectionId, name: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.collection_mut(id)?.name = name.to_string();
        Ok(())
    }

    async fn add_mode(&self, collection: &CollectionId, name: &str) -> Result<ModeId, StoreError> {
        let mut inner = self.inner.write();
        inner.collection_mut(collection)?;
        let id = ModeId::new(inner.next("mode"));
        inner.collection_mut(collection)?.modes.push(Mode {
            id: id.clone(),
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn rename_mode(
        &self,
        collection: &CollectionId,
        mode: &ModeId,
        name: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let target = inner
            .collection_mut(collection)?
            .modes
            .iter_mut()
            .find(|candidate| &candidate.id == mode)
            .ok_or_else(|| StoreError::UnknownMode {
                collection: collection.clone(),
                mode: mode.clone(),
            })?;
        target.name = name.to_string();
        Ok(())
    }

    async fn create_color_variable(
        &self,
        name: &str,
        collection: &CollectionId,
    ) -> Result<Variable, StoreError> {
        let mut inner = self.inner.write();
        inner.collection_mut(collection)?;
        let duplicate = inner
            .variables
            .iter()
            .any(|variable| &variable.collection == collection && variable.name == name);
        if duplicate {
            return Err(StoreError::DuplicateVariable {
                collection: collection.clone(),
                name: name.to_string(),
            });
        }
        let variable = Variable {
            id: VariableId::new(inner.next("variable")),
            name: name.to_string(),
            collection: collection.clone(),
            description: String::new(),
            values_by_mode: BTreeMap::new(),
        };
        inner.variables.push(variable.clone());
        Ok(variable)
    }

    async fn set_value(
        &self,
        variable: &VariableId,
        mode: &ModeId,
        value: VariableValue,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        let owner = inner
            .variables
            .iter()
            .find(|candidate| &candidate.id == variable)
            .map(|candidate| candidate.collection.clone())
            .ok_or_else(|| StoreError::UnknownVariable(variable.clone()))?;
        let mode_exists = inner
            .collections
            .iter()
            .find(|collection| collection.id == owner)
            .is_some_and(|collection| collection.mode(mode).is_some());
        if !mode_exists {
            return Err(StoreError::UnknownMode {
                collection: owner,
                mode: mode.clone(),
            });
        }
        inner
            .variable_mut(variable)?
            .values_by_mode
            .insert(mode.clone(), value);
        Ok(())
    }

    async fn set_description(
        &self,
        variable: &VariableId,
        description: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        inner.variable_mut(variable)?.description = description.to_string();
        Ok(())
    }
}
