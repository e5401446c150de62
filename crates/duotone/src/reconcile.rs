//! Applying a theme plan to a variable store.
//!
//! The single entry point, [`apply_theme`], either creates a new
//! collection or updates an existing one until it matches the plan.
//! Structural work (the collection, its two modes, their names) must
//! succeed; per-token work degrades instead, collecting failures into
//! the report so one bad token cannot abort the remaining writes. Host
//! stores have no transactions, so a structural failure can leave a
//! partially built collection behind; rerunning the same plan as an
//! update completes it.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::{TokenInfo, CATALOG};
use crate::recipe::Recipe;
use crate::resolve::{resolve_modes, ModePair, ResolveError, ThemeMode};
use crate::store::{CollectionId, StoreError, Variable, VariableStore, VariableValue};

/// What to generate: a theme name, one recipe per mode, and optionally
/// an existing collection to update in place.
#[derive(Debug, Clone)]
pub struct ThemePlan {
    pub theme_name: String,
    pub light: Recipe,
    pub dark: Recipe,
    /// Collection to update. `None` means create a new one.
    pub target: Option<CollectionId>,
}

impl ThemePlan {
    /// Plans a brand-new collection for the theme.
    #[must_use]
    pub fn new(theme_name: impl Into<String>, light: Recipe, dark: Recipe) -> Self {
        Self {
            theme_name: theme_name.into(),
            light,
            dark,
            target: None,
        }
    }

    /// Retargets the plan at an existing collection.
    #[must_use]
    pub fn with_target(mut self, collection: CollectionId) -> Self {
        self.target = Some(collection);
        self
    }
}

/// Which path [`apply_theme`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeAction {
    Created,
    Updated,
}

impl fmt::Display for ThemeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
        })
    }
}

/// Why one token could not be written.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The recipe for one of the modes has no entry for this token.
    #[error("no {mode} recipe entry")]
    MissingRecipe { mode: ThemeMode },
    /// The store refused one of the token's writes.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One token that failed while the rest of the run carried on.
#[derive(Debug)]
pub struct TokenFailure {
    pub token: &'static str,
    pub error: TokenError,
}

/// The outcome of [`apply_theme`].
#[derive(Debug)]
pub struct ThemeReport {
    pub theme_name: String,
    pub action: ThemeAction,
    pub collection: CollectionId,
    /// Tokens fully written: description and both mode values.
    pub written: usize,
    /// Tokens given up on, in catalog order.
    pub failures: Vec<TokenFailure>,
}

impl ThemeReport {
    /// Whether every catalog token was written.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Error that aborts a run during structural work.
#[derive(Error, Debug)]
pub enum ReconcileError {
    /// The collection picked for update no longer exists.
    #[error("collection to update not found: {0}")]
    CollectionNotFound(CollectionId),
    /// A freshly created collection arrived without its default mode.
    #[error("new collection {0} arrived without a default mode")]
    MissingDefaultMode(CollectionId),
    /// Light and Dark modes could not be determined.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// A structural store call failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Applies `plan` to `store`.
///
/// Without a target collection this creates one: the fresh collection's
/// default mode is renamed to `<theme>/Light`, a `<theme>/Dark` mode is
/// added, and every catalog token is created, described and written in
/// both modes. With a target it updates in place: Light and Dark are
/// resolved among the modes that exist, collection and mode names are
/// aligned with the theme name, token variables that have gone missing
/// are recreated, and descriptions and values are brought back in line.
/// Applying the same plan twice leaves the store as the first run did.
///
/// # Errors
///
/// Structural failures abort with a [`ReconcileError`]. Per-token
/// failures do not; they are collected in the returned [`ThemeReport`].
pub async fn apply_theme<S>(store: &S, plan: &ThemePlan) -> Result<ThemeReport, ReconcileError>
where
    S: VariableStore + ?Sized,
{
    match &plan.target {
        Some(target) => update_theme(store, plan, target).await,
        None => create_theme(store, plan).await,
    }
}

async fn create_theme<S>(store: &S, plan: &ThemePlan) -> Result<ThemeReport, ReconcileError>
where
    S: VariableStore + ?Sized,
{
    let collection = store.create_collection(&plan.theme_name).await?;
    let Some(light) = collection.modes.first().map(|mode| mode.id.clone()) else {
        return Err(ReconcileError::MissingDefaultMode(collection.id));
    };

    store
        .rename_mode(
            &collection.id,
            &light,
            &ThemeMode::Light.qualified_name(&plan.theme_name),
        )
        .await?;
    let dark = store
        .add_mode(
            &collection.id,
            &ThemeMode::Dark.qualified_name(&plan.theme_name),
        )
        .await?;
    info!(theme = %plan.theme_name, collection = %collection.id, "created theme collection");

    let modes = ModePair { light, dark };
    let (written, failures) = write_tokens(store, &collection.id, &modes, plan, None).await;
    Ok(ThemeReport {
        theme_name: plan.theme_name.clone(),
        action: ThemeAction::Created,
        collection: collection.id,
        written,
        failures,
    })
}

async fn update_theme<S>(
    store: &S,
    plan: &ThemePlan,
    target: &CollectionId,
) -> Result<ThemeReport, ReconcileError>
where
    S: VariableStore + ?Sized,
{
    let collection = store
        .collection(target)
        .await?
        .ok_or_else(|| ReconcileError::CollectionNotFound(target.clone()))?;
    let modes = resolve_modes(&collection, &plan.theme_name)?;

    if collection.name != plan.theme_name {
        info!(from = %collection.name, to = %plan.theme_name, "renaming collection");
        store
            .rename_collection(&collection.id, &plan.theme_name)
            .await?;
    }
    for (face, mode_id) in [(ThemeMode::Light, &modes.light), (ThemeMode::Dark, &modes.dark)] {
        let wanted = face.qualified_name(&plan.theme_name);
        if let Some(mode) = collection.mode(mode_id) {
            if mode.name != wanted {
                store.rename_mode(&collection.id, mode_id, &wanted).await?;
            }
        }
    }

    let existing: HashMap<String, Variable> = store
        .variables_in(&collection.id)
        .await?
        .into_iter()
        .map(|variable| (variable.name.clone(), variable))
        .collect();

    let (written, failures) =
        write_tokens(store, &collection.id, &modes, plan, Some(&existing)).await;
    Ok(ThemeReport {
        theme_name: plan.theme_name.clone(),
        action: ThemeAction::Updated,
        collection: collection.id,
        written,
        failures,
    })
}

async fn write_tokens<S>(
    store: &S,
    collection: &CollectionId,
    modes: &ModePair,
    plan: &ThemePlan,
    existing: Option<&HashMap<String, Variable>>,
) -> (usize, Vec<TokenFailure>)
where
    S: VariableStore + ?Sized,
{
    let mut written = 0;
    let mut failures = Vec::new();
    for info in &CATALOG {
        match write_token(store, collection, modes, plan, existing, info).await {
            Ok(()) => written += 1,
            Err(error) => {
                warn!(token = info.name, error = %error, "token failed, continuing with the rest");
                failures.push(TokenFailure {
                    token: info.name,
                    error,
                });
            }
        }
    }
    info!(
        theme = %plan.theme_name,
        written,
        failed = failures.len(),
        "token reconciliation finished"
    );
    (written, failures)
}

async fn write_token<S>(
    store: &S,
    collection: &CollectionId,
    modes: &ModePair,
    plan: &ThemePlan,
    existing: Option<&HashMap<String, Variable>>,
    info: &TokenInfo,
) -> Result<(), TokenError>
where
    S: VariableStore + ?Sized,
{
    // Both recipe entries are required before anything is created, so a
    // coverage gap never leaves a half-written variable behind.
    let light = plan.light.get(info.name).ok_or(TokenError::MissingRecipe {
        mode: ThemeMode::Light,
    })?;
    let dark = plan.dark.get(info.name).ok_or(TokenError::MissingRecipe {
        mode: ThemeMode::Dark,
    })?;

    let variable = match existing {
        None => store.create_color_variable(info.name, collection).await?,
        Some(map) => match map.get(info.name) {
            Some(variable) => variable.clone(),
            None => {
                warn!(token = info.name, "variable missing from collection, recreating");
                store.create_color_variable(info.name, collection).await?
            }
        },
    };

    if variable.description != info.description {
        store.set_description(&variable.id, info.description).await?;
    }

    for (mode_id, entry) in [(&modes.light, light), (&modes.dark, dark)] {
        let mut value = entry.to_rgba(info.name);
        if let Some(alpha) = info.alpha {
            value.a = alpha;
        }
        store
            .set_value(&variable.id, mode_id, VariableValue::Color(value))
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::catalog::{self, TRANSLUCENT_ALPHA};
    use crate::color::Rgba;
    use crate::memory::MemoryStore;
    use crate::store::{ModeId, VariableCollection, VariableId};

    fn full_recipe(hex: &str) -> Recipe {
        CATALOG.iter().map(|info| (info.name, hex)).collect()
    }

    fn mode_names(collection: &VariableCollection) -> Vec<&str> {
        collection.modes.iter().map(|mode| mode.name.as_str()).collect()
    }

    async fn color_in(store: &MemoryStore, variable: &VariableId, mode: &ModeId) -> Rgba {
        store
            .variable(variable)
            .unwrap()
            .value_for(mode)
            .and_then(VariableValue::as_color)
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_writes_every_token() {
        let store = MemoryStore::new();
        let plan = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"));

        let report = apply_theme(&store, &plan).await.unwrap();
        assert_eq!(report.action, ThemeAction::Created);
        assert_eq!(report.written, CATALOG.len());
        assert!(report.is_clean());

        let collection = store.collection_named("Ocean").unwrap();
        assert_eq!(collection.id, report.collection);
        assert_eq!(mode_names(&collection), vec!["Ocean/Light", "Ocean/Dark"]);

        let variables = store.variables_in(&collection.id).await.unwrap();
        assert_eq!(variables.len(), CATALOG.len());

        let surface = store
            .variable_named(&collection.id, "base/surface/surface")
            .unwrap();
        assert_eq!(
            surface.description,
            catalog::find("base/surface/surface").unwrap().description
        );
        let light_mode = collection.mode_named("Ocean/Light").unwrap();
        let dark_mode = collection.mode_named("Ocean/Dark").unwrap();
        assert_eq!(
            color_in(&store, &surface.id, &light_mode.id).await.to_hex(),
            "#2E86AB"
        );
        assert_eq!(
            color_in(&store, &surface.id, &dark_mode.id).await.to_hex(),
            "#123456"
        );
    }

    #[tokio::test]
    async fn test_create_applies_catalog_alpha_in_both_modes() {
        let store = MemoryStore::new();
        let plan = ThemePlan::new("Ocean", full_recipe("#FF0000"), full_recipe("#00FF00"));
        apply_theme(&store, &plan).await.unwrap();

        let collection = store.collection_named("Ocean").unwrap();
        for token in ["base/other/shadow", "base/other/overlay"] {
            let variable = store.variable_named(&collection.id, token).unwrap();
            for mode in &collection.modes {
                let value = color_in(&store, &variable.id, &mode.id).await;
                assert!(
                    (value.a - TRANSLUCENT_ALPHA).abs() < 1e-9,
                    "{token} in {} has alpha {}",
                    mode.name,
                    value.a
                );
            }
            // The base color still comes from the recipe.
            let light = collection.mode_named("Ocean/Light").unwrap();
            assert_eq!(color_in(&store, &variable.id, &light.id).await.to_hex(), "#FF0000");
        }

        // Every other token stays fully opaque in both modes.
        for info in CATALOG.iter().filter(|info| info.alpha.is_none()) {
            let variable = store.variable_named(&collection.id, info.name).unwrap();
            for mode in &collection.modes {
                let value = color_in(&store, &variable.id, &mode.id).await;
                assert!(
                    (value.a - 1.0).abs() < 1e-9,
                    "{} in {} has alpha {}",
                    info.name,
                    mode.name,
                    value.a
                );
            }
        }
    }

    #[tokio::test]
    async fn test_create_reports_recipe_gaps_per_token() {
        let store = MemoryStore::new();
        let mut light = full_recipe("#2E86AB");
        light.remove("feedback/info/info");
        let plan = ThemePlan::new("Ocean", light, full_recipe("#123456"));

        let report = apply_theme(&store, &plan).await.unwrap();
        assert_eq!(report.written, CATALOG.len() - 1);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.token, "feedback/info/info");
        assert!(matches!(
            failure.error,
            TokenError::MissingRecipe {
                mode: ThemeMode::Light
            }
        ));

        // The gap never created a half-written variable.
        let collection = store.collection_named("Ocean").unwrap();
        assert!(store
            .variable_named(&collection.id, "feedback/info/info")
            .is_none());
    }

    #[tokio::test]
    async fn test_malformed_hex_degrades_to_fallback_not_failure() {
        let store = MemoryStore::new();
        let mut light = full_recipe("#2E86AB");
        light.set("base/surface/surface", "definitely-not-hex");
        let plan = ThemePlan::new("Ocean", light, full_recipe("#123456"));

        let report = apply_theme(&store, &plan).await.unwrap();
        assert!(report.is_clean());

        let collection = store.collection_named("Ocean").unwrap();
        let surface = store
            .variable_named(&collection.id, "base/surface/surface")
            .unwrap();
        let light_mode = collection.mode_named("Ocean/Light").unwrap();
        assert_eq!(
            color_in(&store, &surface.id, &light_mode.id).await,
            Rgba::FALLBACK
        );
    }

    #[tokio::test]
    async fn test_update_renames_and_rewrites_in_place() {
        let store = MemoryStore::new();
        let created = apply_theme(
            &store,
            &ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456")),
        )
        .await
        .unwrap();
        let primary_before = store
            .variable_named(&created.collection, "accent/primary/primary")
            .unwrap();

        let update = ThemePlan::new("Lagoon", full_recipe("#C0F5A1"), full_recipe("#0B1D2A"))
            .with_target(created.collection.clone());
        let report = apply_theme(&store, &update).await.unwrap();
        assert_eq!(report.action, ThemeAction::Updated);
        assert!(report.is_clean());

        assert!(store.collection_named("Ocean").is_none());
        let collection = store.collection_named("Lagoon").unwrap();
        assert_eq!(mode_names(&collection), vec!["Lagoon/Light", "Lagoon/Dark"]);

        // Same variable, new values: the id survived the update.
        let primary_after = store
            .variable_named(&collection.id, "accent/primary/primary")
            .unwrap();
        assert_eq!(primary_after.id, primary_before.id);
        let light_mode = collection.mode_named("Lagoon/Light").unwrap();
        assert_eq!(
            color_in(&store, &primary_after.id, &light_mode.id).await.to_hex(),
            "#C0F5A1"
        );
    }

    #[tokio::test]
    async fn test_update_recreates_missing_tokens() {
        // A collection assembled by hand, holding only two of the catalog
        // tokens and no descriptions.
        let store = MemoryStore::new();
        let collection = store.create_collection("Ocean").await.unwrap();
        store
            .rename_mode(&collection.id, &collection.modes[0].id, "Ocean/Light")
            .await
            .unwrap();
        store.add_mode(&collection.id, "Ocean/Dark").await.unwrap();
        let kept_primary = store
            .create_color_variable("accent/primary/primary", &collection.id)
            .await
            .unwrap();
        let kept_surface = store
            .create_color_variable("base/surface/surface", &collection.id)
            .await
            .unwrap();

        let plan = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"))
            .with_target(collection.id.clone());
        let report = apply_theme(&store, &plan).await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.written, CATALOG.len());

        let variables = store.variables_in(&collection.id).await.unwrap();
        assert_eq!(variables.len(), CATALOG.len());
        assert_eq!(
            store
                .variable_named(&collection.id, "accent/primary/primary")
                .unwrap()
                .id,
            kept_primary.id
        );
        assert_eq!(
            store
                .variable_named(&collection.id, "base/surface/surface")
                .unwrap()
                .id,
            kept_surface.id
        );
        // Recreated tokens got their descriptions too.
        let outline = store
            .variable_named(&collection.id, "base/other/outline")
            .unwrap();
        assert_eq!(
            outline.description,
            catalog::find("base/other/outline").unwrap().description
        );
    }

    #[tokio::test]
    async fn test_update_missing_collection_fails_structurally() {
        let store = MemoryStore::new();
        let plan = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"))
            .with_target(CollectionId::new("collection:404"));
        let err = apply_theme(&store, &plan).await.unwrap_err();
        assert!(matches!(err, ReconcileError::CollectionNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_single_mode_collection_fails_structurally() {
        let store = MemoryStore::new();
        let collection = store.create_collection("Ocean").await.unwrap();
        let plan = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"))
            .with_target(collection.id);
        let err = apply_theme(&store, &plan).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Resolve(_)));
    }

    #[tokio::test]
    async fn test_applying_the_same_plan_twice_changes_nothing() {
        let store = MemoryStore::new();
        let created = apply_theme(
            &store,
            &ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456")),
        )
        .await
        .unwrap();

        let after_create = (
            store.collections().await.unwrap(),
            store.variables().await.unwrap(),
        );

        let again = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"))
            .with_target(created.collection);
        let report = apply_theme(&store, &again).await.unwrap();
        assert!(report.is_clean());
        assert_eq!(report.written, CATALOG.len());

        let after_update = (
            store.collections().await.unwrap(),
            store.variables().await.unwrap(),
        );
        assert_eq!(after_create, after_update);
    }

    /// Wraps [`MemoryStore`] and fails selected calls, to exercise
    /// per-token isolation and structural aborts.
    struct FailingStore {
        inner: MemoryStore,
        fail_create_of: Option<&'static str>,
        fail_values_of: Option<&'static str>,
        fail_add_mode: bool,
    }

    impl FailingStore {
        fn wrap(inner: MemoryStore) -> Self {
            Self {
                inner,
                fail_create_of: None,
                fail_values_of: None,
                fail_add_mode: false,
            }
        }
    }

    #[async_trait]
    impl VariableStore for FailingStore {
        async fn collections(&self) -> Result<Vec<VariableCollection>, StoreError> {
            self.inner.collections().await
        }

        async fn variables(&self) -> Result<Vec<Variable>, StoreError> {
            self.inner.variables().await
        }

        async fn create_collection(&self, name: &str) -> Result<VariableCollection, StoreError> {
            self.inner.create_collection(name).await
        }

        async fn rename_collection(&self, id: &CollectionId, name: &str) -> Result<(), StoreError> {
            self.inner.rename_collection(id, name).await
        }

        async fn add_mode(
            &self,
            collection: &CollectionId,
            name: &str,
        ) -> Result<ModeId, StoreError> {
            if self.fail_add_mode {
                return Err(StoreError::Host("mode limit reached".to_string()));
            }
            self.inner.add_mode(collection, name).await
        }

        async fn rename_mode(
            &self,
            collection: &CollectionId,
            mode: &ModeId,
            name: &str,
        ) -> Result<(), StoreError> {
            self.inner.rename_mode(collection, mode, name).await
        }

        async fn create_color_variable(
            &self,
            name: &str,
            collection: &CollectionId,
        ) -> Result<Variable, StoreError> {
            if self.fail_create_of == Some(name) {
                return Err(StoreError::Host("simulated create failure".to_string()));
            }
            self.inner.create_color_variable(name, collection).await
        }

        async fn set_value(
            &self,
            variable: &VariableId,
            mode: &ModeId,
            value: VariableValue,
        ) -> Result<(), StoreError> {
            if let Some(token) = self.fail_values_of {
                if self.inner.variable(variable).is_some_and(|v| v.name == token) {
                    return Err(StoreError::Host("simulated write failure".to_string()));
                }
            }
            self.inner.set_value(variable, mode, value).await
        }

        async fn set_description(
            &self,
            variable: &VariableId,
            description: &str,
        ) -> Result<(), StoreError> {
            self.inner.set_description(variable, description).await
        }
    }

    #[tokio::test]
    async fn test_one_failing_create_does_not_stop_the_run() {
        let mut store = FailingStore::wrap(MemoryStore::new());
        store.fail_create_of = Some("feedback/error/error");
        let plan = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"));

        let report = apply_theme(&store, &plan).await.unwrap();
        assert_eq!(report.written, CATALOG.len() - 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].token, "feedback/error/error");
        assert!(matches!(report.failures[0].error, TokenError::Store(_)));

        // Tokens after the failing one in catalog order were still written.
        let collection = store.inner.collection_named("Ocean").unwrap();
        assert!(store
            .inner
            .variable_named(&collection.id, "feedback/info/on-info-container")
            .is_some());
    }

    #[tokio::test]
    async fn test_one_failing_value_write_is_isolated() {
        let mut store = FailingStore::wrap(MemoryStore::new());
        store.fail_values_of = Some("base/other/outline");
        let plan = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"));

        let report = apply_theme(&store, &plan).await.unwrap();
        assert_eq!(report.written, CATALOG.len() - 1);
        assert_eq!(report.failures[0].token, "base/other/outline");

        // The variable exists; only its values are missing.
        let collection = store.inner.collection_named("Ocean").unwrap();
        let outline = store
            .inner
            .variable_named(&collection.id, "base/other/outline")
            .unwrap();
        assert!(outline.values_by_mode.is_empty());
    }

    #[tokio::test]
    async fn test_add_mode_failure_aborts_the_create() {
        let mut store = FailingStore::wrap(MemoryStore::new());
        store.fail_add_mode = true;
        let plan = ThemePlan::new("Ocean", full_recipe("#2E86AB"), full_recipe("#123456"));

        let err = apply_theme(&store, &plan).await.unwrap_err();
        assert!(matches!(err, ReconcileError::Store(StoreError::Host(_))));
        // No token work happened.
        let collection = store.inner.collection_named("Ocean").unwrap();
        assert!(store.inner.variables_in(&collection.id).await.unwrap().is_empty());
    }
}
