//! The command dispatcher.
//!
//! [`Bridge`] owns a store and turns each inbound [`Command`] into the
//! events and notifications the UI side expects. `handle` never returns
//! an error: failures degrade into an emptier reply, an error event or
//! an error toast, the way a plugin worker has to keep its UI alive no
//! matter what the last host call did.

use thiserror::Error;
use tracing::{error, warn};

use duotone::{
    apply_theme, catalog, resolve_modes, ResolveError, StoreError, ThemePlan, ValueResolver,
    VariableStore,
};

use crate::message::{
    CollectionSummary, Command, Event, GenerateThemeRequest, LoadThemeRequest, Notification,
    Reply, ThemeData,
};

/// Picker defaults for seed tokens that cannot be read.
const DEFAULT_PRIMARY: &str = "#2E86AB";
const DEFAULT_SECONDARY: &str = "#C0F5A1";
const DEFAULT_TERTIARY: &str = "#EF8611";

/// Display time for per-token warning toasts.
const TOKEN_WARNING_MS: u32 = 5000;

#[derive(Error, Debug)]
enum LoadError {
    #[error("collection not found")]
    CollectionNotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Serves UI commands against a variable store.
pub struct Bridge<S> {
    store: S,
}

impl<S: VariableStore> Bridge<S> {
    /// Creates a bridge over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the bridge, returning the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Handles one command to completion.
    ///
    /// Takes `&mut self` because commands are serviced strictly one at a
    /// time; the host queue never interleaves them.
    pub async fn handle(&mut self, command: Command) -> Reply {
        match command {
            Command::GetCollections => self.get_collections().await,
            Command::LoadThemeData { payload } => self.load_theme_data(payload).await,
            Command::GenerateTheme { payload } => self.generate_theme(payload).await,
        }
    }

    async fn get_collections(&self) -> Reply {
        match self.store.collections().await {
            Ok(collections) => Reply::event(Event::CollectionsList {
                collections: collections
                    .into_iter()
                    .map(|collection| CollectionSummary {
                        id: collection.id,
                        name: collection.name,
                    })
                    .collect(),
            }),
            Err(err) => {
                // The picker degrades to "no collections" rather than
                // wedging the UI behind an error it cannot act on.
                error!(error = %err, "listing collections failed, sending an empty list");
                Reply::event(Event::CollectionsList {
                    collections: Vec::new(),
                })
            }
        }
    }

    async fn load_theme_data(&self, request: LoadThemeRequest) -> Reply {
        match self.read_seed_colors(&request).await {
            Ok(payload) => Reply::event(Event::ThemeDataLoaded { payload }),
            Err(err) => {
                error!(error = %err, collection = %request.collection_id, "loading theme data failed");
                Reply::notification(Notification::error(format!("❌ Error loading theme: {err}")))
            }
        }
    }

    async fn read_seed_colors(&self, request: &LoadThemeRequest) -> Result<ThemeData, LoadError> {
        let collection = self
            .store
            .collection(&request.collection_id)
            .await?
            .ok_or(LoadError::CollectionNotFound)?;
        let modes = resolve_modes(&collection, &request.theme_name)?;
        let variables = self.store.variables().await?;
        let resolver = ValueResolver::new(&variables, &collection.id);

        // A collection missing a seed token still loads; the picker just
        // starts from the default for that slot.
        let seed = |token: &'static str, fallback: &str| {
            match resolver.resolve(token, &modes.light) {
                Ok(color) => color.to_hex(),
                Err(err) => {
                    warn!(token, error = %err, "seed token unreadable, using the picker default");
                    fallback.to_string()
                }
            }
        };

        Ok(ThemeData {
            primary: seed(catalog::SEED_PRIMARY, DEFAULT_PRIMARY),
            secondary: seed(catalog::SEED_SECONDARY, DEFAULT_SECONDARY),
            tertiary: seed(catalog::SEED_TERTIARY, DEFAULT_TERTIARY),
        })
    }

    async fn generate_theme(&self, request: GenerateThemeRequest) -> Reply {
        let updating = request.collection_id_to_update.is_some();
        let mut plan = ThemePlan::new(
            request.theme_name,
            request.light_recipe,
            request.dark_recipe,
        );
        if let Some(target) = request.collection_id_to_update {
            plan = plan.with_target(target);
        }

        match apply_theme(&self.store, &plan).await {
            Ok(report) => {
                let mut reply = Reply::default();
                for failure in &report.failures {
                    reply.notifications.push(
                        Notification::warning(format!(
                            "⚠️ Error processing variable \"{}\". See log.",
                            failure.token
                        ))
                        .with_timeout_ms(TOKEN_WARNING_MS),
                    );
                }
                reply.notifications.push(Notification::info(format!(
                    "✅ Theme \"{}\" {}.",
                    report.theme_name, report.action
                )));
                reply.events.push(Event::GenerationComplete);
                reply
            }
            Err(err) => {
                let stage = if updating { "updating" } else { "creating" };
                error!(error = %err, "theme generation failed");
                let mut reply = Reply::notification(Notification::error(format!(
                    "❌ Error {stage} theme: {err}"
                )));
                reply.events.push(Event::GenerationError);
                reply
            }
        }
    }
}
