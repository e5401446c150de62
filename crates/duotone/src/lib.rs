#![forbid(unsafe_code)]
// Allow these clippy lints for API ergonomics
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::significant_drop_tightening)]

//! # Duotone
//!
//! Generation and upkeep of two-mode (Light/Dark) color themes inside a
//! design tool's variable store.
//!
//! A theme is a variable collection with two modes and a fixed catalog of
//! color tokens. Duotone takes a recipe per mode (token name to color),
//! then creates or updates the collection until it matches:
//!
//! - **Catalog**: the fixed set of tokens every theme carries, with
//!   descriptions and per-token alpha rules ([`catalog`]).
//! - **Codec**: hex strings to store-native float channels and back
//!   ([`Rgba`], [`RecipeColor`]).
//! - **Resolution**: which existing modes play Light and Dark, and what
//!   color a token shows in one of them ([`resolve_modes`],
//!   [`ValueResolver`]).
//! - **Reconciliation**: the create/update writer with per-token failure
//!   isolation ([`apply_theme`]).
//!
//! The host is reached through the [`VariableStore`] trait; tests and
//! demos run against the bundled [`MemoryStore`].
//!
//! ## Quick Start
//!
//! ```rust
//! use duotone::{apply_theme, catalog, MemoryStore, Recipe, ThemePlan};
//!
//! # async fn demo() -> Result<(), duotone::ReconcileError> {
//! // One color per catalog token, per mode.
//! let light: Recipe = catalog::names().map(|name| (name, "#2E86AB")).collect();
//! let dark: Recipe = catalog::names().map(|name| (name, "#0B1D2A")).collect();
//!
//! let store = MemoryStore::new();
//! let report = apply_theme(&store, &ThemePlan::new("Ocean", light, dark)).await?;
//! assert!(report.is_clean());
//!
//! // Rerunning against the created collection is an update, and a no-op.
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod color;
pub mod memory;
pub mod recipe;
pub mod reconcile;
pub mod resolve;
pub mod store;

pub use catalog::{TokenInfo, CATALOG};
pub use color::{ColorParseError, RecipeColor, Rgba};
pub use memory::MemoryStore;
pub use recipe::{Recipe, RecipeError};
pub use reconcile::{
    apply_theme, ReconcileError, ThemeAction, ThemePlan, ThemeReport, TokenError, TokenFailure,
};
pub use resolve::{resolve_modes, ModePair, ResolveError, ThemeMode, ValueResolver};
pub use store::{
    CollectionId, Mode, ModeId, StoreError, Variable, VariableCollection, VariableId,
    VariableStore, VariableValue, DEFAULT_MODE_NAME,
};
