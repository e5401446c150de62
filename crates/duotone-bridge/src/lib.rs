#![forbid(unsafe_code)]
// Allow these clippy lints for API ergonomics
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]

//! # Duotone Bridge
//!
//! The message-level front door for [`duotone`]: a plugin UI posts
//! [`Command`]s, and the [`Bridge`] answers with [`Event`]s for the UI
//! plus [`Notification`]s for the host's toast surface.
//!
//! The bridge is deliberately unbreakable from the UI's point of view.
//! Whatever a command runs into, `handle` returns a [`Reply`] rather
//! than an error, so the conversation with the UI never stalls.
//!
//! ```rust
//! use duotone::MemoryStore;
//! use duotone_bridge::{Bridge, Command, Event};
//!
//! # async fn demo() {
//! let mut bridge = Bridge::new(MemoryStore::new());
//! let reply = bridge.handle(Command::GetCollections).await;
//! assert_eq!(
//!     reply.events[0],
//!     Event::CollectionsList { collections: vec![] }
//! );
//! # }
//! ```

pub mod dispatch;
pub mod message;

pub use dispatch::Bridge;
pub use message::{
    CollectionSummary, Command, Event, GenerateThemeRequest, LoadThemeRequest, MessageError,
    Notification, Reply, Severity, ThemeData,
};

// Re-export the core crate so embedders need only one dependency.
pub use duotone;
