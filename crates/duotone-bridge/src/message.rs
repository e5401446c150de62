//! Wire messages between a host UI and the generator.
//!
//! Inbound [`Command`]s and outbound [`Event`]s mirror the JSON a plugin
//! UI exchanges with its worker: a kebab-case `type` tag, camelCase
//! payload fields. [`Notification`]s travel alongside events but are not
//! UI state; they are toasts for the host's own notification surface.

use duotone::{CollectionId, Recipe};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error produced when a message cannot be encoded or decoded.
#[derive(Error, Debug)]
#[error("malformed message: {0}")]
pub struct MessageError(#[from] serde_json::Error);

/// A request from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Command {
    /// List the collections that can be offered for update.
    GetCollections,
    /// Read the seed colors of an existing collection.
    LoadThemeData { payload: LoadThemeRequest },
    /// Generate a theme: create a collection, or update one in place
    /// when the payload names a target.
    GenerateTheme { payload: GenerateThemeRequest },
}

impl Command {
    /// Decodes a command from its wire JSON.
    pub fn from_json(json: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the command as wire JSON.
    pub fn to_json(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Payload of [`Command::LoadThemeData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadThemeRequest {
    pub collection_id: CollectionId,
    pub theme_name: String,
}

/// Payload of [`Command::GenerateTheme`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateThemeRequest {
    pub theme_name: String,
    pub light_recipe: Recipe,
    pub dark_recipe: Recipe,
    /// Present when an existing collection should be updated in place.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id_to_update: Option<CollectionId>,
}

/// A message for the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
    /// The collections available for update.
    CollectionsList { collections: Vec<CollectionSummary> },
    /// Seed colors read out of an existing collection.
    ThemeDataLoaded { payload: ThemeData },
    /// Generation ran to completion; any per-token failures were
    /// reported as notifications along the way.
    GenerationComplete,
    /// Generation aborted before its tokens could be written.
    GenerationError,
}

impl Event {
    /// Decodes an event from its wire JSON.
    pub fn from_json(json: &str) -> Result<Self, MessageError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the event as wire JSON.
    pub fn to_json(&self) -> Result<String, MessageError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One collection the UI can offer for update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub id: CollectionId,
    pub name: String,
}

/// Seed colors for the UI pickers, as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeData {
    pub primary: String,
    pub secondary: String,
    pub tertiary: String,
}

/// How prominently the host should present a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A toast for the host to show the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    /// How long the toast should stay up. `None` leaves it to the host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u32>,
}

impl Notification {
    /// An informational toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            timeout_ms: None,
        }
    }

    /// A warning toast.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Warning,
            timeout_ms: None,
        }
    }

    /// An error toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            timeout_ms: None,
        }
    }

    /// Sets an explicit display duration.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }
}

/// Everything one command produced: events for the UI, notifications for
/// the host's toast surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub events: Vec<Event>,
    pub notifications: Vec<Notification>,
}

impl Reply {
    /// A reply carrying a single event.
    #[must_use]
    pub fn event(event: Event) -> Self {
        Self {
            events: vec![event],
            notifications: Vec::new(),
        }
    }

    /// A reply carrying a single notification.
    #[must_use]
    pub fn notification(notification: Notification) -> Self {
        Self {
            events: Vec::new(),
            notifications: vec![notification],
        }
    }

    /// Whether the command produced nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.notifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use duotone::Rgba;

    use super::*;

    #[test]
    fn test_command_wire_shapes() {
        let parsed = Command::from_json(r#"{"type":"get-collections"}"#).unwrap();
        assert_eq!(parsed, Command::GetCollections);

        let parsed = Command::from_json(
            r#"{"type":"load-theme-data","payload":{"collectionId":"collection:9","themeName":"Ocean"}}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            Command::LoadThemeData {
                payload: LoadThemeRequest {
                    collection_id: CollectionId::new("collection:9"),
                    theme_name: "Ocean".to_string(),
                },
            }
        );
    }

    #[test]
    fn test_generate_command_round_trips() {
        let command = Command::GenerateTheme {
            payload: GenerateThemeRequest {
                theme_name: "Ocean".to_string(),
                light_recipe: Recipe::new().with("accent/primary/primary", "#2E86AB"),
                dark_recipe: Recipe::new()
                    .with("accent/primary/primary", Rgba::new(0.1, 0.2, 0.3)),
                collection_id_to_update: None,
            },
        };
        let json = command.to_json().unwrap();
        // Creation requests leave the update target out entirely.
        assert!(!json.contains("collectionIdToUpdate"));
        assert_eq!(Command::from_json(&json).unwrap(), command);

        let update_json = r##"{
            "type": "generate-theme",
            "payload": {
                "themeName": "Ocean",
                "lightRecipe": {"accent/primary/primary": "#2E86AB"},
                "darkRecipe": {"accent/primary/primary": {"r": 0.1, "g": 0.2, "b": 0.3}},
                "collectionIdToUpdate": "collection:4"
            }
        }"##;
        let Command::GenerateTheme { payload } = Command::from_json(update_json).unwrap() else {
            panic!("expected generate-theme");
        };
        assert_eq!(
            payload.collection_id_to_update,
            Some(CollectionId::new("collection:4"))
        );
        assert_eq!(
            payload.dark_recipe.get("accent/primary/primary"),
            Some(&Rgba::new(0.1, 0.2, 0.3).into())
        );
    }

    #[test]
    fn test_unknown_command_types_are_rejected() {
        assert!(Command::from_json(r#"{"type":"self-destruct"}"#).is_err());
        assert!(Command::from_json(r#"{"payload":{}}"#).is_err());
    }

    #[test]
    fn test_event_wire_shapes() {
        let list = Event::CollectionsList {
            collections: vec![CollectionSummary {
                id: CollectionId::new("collection:1"),
                name: "Ocean".to_string(),
            }],
        };
        assert_eq!(
            list.to_json().unwrap(),
            r#"{"type":"collections-list","collections":[{"id":"collection:1","name":"Ocean"}]}"#
        );

        let loaded = Event::ThemeDataLoaded {
            payload: ThemeData {
                primary: "#2E86AB".to_string(),
                secondary: "#C0F5A1".to_string(),
                tertiary: "#EF8611".to_string(),
            },
        };
        assert_eq!(
            loaded.to_json().unwrap(),
            r##"{"type":"theme-data-loaded","payload":{"primary":"#2E86AB","secondary":"#C0F5A1","tertiary":"#EF8611"}}"##
        );

        assert_eq!(
            Event::GenerationComplete.to_json().unwrap(),
            r#"{"type":"generation-complete"}"#
        );
        assert_eq!(
            Event::GenerationError.to_json().unwrap(),
            r#"{"type":"generation-error"}"#
        );
    }

    #[test]
    fn test_event_from_json_accepts_the_wire_forms() {
        let parsed = Event::from_json(
            r##"{"type":"theme-data-loaded","payload":{"primary":"#2E86AB","secondary":"#C0F5A1","tertiary":"#EF8611"}}"##,
        )
        .unwrap();
        let Event::ThemeDataLoaded { payload } = &parsed else {
            panic!("expected theme-data-loaded, got {parsed:?}");
        };
        assert_eq!(payload.secondary, "#C0F5A1");

        assert_eq!(
            Event::from_json(r#"{"type":"generation-complete"}"#).unwrap(),
            Event::GenerationComplete
        );
        assert!(Event::from_json(r#"{"type":"made-up"}"#).is_err());
    }

    #[test]
    fn test_notification_wire_shape() {
        let toast = Notification::warning("check the log").with_timeout_ms(5000);
        assert_eq!(
            serde_json::to_string(&toast).unwrap(),
            r#"{"message":"check the log","severity":"warning","timeoutMs":5000}"#
        );

        let toast = Notification::info("done");
        assert_eq!(
            serde_json::to_string(&toast).unwrap(),
            r#"{"message":"done","severity":"info"}"#
        );
    }

    #[test]
    fn test_reply_constructors() {
        assert!(Reply::default().is_empty());
        assert_eq!(Reply::event(Event::GenerationComplete).events.len(), 1);
        let reply = Reply::notification(Notification::error("boom"));
        assert!(reply.events.is_empty());
        assert_eq!(reply.notifications[0].severity, Severity::Error);
    }
}
