//! Color values and hex conversion.
//!
//! Host variable stores keep color channels as floats in `[0.0, 1.0]`,
//! while recipes and user interfaces speak CSS-style hex strings. [`Rgba`]
//! carries the float form and converts in both directions; [`RecipeColor`]
//! is the shape a recipe entry takes on the wire, before it is decoded.

use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::warn;

/// Error produced when a string cannot be parsed as a hex color.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid hex color: {0:?}")]
pub struct ColorParseError(pub String);

/// A color with red, green, blue and alpha channels, each in `[0.0, 1.0]`.
///
/// This is the representation variable stores use for color values. The
/// alpha channel defaults to fully opaque when deserialized from data that
/// omits it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

impl Rgba {
    /// Opaque black, substituted for values that fail to decode.
    pub const FALLBACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Creates a fully opaque color from red, green and blue channels.
    #[must_use]
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the same color with the given alpha channel.
    #[must_use]
    pub const fn with_alpha(mut self, a: f64) -> Self {
        self.a = a;
        self
    }

    /// Parses a hex color string.
    ///
    /// Accepts 6-digit (`#2E86AB`) and 3-digit (`#FA0`) forms, with or
    /// without the leading `#`, in either case. Surrounding whitespace is
    /// ignored. Parsed colors are fully opaque.
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError`] when the input is not a 3- or 6-digit
    /// hex string.
    ///
    /// # Examples
    ///
    /// ```
    /// use duotone::Rgba;
    ///
    /// let blue = Rgba::from_hex("#2E86AB").unwrap();
    /// assert!((blue.r - 46.0 / 255.0).abs() < 1e-9);
    /// assert!(Rgba::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let err = || ColorParseError(hex.to_owned());

        // All-ASCII check up front so the byte slicing below cannot split
        // a multi-byte character, and so signs like "+2f" are rejected.
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let (r, g, b) = match digits.len() {
            6 => (
                u8::from_str_radix(&digits[0..2], 16).map_err(|_| err())?,
                u8::from_str_radix(&digits[2..4], 16).map_err(|_| err())?,
                u8::from_str_radix(&digits[4..6], 16).map_err(|_| err())?,
            ),
            3 => (
                u8::from_str_radix(&digits[0..1], 16).map_err(|_| err())? * 17,
                u8::from_str_radix(&digits[1..2], 16).map_err(|_| err())? * 17,
                u8::from_str_radix(&digits[2..3], 16).map_err(|_| err())? * 17,
            ),
            _ => return Err(err()),
        };

        Ok(Self {
            r: f64::from(r) / 255.0,
            g: f64::from(g) / 255.0,
            b: f64::from(b) / 255.0,
            a: 1.0,
        })
    }

    /// Parses a hex color string, falling back to opaque black on failure.
    ///
    /// The failure is logged rather than surfaced so that one bad value
    /// does not abort a larger run.
    #[must_use]
    pub fn from_hex_lossy(hex: &str) -> Self {
        Self::from_hex(hex).unwrap_or_else(|err| {
            warn!(error = %err, "undecodable hex color, using fallback");
            Self::FALLBACK
        })
    }

    /// Encodes the color as an uppercase 6-digit hex string.
    ///
    /// Each channel is rounded to the nearest of the 256 representable
    /// levels. The alpha channel is not encoded.
    ///
    /// # Examples
    ///
    /// ```
    /// use duotone::Rgba;
    ///
    /// assert_eq!(Rgba::new(1.0, 0.0, 0.0).to_hex(), "#FF0000");
    /// assert_eq!(Rgba::from_hex("#c0f5a1").unwrap().to_hex(), "#C0F5A1");
    /// ```
    #[must_use]
    pub fn to_hex(&self) -> String {
        let level = |channel: f64| (channel * 255.0).round() as u8;
        format!(
            "#{:02X}{:02X}{:02X}",
            level(self.r),
            level(self.g),
            level(self.b)
        )
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A recipe entry as written by a user or a UI: either a hex string or an
/// explicit channel map.
///
/// Deserialization accepts exactly those two shapes. Anything else (a
/// number, an array, a map without `r`, `g` and `b`) is rejected when the
/// recipe is parsed, so later stages only ever see one of these variants.
/// Hex strings are kept verbatim here; decoding happens in
/// [`RecipeColor::to_rgba`], where a malformed string degrades to the
/// fallback color instead of failing the run.
#[derive(Debug, Clone, PartialEq)]
pub enum RecipeColor {
    /// A CSS-style hex string such as `"#2E86AB"`.
    Hex(String),
    /// Explicit channel components, alpha defaulting to fully opaque.
    Components(Rgba),
}

impl RecipeColor {
    /// Decodes the entry into channel components.
    ///
    /// A hex string that fails to parse yields [`Rgba::FALLBACK`] and a
    /// warning naming the token, matching the per-token degradation the
    /// reconciler promises.
    #[must_use]
    pub fn to_rgba(&self, token: &str) -> Rgba {
        match self {
            Self::Hex(hex) => match Rgba::from_hex(hex) {
                Ok(color) => color,
                Err(err) => {
                    warn!(token, error = %err, "undecodable recipe color, using fallback");
                    Rgba::FALLBACK
                }
            },
            Self::Components(color) => *color,
        }
    }
}

impl From<Rgba> for RecipeColor {
    fn from(color: Rgba) -> Self {
        Self::Components(color)
    }
}

impl From<&str> for RecipeColor {
    fn from(hex: &str) -> Self {
        Self::Hex(hex.to_owned())
    }
}

impl From<String> for RecipeColor {
    fn from(hex: String) -> Self {
        Self::Hex(hex)
    }
}

impl Serialize for RecipeColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Hex(hex) => serializer.serialize_str(hex),
            Self::Components(color) => color.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for RecipeColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(RecipeColorVisitor)
    }
}

struct RecipeColorVisitor;

impl<'de> Visitor<'de> for RecipeColorVisitor {
    type Value = RecipeColor;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a hex string like \"#2E86AB\" or a map with r, g and b channels")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(RecipeColor::Hex(value.to_owned()))
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut r = None;
        let mut g = None;
        let mut b = None;
        let mut a = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "r" => r = Some(map.next_value::<Channel>()?.0),
                "g" => g = Some(map.next_value::<Channel>()?.0),
                "b" => b = Some(map.next_value::<Channel>()?.0),
                "a" => a = Some(map.next_value::<Channel>()?.0),
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        match (r, g, b) {
            (Some(r), Some(g), Some(b)) => Ok(RecipeColor::Components(Rgba {
                r,
                g,
                b,
                a: a.unwrap_or(1.0),
            })),
            _ => Err(de::Error::custom("color map requires r, g and b channels")),
        }
    }
}

/// A single channel value. TOML writes whole numbers as integers, so this
/// accepts both integer and float forms.
struct Channel(f64);

impl<'de> Deserialize<'de> for Channel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ChannelVisitor;

        impl Visitor<'_> for ChannelVisitor {
            type Value = Channel;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a number in [0.0, 1.0]")
            }

            fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Channel(value))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Channel(value as f64))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(Channel(value as f64))
            }
        }

        deserializer.deserialize_any(ChannelVisitor)
    }
}
