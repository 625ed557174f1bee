//! Bin definitions for yield binning

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::error::ValidationError;
use crate::core::identity::{EntityId, EntityPrefix};

/// A `#RRGGBB` display color.
///
/// The engines never interpret the color; it is validated once at the
/// boundary and passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green, blue components
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |i: usize| u8::from_str_radix(&self.0[i..i + 2], 16).unwrap_or(0);
        (channel(1), channel(3), channel(5))
    }
}

impl FromStr for HexColor {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::InvalidColor {
                input: s.to_string(),
            });
        }
        Ok(Self(format!("#{}", digits.to_ascii_uppercase())))
    }
}

impl TryFrom<String> for HexColor {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named classification bucket that die outcomes are counted into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinDefinition {
    /// Unique identifier
    pub id: EntityId,

    /// Display name ("Good", "Fail", ...)
    pub name: String,

    /// Display color
    pub color: HexColor,
}

impl BinDefinition {
    /// Create a new bin; the name must not be blank
    pub fn new(name: impl Into<String>, color: HexColor) -> Result<Self, ValidationError> {
        let bin = Self {
            id: EntityId::new(EntityPrefix::Bin),
            name: name.into().trim().to_string(),
            color,
        };
        bin.validate()?;
        Ok(bin)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty { field: "bin name" });
        }
        Ok(())
    }

    /// Whether this is the bin overall yield is computed from
    pub fn is_good(&self) -> bool {
        self.name.to_lowercase() == "good"
    }
}

impl Entity for BinDefinition {
    const PREFIX: EntityPrefix = EntityPrefix::Bin;
    const COLLECTION_KEY: &'static str = "yieldBins";
    const KIND: &'static str = "bin";

    fn id(&self) -> &EntityId {
        &self.id
    }
}

/// Bins seeded on first run: Good, Fail, Marginal
pub fn default_bins() -> Vec<BinDefinition> {
    [("Good", "#34C759"), ("Fail", "#FF3B30"), ("Marginal", "#FF9500")]
        .into_iter()
        .map(|(name, color)| BinDefinition {
            id: EntityId::new(EntityPrefix::Bin),
            name: name.to_string(),
            color: HexColor(color.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_normalizes() {
        let c: HexColor = "34c759".parse().unwrap();
        assert_eq!(c.as_str(), "#34C759");
        assert_eq!(c.rgb(), (0x34, 0xC7, 0x59));
    }

    #[test]
    fn test_hex_color_rejects_garbage() {
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("#GGGGGG".parse::<HexColor>().is_err());
        assert!("".parse::<HexColor>().is_err());
    }

    #[test]
    fn test_hex_color_deserialize_validates() {
        let ok: HexColor = serde_json::from_str("\"#FF9500\"").unwrap();
        assert_eq!(ok.to_string(), "#FF9500");
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }

    #[test]
    fn test_bin_requires_name() {
        let color: HexColor = "#000000".parse().unwrap();
        assert_eq!(
            BinDefinition::new("   ", color.clone()),
            Err(ValidationError::Empty { field: "bin name" })
        );
        let bin = BinDefinition::new(" Retest ", color).unwrap();
        assert_eq!(bin.name, "Retest");
    }

    #[test]
    fn test_default_bins() {
        let bins = default_bins();
        let names: Vec<&str> = bins.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Good", "Fail", "Marginal"]);
        assert_eq!(bins[0].color.as_str(), "#34C759");
        assert!(bins[0].is_good());
        assert!(!bins[2].is_good());
    }
}
