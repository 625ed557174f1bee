//! Entity identifiers
//!
//! Every stored record carries an [`EntityId`]: a type prefix plus a ULID,
//! rendered as `SPEC-01J9Z3...`. The prefix makes ids self-describing in
//! blobs and on the command line; the ULID keeps them sortable by creation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use ulid::Ulid;

/// Record type prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityPrefix {
    /// Bin definition
    Bin,
    /// Bin count inside a yield record
    Cnt,
    /// Yield record (one wafer)
    Yld,
    /// Parametric specification
    Spec,
    /// Measured value against a spec
    Meas,
    /// Statistical data set
    Ds,
    /// Test-time profile
    Prof,
    /// Step inside a test-time profile
    Step,
    /// Period/frequency calculation
    Pfc,
    /// Wafer/die calculation
    Wdc,
}

impl EntityPrefix {
    /// All prefixes, in display order
    pub const ALL: [EntityPrefix; 10] = [
        EntityPrefix::Bin,
        EntityPrefix::Cnt,
        EntityPrefix::Yld,
        EntityPrefix::Spec,
        EntityPrefix::Meas,
        EntityPrefix::Ds,
        EntityPrefix::Prof,
        EntityPrefix::Step,
        EntityPrefix::Pfc,
        EntityPrefix::Wdc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Bin => "BIN",
            EntityPrefix::Cnt => "CNT",
            EntityPrefix::Yld => "YLD",
            EntityPrefix::Spec => "SPEC",
            EntityPrefix::Meas => "MEAS",
            EntityPrefix::Ds => "DS",
            EntityPrefix::Prof => "PROF",
            EntityPrefix::Step => "STEP",
            EntityPrefix::Pfc => "PFC",
            EntityPrefix::Wdc => "WDC",
        }
    }

    /// Human-readable record kind
    pub fn kind(&self) -> &'static str {
        match self {
            EntityPrefix::Bin => "bin",
            EntityPrefix::Cnt => "bin count",
            EntityPrefix::Yld => "yield record",
            EntityPrefix::Spec => "spec",
            EntityPrefix::Meas => "measurement",
            EntityPrefix::Ds => "data set",
            EntityPrefix::Prof => "test profile",
            EntityPrefix::Step => "test step",
            EntityPrefix::Pfc => "period/frequency calculation",
            EntityPrefix::Wdc => "wafer/die calculation",
        }
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        EntityPrefix::ALL
            .into_iter()
            .find(|p| p.as_str() == upper)
            .ok_or_else(|| IdParseError::UnknownPrefix(s.to_string()))
    }
}

/// Errors from parsing an id string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdParseError {
    #[error("id '{0}' is missing the PREFIX- separator")]
    MissingSeparator(String),

    #[error("unknown id prefix '{0}'")]
    UnknownPrefix(String),

    #[error("invalid ULID '{0}'")]
    InvalidUlid(String),
}

/// Unique identifier for a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    prefix: EntityPrefix,
    ulid: Ulid,
}

impl EntityId {
    /// Generate a fresh id for the given record type
    pub fn new(prefix: EntityPrefix) -> Self {
        Self {
            prefix,
            ulid: Ulid::new(),
        }
    }

    pub fn prefix(&self) -> EntityPrefix {
        self.prefix
    }

    pub fn ulid(&self) -> Ulid {
        self.ulid
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.ulid)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingSeparator(s.to_string()))?;
        let prefix: EntityPrefix = prefix.parse()?;
        let ulid = Ulid::from_string(ulid).map_err(|_| IdParseError::InvalidUlid(ulid.to_string()))?;
        Ok(Self { prefix, ulid })
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_has_prefix() {
        let id = EntityId::new(EntityPrefix::Spec);
        let s = id.to_string();
        assert!(s.starts_with("SPEC-"));
        assert_eq!(s.len(), "SPEC-".len() + 26);
    }

    #[test]
    fn test_id_parse_roundtrip() {
        let id = EntityId::new(EntityPrefix::Bin);
        let parsed: EntityId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(parsed.prefix(), EntityPrefix::Bin);
    }

    #[test]
    fn test_id_parse_errors() {
        assert!(matches!(
            "nodash".parse::<EntityId>(),
            Err(IdParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "XYZ-01ARZ3NDEKTSV4RRFFQ69G5FAV".parse::<EntityId>(),
            Err(IdParseError::UnknownPrefix(_))
        ));
        assert!(matches!(
            "BIN-not-a-ulid".parse::<EntityId>(),
            Err(IdParseError::InvalidUlid(_))
        ));
    }

    #[test]
    fn test_prefix_parse_is_case_insensitive() {
        assert_eq!("spec".parse::<EntityPrefix>().unwrap(), EntityPrefix::Spec);
        assert_eq!("Wdc".parse::<EntityPrefix>().unwrap(), EntityPrefix::Wdc);
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = EntityId::new(EntityPrefix::Ds);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
