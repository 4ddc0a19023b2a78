//! Dispatch kinds and their wire vocabulary.
//!
//! A method declares how its providers are consulted. The textual form is
//! what the API accepts and what the `methods.kind` column stores; unknown
//! labels are rejected instead of silently defaulting.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// Policy governing how many providers are called and which answer wins.
/// Methods registered without an explicit kind race with cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DispatchKind {
    /// Call every provider at once; first success wins, losers keep running.
    Broadcast,
    /// Call every provider at once; first success cancels the rest.
    #[default]
    Concurrent,
    /// Call providers one at a time in listing order until one succeeds.
    Fallback,
}

/// Legacy labels accepted on input only. Both named the sequential strategy.
const LEGACY_LABELS: [(&str, DispatchKind); 2] = [
    ("exchange", DispatchKind::Fallback),
    ("indepotent", DispatchKind::Fallback),
];

impl DispatchKind {
    pub const ALL: [DispatchKind; 3] = [
        DispatchKind::Broadcast,
        DispatchKind::Concurrent,
        DispatchKind::Fallback,
    ];

    /// Return the wire-format string for this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchKind::Broadcast => "broadcast",
            DispatchKind::Concurrent => "concurrent",
            DispatchKind::Fallback => "fallback",
        }
    }

    /// Parse a wire label, accepting legacy aliases.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let label = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == label)
            .or_else(|| {
                LEGACY_LABELS
                    .iter()
                    .find(|(legacy, _)| *legacy == label)
                    .map(|(_, kind)| *kind)
            })
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid kind: '{s}'. Must be one of: broadcast, concurrent, fallback"
                ))
            })
    }
}

impl std::fmt::Display for DispatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DispatchKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DispatchKind {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for DispatchKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DispatchKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::parse(&label).map_err(serde::de::Error::custom)
    }
}
