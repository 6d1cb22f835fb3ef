//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated node identifier.
///
/// Opaque handle for a station or access point. The traffic core never looks
/// inside it; it only passes node handles back to the application layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Handle for an application installed by the application layer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "App({})", self.0)
    }
}

/// Identifier of one simulated network (a BSS with its own stations).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NetworkId(pub u32);

impl NetworkId {
    /// Letter label used by scenario descriptions ("A", "B", ...).
    pub fn label(self) -> char {
        char::from_u32('A' as u32 + self.0 % 26).unwrap_or('?')
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Network({})", self.label())
    }
}
