use serde::{Deserialize, Serialize};

/// Opaque button resource issued by the widget provider.
///
/// Owned exclusively by the orchestrator while a checkout UI is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ButtonHandle(pub u64);

/// Opaque controller resource, paired 1:1 with a [`ButtonHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControllerHandle(pub u64);

/// Opaque identifier returned by the transfer-initiation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequestId(String);

impl TokenRequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifies one mount cycle. Every asynchronous completion carries the
/// generation it was issued under; completions with a stale generation are
/// dropped instead of acting on the pair that replaced theirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(pub u64);
