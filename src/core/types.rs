use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque entity identifier. Identity is by id only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Fresh random id, used by in-process backends.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Trailing `n` characters, used for short display names.
    pub fn tail(&self, n: usize) -> &str {
        let count = self.0.chars().count();
        if count <= n {
            return &self.0;
        }
        let skip = count - n;
        let (offset, _) = self
            .0
            .char_indices()
            .nth(skip)
            .unwrap_or((0, ' '));
        &self.0[offset..]
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for EntityId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The five entity kinds mirrored by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Project,
    Activity,
    Metric,
    Report,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Project,
        EntityKind::Activity,
        EntityKind::Metric,
        EntityKind::Report,
        EntityKind::User,
    ];

    /// Collection name, as used in logs and by the CLI.
    pub fn collection_name(&self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Activity => "activities",
            EntityKind::Metric => "metrics",
            EntityKind::Report => "reports",
            EntityKind::User => "users",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Project => "project",
            EntityKind::Activity => "activity",
            EntityKind::Metric => "metric",
            EntityKind::Report => "report",
            EntityKind::User => "user",
        };
        f.write_str(name)
    }
}
