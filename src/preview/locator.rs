use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque address of a remote document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Address for an embedded viewer frame, with the viewer toolbar hidden.
    pub fn frame_source(&self) -> String {
        format!("{}#toolbar=0", self.0)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Locator {
    fn from(address: &str) -> Self {
        Self(address.to_string())
    }
}

impl From<String> for Locator {
    fn from(address: String) -> Self {
        Self(address)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
