//! Instance paths locating a value inside the validated tree.
//!
//! Keys render as `.key`, sequence positions as `[index]`, so a tag inside
//! a user record reads `.user.tags[2]`. The root is the empty path.

use std::fmt;

use serde::{Serialize, Serializer};

/// Location of a value within the input tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstancePath(String);

impl InstancePath {
    /// The path of the value passed to the top-level call.
    pub fn root() -> Self {
        Self::default()
    }

    /// Path of the map entry `key` below this one.
    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}.{key}", self.0))
    }

    /// Path of the sequence element `index` below this one.
    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for InstancePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
