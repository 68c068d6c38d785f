//! Release entity - a build identified by a commit or branch.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A build of the application, identified by its source `commitish`.
///
/// When no human name is given the commitish doubles as the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Release {
    commitish: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Release {
    /// Create a release; an empty name counts as no name.
    pub fn new(commitish: impl Into<String>, name: Option<String>) -> Self {
        Self {
            commitish: commitish.into(),
            name: name.filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn commitish(&self) -> &str {
        &self.commitish
    }

    /// The release name, falling back to the commitish.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.commitish)
    }

    /// File name of the packaged release (`<name>.tar.gz`, path separators flattened).
    pub fn archive_name(&self) -> String {
        let stem: String = self
            .name()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '-' } else { c })
            .collect();
        format!("{}.tar.gz", stem)
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
