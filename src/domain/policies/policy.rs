//! Policy definitions
//!
//! A policy is a kind (what it checks) plus an optional filter restricting
//! which instances it governs.

use crate::domain::value_objects::{Filter, StageLayers};

/// The rule a policy enforces
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyKind {
    /// Copying shared data requires both sides to run the same release
    SameRelease,
    /// Shared data may only flow to the same or the next lower stage layer
    StageWriteDown(StageLayers),
    /// Only whitelisted commitishes may be built
    ReleaseWhitelist { commitishes: Vec<String> },
}

impl PolicyKind {
    pub fn name(&self) -> &'static str {
        match self {
            PolicyKind::SameRelease => "same_release",
            PolicyKind::StageWriteDown(_) => "stage_write_down",
            PolicyKind::ReleaseWhitelist { .. } => "release_whitelist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Policy {
    kind: PolicyKind,
    filter: Option<Filter>,
}

impl Policy {
    pub fn new(kind: PolicyKind, filter: Option<Filter>) -> Self {
        Self { kind, filter }
    }

    pub fn same_release() -> Self {
        Self::new(PolicyKind::SameRelease, None)
    }

    pub fn stage_write_down(layers: StageLayers) -> Self {
        Self::new(PolicyKind::StageWriteDown(layers), None)
    }

    pub fn release_whitelist<I, S>(commitishes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            PolicyKind::ReleaseWhitelist {
                commitishes: commitishes.into_iter().map(Into::into).collect(),
            },
            None,
        )
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn kind(&self) -> &PolicyKind {
        &self.kind
    }

    pub fn filter(&self) -> Option<&Filter> {
        self.filter.as_ref()
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}
