//! Instance filter - selects instances by server, environment and stage.
//!
//! Parsed from a target specification `<servers>:<environments>:<stages>`
//! where each segment is a comma-separated list, `*`, or omitted.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::entities::Instance;

/// Malformed target specification
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("target specification '{spec}' has more than three ':'-separated segments")]
    TooManySegments { spec: String },

    #[error("target specification '{spec}' contains an empty list entry")]
    EmptyEntry { spec: String },
}

/// Inclusion predicate over instance identity.
///
/// An empty set on a dimension matches everything on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    servers: BTreeSet<String>,
    environments: BTreeSet<String>,
    stages: BTreeSet<String>,
}

impl Filter {
    pub fn new<S, E, T>(servers: S, environments: E, stages: T) -> Self
    where
        S: IntoIterator,
        S::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
        T: IntoIterator,
        T::Item: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
            environments: environments.into_iter().map(Into::into).collect(),
            stages: stages.into_iter().map(Into::into).collect(),
        }
    }

    /// Filter matching every instance
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching exactly one identity triple
    pub fn exact(server: &str, environment: &str, stage: &str) -> Self {
        Self::new([server], [environment], [stage])
    }

    /// Parse a target specification
    pub fn parse(spec: &str) -> Result<Self, FilterError> {
        let segments: Vec<&str> = spec.trim().split(':').collect();
        if segments.len() > 3 {
            return Err(FilterError::TooManySegments {
                spec: spec.to_string(),
            });
        }

        let mut dimensions = segments
            .into_iter()
            .map(|segment| parse_segment(segment, spec));
        let servers = dimensions.next().transpose()?.unwrap_or_default();
        let environments = dimensions.next().transpose()?.unwrap_or_default();
        let stages = dimensions.next().transpose()?.unwrap_or_default();

        Ok(Self {
            servers,
            environments,
            stages,
        })
    }

    pub fn matches(&self, instance: &Instance) -> bool {
        self.matches_identity(
            instance.server_name(),
            instance.environment_name(),
            instance.stage(),
        )
    }

    /// Match against an identity triple without a loaded instance
    pub fn matches_identity(&self, server: &str, environment: &str, stage: &str) -> bool {
        dimension_matches(&self.servers, server)
            && dimension_matches(&self.environments, environment)
            && dimension_matches(&self.stages, stage)
    }

    /// Whether a (possibly absent) filter governs a two-instance operation.
    ///
    /// An absent filter is global and always applies.
    pub fn applies_to_either_of(filter: Option<&Filter>, a: &Instance, b: &Instance) -> bool {
        filter.map_or(true, |filter| filter.matches(a) || filter.matches(b))
    }

    pub fn is_match_all(&self) -> bool {
        self.servers.is_empty() && self.environments.is_empty() && self.stages.is_empty()
    }

    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(String::as_str)
    }
}

fn parse_segment(segment: &str, spec: &str) -> Result<BTreeSet<String>, FilterError> {
    let segment = segment.trim();
    if segment.is_empty() || segment == "*" {
        return Ok(BTreeSet::new());
    }

    segment
        .split(',')
        .map(str::trim)
        .map(|entry| {
            if entry.is_empty() {
                Err(FilterError::EmptyEntry {
                    spec: spec.to_string(),
                })
            } else {
                Ok(entry.to_string())
            }
        })
        .collect()
}

fn dimension_matches(allowed: &BTreeSet<String>, value: &str) -> bool {
    allowed.is_empty() || allowed.contains(value)
}

impl FromStr for Filter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Filter::parse(s)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn segment(values: &BTreeSet<String>) -> String {
            if values.is_empty() {
                "*".to_string()
            } else {
                values.iter().cloned().collect::<Vec<_>>().join(",")
            }
        }
        write!(
            f,
            "{}:{}:{}",
            segment(&self.servers),
            segment(&self.environments),
            segment(&self.stages)
        )
    }
}
