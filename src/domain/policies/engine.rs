//! Policy Engine
//!
//! Routes each payload through every configured policy whose filter applies
//! and evaluates the rest. The first denial wins.

use tracing::{debug, warn};

use super::policy::{Policy, PolicyKind};
use crate::domain::entities::{CopyShared, Payload, Release};
use crate::domain::value_objects::{Filter, StageLayers};

/// Outcome of evaluating one policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(String),
}

/// A policy refused a payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyDenial {
    pub policy: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    policies: Vec<Policy>,
}

impl PolicyEngine {
    pub fn new(policies: Vec<Policy>) -> Self {
        Self { policies }
    }

    pub fn policies(&self) -> &[Policy] {
        &self.policies
    }

    /// Approve a payload only if every applicable policy allows it
    pub fn can_execute(&self, payload: &Payload) -> Result<(), PolicyDenial> {
        for policy in &self.policies {
            if !filter_applies(policy.filter(), payload) {
                debug!(policy = policy.name(), payload = %payload.describe(), "policy filter does not apply");
                continue;
            }

            if let Verdict::Deny(reason) = evaluate(policy.kind(), payload) {
                warn!(policy = policy.name(), payload = %payload.describe(), %reason, "policy denied payload");
                return Err(PolicyDenial {
                    policy: policy.name(),
                    reason,
                });
            }
        }
        Ok(())
    }
}

/// Whether a policy's filter governs the payload
fn filter_applies(filter: Option<&Filter>, payload: &Payload) -> bool {
    match payload {
        Payload::CopyShared(copy) => Filter::applies_to_either_of(filter, &copy.source, &copy.target),
        Payload::Deploy(deploy) => filter.map_or(true, |f| f.matches(&deploy.target)),
        Payload::Rollback(rollback) => filter.map_or(true, |f| f.matches(&rollback.target)),
        // builds have no instance; release policies ignore filters
        Payload::Release(_) => true,
    }
}

fn evaluate(kind: &PolicyKind, payload: &Payload) -> Verdict {
    match (kind, payload) {
        (PolicyKind::SameRelease, Payload::CopyShared(copy)) => same_release(copy),
        (PolicyKind::StageWriteDown(layers), Payload::CopyShared(copy)) => {
            stage_write_down(layers, copy)
        }
        (PolicyKind::ReleaseWhitelist { commitishes }, Payload::Release(release)) => {
            release_whitelist(commitishes, release)
        }
        (
            PolicyKind::SameRelease | PolicyKind::StageWriteDown(_),
            Payload::Deploy(_) | Payload::Rollback(_) | Payload::Release(_),
        ) => Verdict::Allow,
        (
            PolicyKind::ReleaseWhitelist { .. },
            Payload::Deploy(_) | Payload::Rollback(_) | Payload::CopyShared(_),
        ) => Verdict::Allow,
    }
}

fn same_release(copy: &CopyShared) -> Verdict {
    let Some(source) = copy.source.current_installation() else {
        return Verdict::Deny("source has no active installation.".to_string());
    };
    let Some(target) = copy.target.current_installation() else {
        return Verdict::Deny("target has no active installation.".to_string());
    };

    let source_release = source.release().name();
    let target_release = target.release().name();
    if source_release != target_release {
        return Verdict::Deny(format!(
            "source and target run different releases. source: {} target: {}.",
            source_release, target_release
        ));
    }

    Verdict::Allow
}

fn stage_write_down(layers: &StageLayers, copy: &CopyShared) -> Verdict {
    let source_stage = copy.source.stage();
    let target_stage = copy.target.stage();

    let Some(index) = layers.layer_index(source_stage) else {
        return Verdict::Deny(format!(
            "stage {} not found in specified layers; policy undecidable.",
            source_stage
        ));
    };

    if layers.is_highest_layer(index) || layers.is_lowest_layer(index) {
        return Verdict::Allow;
    }

    let reachable = layers
        .layer(index)
        .iter()
        .chain(layers.next_lower_layer(index))
        .any(|stage| stage == target_stage);
    if !reachable {
        return Verdict::Deny(format!(
            "target stage not within same or next lower stage as source stage. target stage {}, source stage {}.",
            target_stage, source_stage
        ));
    }

    Verdict::Allow
}

fn release_whitelist(commitishes: &[String], release: &Release) -> Verdict {
    if commitishes.iter().any(|c| c == release.commitish()) {
        Verdict::Allow
    } else {
        Verdict::Deny(format!(
            "commitish {} is not whitelisted.",
            release.commitish()
        ))
    }
}
