//! Stage layering used by the write-down policy.
//!
//! Layers are ordered from lowest (index 0) to highest; stages sharing a
//! layer are peers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageLayers(Vec<Vec<String>>);

impl StageLayers {
    pub fn new(layers: Vec<Vec<String>>) -> Self {
        Self(layers)
    }

    /// Index of the layer containing `stage`
    pub fn layer_index(&self, stage: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|layer| layer.iter().any(|candidate| candidate == stage))
    }

    pub fn layer(&self, index: usize) -> &[String] {
        self.0.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Layer directly below `index`; empty for the lowest layer
    pub fn next_lower_layer(&self, index: usize) -> &[String] {
        index
            .checked_sub(1)
            .map(|lower| self.layer(lower))
            .unwrap_or_default()
    }

    pub fn is_lowest_layer(&self, index: usize) -> bool {
        index == 0
    }

    pub fn is_highest_layer(&self, index: usize) -> bool {
        index + 1 == self.0.len()
    }

    /// Every stage named by any layer
    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().flatten().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
