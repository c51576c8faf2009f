// SPDX-License-Identifier: Apache-2.0

//! The selection artifact: which cut the external selector chose per node.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cutsel_error::CutselError;
use crate::export::CutFeatureArtifact;

/// A chosen cut, named by position in the node's cut list or by its content
/// key (`<leaf names joined by ','>:<truth table hex>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CutChoice {
    Index(usize),
    Key(String),
}

impl fmt::Display for CutChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CutChoice::Index(i) => write!(f, "#{}", i),
            CutChoice::Key(k) => write!(f, "'{}'", k),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionArtifact {
    pub chosen_cuts: BTreeMap<String, CutChoice>,
}

impl SelectionArtifact {
    pub fn from_json_str(text: &str) -> Result<Self, CutselError> {
        serde_json::from_str(text).map_err(|e| CutselError::Artifact {
            what: "selection artifact",
            msg: e.to_string(),
        })
    }

    pub fn to_json_string(&self) -> Result<String, CutselError> {
        serde_json::to_string_pretty(self).map_err(|e| CutselError::Artifact {
            what: "selection artifact",
            msg: e.to_string(),
        })
    }

    /// Chooses cut 0 for every node of `features` that has at least one cut.
    pub fn trivial_for(features: &CutFeatureArtifact) -> Self {
        let chosen_cuts = features
            .nodes
            .iter()
            .filter(|n| !n.cuts.is_empty())
            .map(|n| (n.name.clone(), CutChoice::Index(0)))
            .collect();
        Self { chosen_cuts }
    }

    pub fn insert(&mut self, node: &str, choice: CutChoice) -> Option<CutChoice> {
        self.chosen_cuts.insert(node.to_string(), choice)
    }

    pub fn remove(&mut self, node: &str) -> Option<CutChoice> {
        self.chosen_cuts.remove(node)
    }

    pub fn len(&self) -> usize {
        self.chosen_cuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen_cuts.is_empty()
    }
}
