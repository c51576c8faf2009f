// SPDX-License-Identifier: Apache-2.0

//! Materializes a new k-LUT network from a per-node cut selection.
//!
//! The original network is walked once in creation order. Constants and
//! primary inputs always get images. A selected LUT node is materialized as a
//! single LUT over the images of its chosen cut's leaves, realizing the cut's
//! truth table, provided every leaf already has an image. Unselected nodes get
//! no image, so anything whose chosen cut reaches through them is skipped.
//!
//! Anomalies are collected as [`RebuildDiagnostic`]s. In best-effort mode
//! they are logged and the rebuild continues; in strict mode the first one
//! aborts with [`CutselError::StrictRebuild`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cut_enum::{enumerate_cuts, Cut, CutEnumerationParams, NetworkCuts};
use crate::cutsel_error::CutselError;
use crate::export::{cut_key, CutFeatureArtifact};
use crate::klut::{KlutNetwork, KlutRef, CONST0, CONST1};
use crate::naming::NodeNames;
use crate::selection::{CutChoice, SelectionArtifact};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildDiagnostic {
    /// The selection names a node the network does not have.
    UnknownNode { name: String },
    /// The selection names a constant or primary input.
    NotInterior { name: String },
    CutIndexOutOfRange {
        node: String,
        index: usize,
        cut_count: usize,
    },
    UnknownCutKey { node: String, key: String },
    /// A leaf of the chosen cut was never materialized.
    MissingLeafImage { node: String, leaf: String },
    /// An output name resolves to no rebuilt node.
    UnresolvedOutput { name: String },
}

impl fmt::Display for RebuildDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebuildDiagnostic::UnknownNode { name } => {
                write!(f, "selection names unknown node '{}'", name)
            }
            RebuildDiagnostic::NotInterior { name } => write!(
                f,
                "selection names '{}', which is a constant or primary input; ignored",
                name
            ),
            RebuildDiagnostic::CutIndexOutOfRange {
                node,
                index,
                cut_count,
            } => write!(
                f,
                "node '{}': cut index {} out of range ({} cut(s))",
                node, index, cut_count
            ),
            RebuildDiagnostic::UnknownCutKey { node, key } => {
                write!(f, "node '{}': no cut with key '{}'", node, key)
            }
            RebuildDiagnostic::MissingLeafImage { node, leaf } => write!(
                f,
                "node '{}': leaf '{}' has not been rebuilt; node skipped",
                node, leaf
            ),
            RebuildDiagnostic::UnresolvedOutput { name } => {
                write!(f, "output '{}' does not resolve to a rebuilt node", name)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RebuildMode {
    #[default]
    BestEffort,
    Strict,
}

impl FromStr for RebuildMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best-effort" => Ok(RebuildMode::BestEffort),
            "strict" => Ok(RebuildMode::Strict),
            _ => Err(format!(
                "invalid rebuild mode '{}'; expected 'best-effort' or 'strict'",
                s
            )),
        }
    }
}

impl fmt::Display for RebuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RebuildMode::BestEffort => write!(f, "best-effort"),
            RebuildMode::Strict => write!(f, "strict"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildOptions {
    pub params: CutEnumerationParams,
    pub mode: RebuildMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebuildSummary {
    pub original_nodes: usize,
    pub rebuilt_nodes: usize,
    pub rebuilt_inputs: usize,
    pub rebuilt_outputs: usize,
    pub selected_nodes: usize,
}

impl fmt::Display for RebuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original nodes: {}", self.original_nodes)?;
        writeln!(f, "Rebuilt nodes:  {}", self.rebuilt_nodes)?;
        writeln!(f, "Rebuilt PIs:    {}", self.rebuilt_inputs)?;
        writeln!(f, "Rebuilt POs:    {}", self.rebuilt_outputs)?;
        write!(f, "Selected nodes: {}", self.selected_nodes)
    }
}

#[derive(Debug, Clone)]
pub struct RebuildResult {
    pub network: KlutNetwork,
    pub summary: RebuildSummary,
    /// Display names of the original nodes that were materialized, in
    /// creation order.
    pub materialized: Vec<String>,
    pub diagnostics: Vec<RebuildDiagnostic>,
}

/// Rebuilds `original` using the enumeration parameters and output list
/// recorded in `features`, so cut indices resolve against the same lists the
/// selector saw.
pub fn rebuild_from_artifacts(
    original: &KlutNetwork,
    features: &CutFeatureArtifact,
    selection: &SelectionArtifact,
    mode: RebuildMode,
) -> Result<RebuildResult, CutselError> {
    let options = RebuildOptions {
        params: features.enumeration_params(),
        mode,
    };
    rebuild_from_selection(original, &features.outputs, selection, &options)
}

pub fn rebuild_from_selection(
    original: &KlutNetwork,
    output_names: &[String],
    selection: &SelectionArtifact,
    options: &RebuildOptions,
) -> Result<RebuildResult, CutselError> {
    let names = NodeNames::build(original);
    let cuts = enumerate_cuts(original, &options.params)?;
    let mut rebuilder = Rebuilder::new(original, &names, &cuts, options.mode);

    let chosen = rebuilder.resolve_selection(selection)?;
    rebuilder.add_inputs();
    for node in original.node_refs() {
        if let Some(choice) = chosen.get(&node) {
            rebuilder.materialize(node, choice)?;
        }
    }
    for name in output_names {
        rebuilder.add_output(name)?;
    }
    Ok(rebuilder.finish())
}

struct Rebuilder<'a> {
    original: &'a KlutNetwork,
    names: &'a NodeNames,
    cuts: &'a NetworkCuts,
    mode: RebuildMode,
    network: KlutNetwork,
    /// Image of each original node, indexed by original id.
    translation: Vec<Option<KlutRef>>,
    input_images: HashMap<String, KlutRef>,
    materialized: Vec<String>,
    diagnostics: Vec<RebuildDiagnostic>,
}

impl<'a> Rebuilder<'a> {
    fn new(
        original: &'a KlutNetwork,
        names: &'a NodeNames,
        cuts: &'a NetworkCuts,
        mode: RebuildMode,
    ) -> Self {
        let network = KlutNetwork::new(&original.name);
        let mut translation = vec![None; original.size()];
        translation[CONST0.id] = Some(network.get_constant(false));
        translation[CONST1.id] = Some(network.get_constant(true));
        Self {
            original,
            names,
            cuts,
            mode,
            network,
            translation,
            input_images: HashMap::new(),
            materialized: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, diag: RebuildDiagnostic) -> Result<(), CutselError> {
        if self.mode == RebuildMode::Strict {
            return Err(CutselError::StrictRebuild(diag));
        }
        log::warn!("rebuild: {}", diag);
        self.diagnostics.push(diag);
        Ok(())
    }

    /// Maps selection entries onto LUT nodes of the original network.
    fn resolve_selection(
        &mut self,
        selection: &'a SelectionArtifact,
    ) -> Result<HashMap<KlutRef, &'a CutChoice>, CutselError> {
        let mut chosen = HashMap::new();
        for (name, choice) in &selection.chosen_cuts {
            match self.names.lookup(name) {
                None => self.report(RebuildDiagnostic::UnknownNode { name: name.clone() })?,
                Some(node) if !self.original.is_lut(node) => {
                    self.report(RebuildDiagnostic::NotInterior { name: name.clone() })?
                }
                Some(node) => {
                    chosen.insert(node, choice);
                }
            }
        }
        Ok(chosen)
    }

    fn add_inputs(&mut self) {
        for &input in self.original.inputs() {
            let name = self.names.name(input).to_string();
            let image = self.network.add_input(Some(name.clone()));
            self.translation[input.id] = Some(image);
            self.input_images.insert(name, image);
        }
    }

    fn find_cut(
        &mut self,
        node: KlutRef,
        choice: &CutChoice,
    ) -> Result<Option<&'a Cut>, CutselError> {
        let all: &'a NetworkCuts = self.cuts;
        let cuts: &'a [Cut] = all.cuts(node);
        let node_name = self.names.name(node).to_string();
        match choice {
            CutChoice::Index(index) => match cuts.get(*index) {
                Some(cut) => Ok(Some(cut)),
                None => {
                    self.report(RebuildDiagnostic::CutIndexOutOfRange {
                        node: node_name,
                        index: *index,
                        cut_count: cuts.len(),
                    })?;
                    Ok(None)
                }
            },
            CutChoice::Key(key) => {
                let names = self.names;
                match cuts.iter().find(|c| cut_key(c, names) == *key) {
                    Some(cut) => Ok(Some(cut)),
                    None => {
                        self.report(RebuildDiagnostic::UnknownCutKey {
                            node: node_name,
                            key: key.clone(),
                        })?;
                        Ok(None)
                    }
                }
            }
        }
    }

    fn materialize(&mut self, node: KlutRef, choice: &CutChoice) -> Result<(), CutselError> {
        let Some(cut) = self.find_cut(node, choice)? else {
            return Ok(());
        };
        let mut leaf_images = Vec::with_capacity(cut.size());
        for leaf in cut.leaves() {
            match self.translation[leaf.id] {
                Some(image) => leaf_images.push(image),
                None => {
                    return self.report(RebuildDiagnostic::MissingLeafImage {
                        node: self.names.name(node).to_string(),
                        leaf: self.names.name(*leaf).to_string(),
                    });
                }
            }
        }
        let name = self.names.name(node).to_string();
        let image = self.network.add_lut(leaf_images, cut.function().clone());
        self.network.set_name(image, name.clone());
        self.translation[node.id] = Some(image);
        log::debug!(
            "rebuild: %{}({}) -> %{} over {} leaf(s)",
            node.id,
            name,
            image.id,
            cut.size()
        );
        self.materialized.push(name);
        Ok(())
    }

    fn add_output(&mut self, name: &str) -> Result<(), CutselError> {
        let image = self
            .names
            .lookup(name)
            .and_then(|node| self.translation[node.id])
            .or_else(|| self.input_images.get(name).copied());
        match image {
            Some(image) => {
                self.network.add_output(image, name.to_string());
                Ok(())
            }
            None => self.report(RebuildDiagnostic::UnresolvedOutput {
                name: name.to_string(),
            }),
        }
    }

    fn finish(self) -> RebuildResult {
        let summary = RebuildSummary {
            original_nodes: self.original.size(),
            rebuilt_nodes: self.network.size(),
            rebuilt_inputs: self.network.num_inputs(),
            rebuilt_outputs: self.network.num_outputs(),
            selected_nodes: self.materialized.len(),
        };
        let stats = crate::stats::compute_stats(&self.network);
        log::info!(
            "rebuild: selected={} diagnostics={} luts={} depth={}",
            summary.selected_nodes,
            self.diagnostics.len(),
            stats.luts,
            stats.depth
        );
        RebuildResult {
            network: self.network,
            summary,
            materialized: self.materialized,
            diagnostics: self.diagnostics,
        }
    }
}
