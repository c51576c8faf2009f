// SPDX-License-Identifier: Apache-2.0

//! Cut feature export: per-node candidate cuts with cost features, serialized
//! as the JSON artifact handed to the external cut selector.

use serde::{Deserialize, Serialize};

use crate::cut_enum::{
    enumerate_cuts, Cut, CutEnumerationParams, DEFAULT_CUT_LIMIT, DEFAULT_FANIN_LIMIT,
};
use crate::cutsel_error::CutselError;
use crate::klut::{KlutNetwork, KlutRef};
use crate::naming::NodeNames;
use crate::truth_table::TruthTable;

/// Every cut is modeled as a single logic level.
pub const DEPTH_COST_PER_CUT: u32 = 1;

/// Number of variables in which `tt` is binate, i.e. for which the function
/// needs both the true and the complemented literal.
pub fn compute_inversion_cost(tt: &TruthTable) -> u32 {
    let mut cost = 0;
    for var in 0..tt.num_vars() {
        let cof0 = tt.cofactor0(var);
        let cof1 = tt.cofactor1(var);
        let falls = cof0.and(&cof1.not());
        let rises = cof1.and(&cof0.not());
        if !falls.is_const0() && !rises.is_const0() {
            cost += 1;
        }
    }
    cost
}

/// Content-derived identity of a cut: positional leaf names, then the truth
/// table in hex, e.g. `a,b,cin:96`.
pub fn cut_key(cut: &Cut, names: &NodeNames) -> String {
    let leaves: Vec<&str> = cut.leaves().iter().map(|l| names.name(*l)).collect();
    format!("{}:{}", leaves.join(","), cut.function().to_hex())
}

/// Display names of the nodes treated as primary outputs.
///
/// Declared outputs name their driver nodes. A network without declared
/// outputs falls back to every fan-out-free non-constant node.
pub fn primary_output_names(ntk: &KlutNetwork, names: &NodeNames) -> Vec<String> {
    if ntk.num_outputs() > 0 {
        return ntk
            .outputs()
            .iter()
            .map(|o| names.name(o.node).to_string())
            .collect();
    }
    log::warn!(
        "network '{}' declares no primary outputs; treating fan-out-free nodes as outputs",
        ntk.name
    );
    let fanouts = ntk.fanout_counts();
    ntk.node_refs()
        .filter(|n| !ntk.is_constant(*n) && fanouts[n.id] == 0)
        .map(|n| names.name(n).to_string())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutFeatures {
    pub area_cost: u32,
    pub depth_cost: u32,
    pub inv_cost: u32,
    #[serde(default)]
    pub key: String,
    pub leaves: Vec<String>,
    #[serde(default)]
    pub truth_table: String,
}

impl CutFeatures {
    fn from_cut(cut: &Cut, names: &NodeNames) -> Self {
        Self {
            area_cost: cut.size() as u32,
            depth_cost: DEPTH_COST_PER_CUT,
            inv_cost: compute_inversion_cost(cut.function()),
            key: cut_key(cut, names),
            leaves: cut
                .leaves()
                .iter()
                .map(|l| names.name(*l).to_string())
                .collect(),
            truth_table: cut.function().to_hex(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCutFeatures {
    pub cuts: Vec<CutFeatures>,
    pub index: usize,
    pub name: String,
}

/// The exported artifact. Field order is alphabetical so the pretty-printed
/// JSON is stable across runs.
///
/// All four enumeration settings are recorded so that a rebuild re-derives
/// the exact cut lists the selector indexed into. Artifacts that predate a
/// setting get the library default for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutFeatureArtifact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cut_limit: Option<usize>,
    pub cuts_per_node: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fanin_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimize_truth_table: Option<bool>,
    pub nodes: Vec<NodeCutFeatures>,
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl CutFeatureArtifact {
    pub fn from_json_str(text: &str) -> Result<Self, CutselError> {
        serde_json::from_str(text).map_err(|e| CutselError::Artifact {
            what: "cut feature artifact",
            msg: e.to_string(),
        })
    }

    pub fn to_json_string(&self) -> Result<String, CutselError> {
        serde_json::to_string_pretty(self).map_err(|e| CutselError::Artifact {
            what: "cut feature artifact",
            msg: e.to_string(),
        })
    }

    /// Enumeration parameters the artifact was exported with.
    pub fn enumeration_params(&self) -> CutEnumerationParams {
        CutEnumerationParams {
            cut_size: self.cuts_per_node,
            cut_limit: self.cut_limit.unwrap_or(DEFAULT_CUT_LIMIT),
            fanin_limit: self.fanin_limit.unwrap_or(DEFAULT_FANIN_LIMIT),
            minimize_truth_table: self.minimize_truth_table.unwrap_or(true),
        }
    }

    pub fn total_cuts(&self) -> usize {
        self.nodes.iter().map(|n| n.cuts.len()).sum()
    }
}

pub fn export_cut_features(
    ntk: &KlutNetwork,
    params: &CutEnumerationParams,
) -> Result<CutFeatureArtifact, CutselError> {
    let names = NodeNames::build(ntk);
    let cuts = enumerate_cuts(ntk, params)?;
    let outputs = primary_output_names(ntk, &names);

    let nodes: Vec<NodeCutFeatures> = ntk
        .node_refs()
        .filter(|n| ntk.is_lut(*n))
        .map(|node: KlutRef| NodeCutFeatures {
            cuts: cuts
                .cuts(node)
                .iter()
                .map(|c| CutFeatures::from_cut(c, &names))
                .collect(),
            index: node.id,
            name: names.name(node).to_string(),
        })
        .collect();

    log::info!(
        "export_cut_features: PIs={} POs={} nodes={} cuts={} K={} L={}",
        ntk.num_inputs(),
        outputs.len(),
        nodes.len(),
        cuts.total_cuts(),
        params.cut_size,
        params.cut_limit
    );

    Ok(CutFeatureArtifact {
        cut_limit: Some(params.cut_limit),
        cuts_per_node: params.cut_size,
        fanin_limit: Some(params.fanin_limit),
        minimize_truth_table: Some(params.minimize_truth_table),
        nodes,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{full_adder_sum, random_network};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("96", 3, 3; "xor3")]
    #[test_case("80", 3, 0; "and3")]
    #[test_case("e8", 3, 0; "majority")]
    #[test_case("ca", 3, 1; "mux")]
    #[test_case("1", 1, 0; "not")]
    #[test_case("6", 2, 2; "xor2")]
    #[test_case("0", 0, 0; "const0")]
    fn test_inversion_cost(hex: &str, num_vars: usize, want: u32) {
        let tt = TruthTable::from_hex(num_vars, hex).unwrap();
        assert_eq!(compute_inversion_cost(&tt), want);
    }

    #[test]
    fn test_full_adder_sum_export() {
        let ntk = full_adder_sum();
        let params = CutEnumerationParams {
            cut_size: 3,
            ..Default::default()
        };
        let artifact = export_cut_features(&ntk, &params).unwrap();
        assert_eq!(artifact.cuts_per_node, 3);
        assert_eq!(artifact.cut_limit, Some(32));
        assert_eq!(artifact.outputs, vec!["sum".to_string()]);
        assert_eq!(artifact.nodes.len(), 1);
        let node = &artifact.nodes[0];
        assert_eq!(node.name, "sum");
        assert_eq!(node.index, 5);
        assert_eq!(
            node.cuts[0],
            CutFeatures {
                area_cost: 3,
                depth_cost: 1,
                inv_cost: 3,
                key: "a,b,cin:96".to_string(),
                leaves: vec!["a".to_string(), "b".to_string(), "cin".to_string()],
                truth_table: "96".to_string(),
            }
        );
        assert_eq!(node.cuts[1].leaves, vec!["sum".to_string()]);
        assert_eq!(node.cuts[1].inv_cost, 0);
    }

    #[test]
    fn test_outputs_fall_back_to_fanout_free_nodes() {
        let mut ntk = KlutNetwork::new("no_outputs");
        let a = ntk.add_input(Some("a".to_string()));
        let b = ntk.add_input(Some("b".to_string()));
        let _unused = ntk.add_input(Some("c".to_string()));
        let and = ntk.add_lut(vec![a, b], TruthTable::from_hex(2, "8").unwrap());
        ntk.set_name(and, "y".to_string());
        let names = NodeNames::build(&ntk);
        assert_eq!(
            primary_output_names(&ntk, &names),
            vec!["c".to_string(), "y".to_string()]
        );
    }

    #[test]
    fn test_export_json_is_byte_identical_across_runs() {
        let ntk = random_network(5, 6, 25, 3);
        let params = CutEnumerationParams::default();
        let first = export_cut_features(&ntk, &params)
            .unwrap()
            .to_json_string()
            .unwrap();
        let second = export_cut_features(&ntk, &params)
            .unwrap()
            .to_json_string()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_json_keys_are_alphabetical_and_round_trip() {
        let artifact = export_cut_features(&full_adder_sum(), &CutEnumerationParams::default())
            .unwrap();
        let text = artifact.to_json_string().unwrap();
        let top_keys: Vec<usize> = [
            "\"cut_limit\"",
            "\"cuts_per_node\"",
            "\"fanin_limit\"",
            "\"minimize_truth_table\"",
            "\"nodes\"",
            "\"outputs\"",
        ]
        .iter()
        .map(|k| text.find(k).unwrap())
        .collect();
        assert!(top_keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(CutFeatureArtifact::from_json_str(&text).unwrap(), artifact);
    }

    #[test]
    fn test_minimal_artifact_uses_defaults() {
        let text = r#"{"cuts_per_node": 3, "nodes": []}"#;
        let artifact = CutFeatureArtifact::from_json_str(text).unwrap();
        assert_eq!(artifact.cut_limit, None);
        assert!(artifact.outputs.is_empty());
        assert_eq!(
            artifact.enumeration_params(),
            CutEnumerationParams {
                cut_size: 3,
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_artifact_records_every_enumeration_setting() {
        let params = CutEnumerationParams {
            cut_size: 3,
            cut_limit: 5,
            fanin_limit: 2,
            minimize_truth_table: false,
        };
        let artifact = export_cut_features(&full_adder_sum(), &params).unwrap();
        let text = artifact.to_json_string().unwrap();
        assert!(text.contains("\"fanin_limit\": 2"));
        assert!(text.contains("\"minimize_truth_table\": false"));
        let reloaded = CutFeatureArtifact::from_json_str(&text).unwrap();
        assert_eq!(reloaded.enumeration_params(), params);
    }

    #[test]
    fn test_artifact_missing_required_field_is_rejected() {
        let err = CutFeatureArtifact::from_json_str(r#"{"nodes": []}"#).unwrap_err();
        assert!(matches!(err, CutselError::Artifact { .. }));
        assert!(err.to_string().contains("cuts_per_node"));
    }
}
