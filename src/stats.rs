// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;

use serde::Serialize;

use crate::klut::{KlutNetwork, KlutNode};

/// Logic level of every node: constants and inputs are at level 0, a LUT
/// is one above its deepest fan-in (a LUT without fan-ins is at level 0).
pub fn node_levels(ntk: &KlutNetwork) -> Vec<usize> {
    let mut levels = vec![0usize; ntk.size()];
    for node in ntk.node_refs() {
        if let KlutNode::Lut { fanins, .. } = ntk.get(node) {
            if let Some(deepest) = fanins.iter().map(|f| levels[f.id]).max() {
                levels[node.id] = deepest + 1;
            }
        }
    }
    levels
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KlutStats {
    pub inputs: usize,
    pub outputs: usize,
    pub luts: usize,
    pub edges: usize,
    pub max_fanin: usize,
    /// Deepest output level.
    pub depth: usize,
    /// `{fan-in count: number of LUTs}`.
    pub fanin_histogram: BTreeMap<usize, usize>,
}

pub fn compute_stats(ntk: &KlutNetwork) -> KlutStats {
    let levels = node_levels(ntk);
    let mut fanin_histogram = BTreeMap::new();
    let mut edges = 0usize;
    for node in ntk.node_refs() {
        if let KlutNode::Lut { fanins, .. } = ntk.get(node) {
            *fanin_histogram.entry(fanins.len()).or_insert(0) += 1;
            edges += fanins.len();
        }
    }
    KlutStats {
        inputs: ntk.num_inputs(),
        outputs: ntk.num_outputs(),
        luts: ntk.num_luts(),
        edges,
        max_fanin: fanin_histogram.keys().next_back().copied().unwrap_or(0),
        depth: ntk
            .outputs()
            .iter()
            .map(|o| levels[o.node.id])
            .max()
            .unwrap_or(0),
        fanin_histogram,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{and_or_xor_network, ripple_adder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_adder_stats() {
        let stats = compute_stats(&and_or_xor_network());
        assert_eq!(
            stats,
            KlutStats {
                inputs: 3,
                outputs: 2,
                luts: 5,
                edges: 10,
                max_fanin: 2,
                depth: 3,
                fanin_histogram: BTreeMap::from([(2, 5)]),
            }
        );
    }

    #[test]
    fn test_ripple_adder_depth_grows_with_width() {
        let narrow = compute_stats(&ripple_adder(2));
        let wide = compute_stats(&ripple_adder(4));
        assert!(wide.depth > narrow.depth);
        assert_eq!(wide.luts, 20);
    }
}
