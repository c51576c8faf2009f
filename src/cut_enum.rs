// SPDX-License-Identifier: Apache-2.0

//! Bounded-size cut enumeration with truth tables for k-LUT networks.
//!
//! Nodes are visited in creation order. A node's cuts are formed by merging
//! one cut from each of its fan-ins (every combination, in lexicographic
//! mixed-radix order with the last fan-in varying fastest), computing the
//! node's function over the merged support, and keeping the resulting set
//! free of dominated cuts. Each set is sorted by size with ties kept in
//! discovery order, truncated to `cut_limit - 1` and then closed with the
//! trivial unit cut `{node}`.
//!
//! The result is a pure function of `(network, params)`: callers may
//! reference cuts by their position and expect a later run to reproduce it.

use serde::{Deserialize, Serialize};

use crate::cutsel_error::CutselError;
use crate::klut::{KlutNetwork, KlutNode, KlutRef};
use crate::truth_table::{TruthTable, MAX_VARS};

pub const DEFAULT_CUT_SIZE: usize = 4;
pub const DEFAULT_CUT_LIMIT: usize = 32;
pub const DEFAULT_FANIN_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutEnumerationParams {
    /// Maximum number of leaves in a cut (K).
    pub cut_size: usize,

    /// Maximum number of cuts kept per node, trivial cut included (L).
    pub cut_limit: usize,

    /// Nodes with more fan-ins than this only receive the trivial cut.
    pub fanin_limit: usize,

    /// Whether to drop leaves the cut function does not depend on.
    pub minimize_truth_table: bool,
}

impl Default for CutEnumerationParams {
    fn default() -> Self {
        Self {
            cut_size: DEFAULT_CUT_SIZE,
            cut_limit: DEFAULT_CUT_LIMIT,
            fanin_limit: DEFAULT_FANIN_LIMIT,
            minimize_truth_table: true,
        }
    }
}

impl CutEnumerationParams {
    pub fn validate(&self) -> Result<(), CutselError> {
        if self.cut_size == 0 || self.cut_size > MAX_VARS {
            return Err(CutselError::InvalidParams(format!(
                "cut_size must be in 1..={}, got {}",
                MAX_VARS, self.cut_size
            )));
        }
        if self.cut_limit == 0 {
            return Err(CutselError::InvalidParams(
                "cut_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cut {
    /// Sorted ascending; variable `i` of `function` is `leaves[i]`.
    leaves: Vec<KlutRef>,
    function: TruthTable,
}

impl Cut {
    pub fn new(leaves: Vec<KlutRef>, function: TruthTable) -> Self {
        debug_assert!(leaves.windows(2).all(|w| w[0] < w[1]));
        debug_assert_eq!(leaves.len(), function.num_vars());
        Self { leaves, function }
    }

    /// The cut `{node}` with the identity function.
    pub fn unit(node: KlutRef) -> Self {
        Self {
            leaves: vec![node],
            function: TruthTable::nth_var(1, 0),
        }
    }

    fn empty(function: TruthTable) -> Self {
        debug_assert_eq!(function.num_vars(), 0);
        Self {
            leaves: Vec::new(),
            function,
        }
    }

    pub fn leaves(&self) -> &[KlutRef] {
        &self.leaves
    }

    pub fn function(&self) -> &TruthTable {
        &self.function
    }

    pub fn size(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_trivial_for(&self, node: KlutRef) -> bool {
        self.leaves.len() == 1 && self.leaves[0] == node
    }

    /// A cut dominates another if its leaves are a subset of the other's.
    pub fn dominates(&self, other: &Cut) -> bool {
        leaves_subset(&self.leaves, &other.leaves)
    }
}

fn leaves_subset(sub: &[KlutRef], sup: &[KlutRef]) -> bool {
    sub.len() <= sup.len() && sub.iter().all(|l| sup.binary_search(l).is_ok())
}

/// Sorted union of two leaf sets; `None` once more than `cut_size` leaves
/// would be needed.
fn merge_leaves(lhs: &[KlutRef], rhs: &[KlutRef], cut_size: usize) -> Option<Vec<KlutRef>> {
    let mut merged = Vec::with_capacity(std::cmp::min(lhs.len() + rhs.len(), cut_size));
    let mut j = 0usize;
    for &l in lhs {
        while j < rhs.len() && rhs[j] < l {
            if merged.len() == cut_size {
                return None;
            }
            merged.push(rhs[j]);
            j += 1;
        }
        if j < rhs.len() && rhs[j] == l {
            j += 1;
        }
        if merged.len() == cut_size {
            return None;
        }
        merged.push(l);
    }
    while j < rhs.len() {
        if merged.len() == cut_size {
            return None;
        }
        merged.push(rhs[j]);
        j += 1;
    }
    Some(merged)
}

/// Position of every element of `sub` inside the sorted superset `sup`.
fn positions_in(sub: &[KlutRef], sup: &[KlutRef]) -> Vec<usize> {
    sub.iter()
        .map(|l| sup.partition_point(|x| x < l))
        .collect()
}

/// Advances `digits` to the next mixed-radix tuple, last digit fastest.
/// Returns false after the final tuple.
fn advance_mixed_radix(digits: &mut [usize], radices: &[usize]) -> bool {
    for j in (0..digits.len()).rev() {
        digits[j] += 1;
        if digits[j] < radices[j] {
            return true;
        }
        digits[j] = 0;
    }
    false
}

fn is_dominated(set: &[Cut], leaves: &[KlutRef]) -> bool {
    set.iter().any(|c| leaves_subset(&c.leaves, leaves))
}

/// Inserts `cut` into a size-sorted, domination-free set.
fn insert_cut(set: &mut Vec<Cut>, cut: Cut) {
    if is_dominated(set, &cut.leaves) {
        return;
    }
    set.retain(|c| !cut.dominates(c));
    let pos = set.partition_point(|c| c.size() <= cut.size());
    set.insert(pos, cut);
}

/// Cuts for every node of a network, indexed by node id.
#[derive(Debug, Clone)]
pub struct NetworkCuts {
    per_node: Vec<Vec<Cut>>,
    params: CutEnumerationParams,
}

impl NetworkCuts {
    pub fn cuts(&self, node: KlutRef) -> &[Cut] {
        &self.per_node[node.id]
    }

    pub fn params(&self) -> &CutEnumerationParams {
        &self.params
    }

    pub fn total_cuts(&self) -> usize {
        self.per_node.iter().map(|c| c.len()).sum()
    }
}

pub fn enumerate_cuts(
    ntk: &KlutNetwork,
    params: &CutEnumerationParams,
) -> Result<NetworkCuts, CutselError> {
    params.validate()?;
    let mut per_node: Vec<Vec<Cut>> = Vec::with_capacity(ntk.size());
    for node in ntk.node_refs() {
        let cuts = match ntk.get(node) {
            KlutNode::Constant(value) => vec![Cut::empty(TruthTable::constant(0, *value))],
            KlutNode::Input => vec![Cut::unit(node)],
            KlutNode::Lut { fanins, function } if fanins.is_empty() => {
                vec![Cut::empty(function.clone())]
            }
            KlutNode::Lut { fanins, function } => {
                lut_cuts(node, fanins, function, &per_node, params)
            }
        };
        debug_assert!(cuts.len() <= params.cut_limit || cuts.len() == 1);
        per_node.push(cuts);
    }
    let result = NetworkCuts {
        per_node,
        params: *params,
    };
    log::info!(
        "enumerate_cuts: nodes={} total_cuts={} cut_size={} cut_limit={}",
        ntk.size(),
        result.total_cuts(),
        params.cut_size,
        params.cut_limit
    );
    Ok(result)
}

fn lut_cuts(
    node: KlutRef,
    fanins: &[KlutRef],
    function: &TruthTable,
    per_node: &[Vec<Cut>],
    params: &CutEnumerationParams,
) -> Vec<Cut> {
    let mut set: Vec<Cut> = Vec::new();
    if fanins.len() <= params.fanin_limit {
        let child_sets: Vec<&[Cut]> = fanins.iter().map(|f| per_node[f.id].as_slice()).collect();
        let radices: Vec<usize> = child_sets.iter().map(|s| s.len()).collect();
        if radices.iter().all(|&r| r > 0) {
            let mut digits = vec![0usize; fanins.len()];
            loop {
                let choice: Vec<&Cut> = digits
                    .iter()
                    .zip(child_sets.iter())
                    .map(|(&d, s)| &s[d])
                    .collect();
                if let Some(cut) = merge_choice(&set, &choice, function, params) {
                    insert_cut(&mut set, cut);
                }
                if !advance_mixed_radix(&mut digits, &radices) {
                    break;
                }
            }
        }
        set.truncate(params.cut_limit.saturating_sub(1));
    } else {
        log::debug!(
            "node %{} has {} fan-ins (limit {}); only the trivial cut is kept",
            node.id,
            fanins.len(),
            params.fanin_limit
        );
    }
    if set.is_empty() || set.len() > 1 || set[0].size() > 1 {
        set.push(Cut::unit(node));
    }
    set
}

/// Merges one cut per fan-in into a candidate cut for the node, or `None` if
/// the merged support is too large or already dominated.
fn merge_choice(
    set: &[Cut],
    choice: &[&Cut],
    function: &TruthTable,
    params: &CutEnumerationParams,
) -> Option<Cut> {
    let mut leaves: Vec<KlutRef> = Vec::new();
    for cut in choice {
        leaves = merge_leaves(&leaves, cut.leaves(), params.cut_size)?;
    }
    if is_dominated(set, &leaves) {
        return None;
    }

    let num_vars = leaves.len();
    let operands: Vec<TruthTable> = choice
        .iter()
        .map(|cut| {
            let positions = positions_in(cut.leaves(), &leaves);
            cut.function().expand(&positions, num_vars)
        })
        .collect();
    let composed = function.compose(&operands, num_vars);

    if !params.minimize_truth_table {
        return Some(Cut::new(leaves, composed));
    }
    let (shrunk, support) = composed.min_base();
    if support.len() == leaves.len() {
        return Some(Cut::new(leaves, shrunk));
    }
    let kept: Vec<KlutRef> = support.iter().map(|&v| leaves[v]).collect();
    Some(Cut::new(kept, shrunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{and_or_xor_network, full_adder_sum};
    use pretty_assertions::assert_eq;

    fn r(id: usize) -> KlutRef {
        KlutRef { id }
    }

    #[test]
    fn test_merge_leaves_sorted_union_with_limit() {
        assert_eq!(
            merge_leaves(&[r(2), r(5)], &[r(3), r(5)], 3),
            Some(vec![r(2), r(3), r(5)])
        );
        assert_eq!(merge_leaves(&[r(2), r(5)], &[r(3), r(6)], 3), None);
        assert_eq!(merge_leaves(&[], &[r(4)], 1), Some(vec![r(4)]));
    }

    #[test]
    fn test_advance_mixed_radix_last_digit_fastest() {
        let radices = [2, 3];
        let mut digits = vec![0, 0];
        let mut seen = vec![digits.clone()];
        while advance_mixed_radix(&mut digits, &radices) {
            seen.push(digits.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2]
            ]
        );
    }

    #[test]
    fn test_insert_cut_keeps_set_domination_free() {
        let mut set = Vec::new();
        insert_cut(
            &mut set,
            Cut::new(vec![r(2), r(3), r(4)], TruthTable::const0(3)),
        );
        insert_cut(&mut set, Cut::new(vec![r(2), r(3)], TruthTable::const0(2)));
        insert_cut(
            &mut set,
            Cut::new(vec![r(2), r(3), r(7)], TruthTable::const0(3)),
        );
        insert_cut(&mut set, Cut::new(vec![r(5)], TruthTable::const0(1)));
        let leaves: Vec<Vec<KlutRef>> = set.iter().map(|c| c.leaves().to_vec()).collect();
        assert_eq!(leaves, vec![vec![r(5)], vec![r(2), r(3)]]);
    }

    #[test]
    fn test_full_adder_sum_cuts() {
        let ntk = full_adder_sum();
        let params = CutEnumerationParams {
            cut_size: 3,
            ..Default::default()
        };
        let cuts = enumerate_cuts(&ntk, &params).unwrap();
        let sum = ntk.outputs()[0].node;
        let sum_cuts = cuts.cuts(sum);
        assert_eq!(sum_cuts.len(), 2);
        assert_eq!(sum_cuts[0].leaves(), ntk.inputs());
        assert_eq!(sum_cuts[0].function().to_hex(), "96");
        assert!(sum_cuts[1].is_trivial_for(sum));
        for input in ntk.inputs() {
            assert_eq!(cuts.cuts(*input), &[Cut::unit(*input)]);
        }
    }

    #[test]
    fn test_cut_size_too_small_leaves_only_trivial_cut() {
        let ntk = full_adder_sum();
        let params = CutEnumerationParams {
            cut_size: 2,
            ..Default::default()
        };
        let cuts = enumerate_cuts(&ntk, &params).unwrap();
        let sum = ntk.outputs()[0].node;
        assert_eq!(cuts.cuts(sum), &[Cut::unit(sum)]);
    }

    #[test]
    fn test_cut_limit_bounds_every_node() {
        let ntk = and_or_xor_network();
        for cut_limit in 1..5 {
            let params = CutEnumerationParams {
                cut_limit,
                ..Default::default()
            };
            let cuts = enumerate_cuts(&ntk, &params).unwrap();
            for node in ntk.node_refs() {
                assert!(cuts.cuts(node).len() <= std::cmp::max(cut_limit, 1));
                for cut in cuts.cuts(node) {
                    assert!(cut.size() <= params.cut_size);
                }
            }
        }
    }

    #[test]
    fn test_cut_functions_agree_with_node_function() {
        // Each cut function, evaluated on simulated leaf values, must equal the
        // simulated node value for every primary input assignment.
        let ntk = crate::test_utils::random_network(11, 5, 20, 3);
        let cuts = enumerate_cuts(&ntk, &CutEnumerationParams::default()).unwrap();
        let n = ntk.num_inputs();
        for m in 0..(1usize << n) {
            let assignment: Vec<bool> = (0..n).map(|i| (m >> i) & 1 == 1).collect();
            let values = crate::klut_sim::eval(&ntk, &assignment);
            for node in ntk.node_refs() {
                for cut in cuts.cuts(node) {
                    let leaf_values: Vec<bool> =
                        cut.leaves().iter().map(|l| values[l.id]).collect();
                    assert_eq!(
                        cut.function().eval(&leaf_values),
                        values[node.id],
                        "node %{} cut {:?}",
                        node.id,
                        cut.leaves()
                    );
                }
            }
        }
    }

    #[test]
    fn test_minimization_drops_redundant_leaf() {
        // y = a & !a | b  ==  b
        let mut ntk = KlutNetwork::new("t");
        let a = ntk.add_input(Some("a".to_string()));
        let b = ntk.add_input(Some("b".to_string()));
        let x0 = TruthTable::nth_var(3, 0);
        let x1 = TruthTable::nth_var(3, 1);
        let x2 = TruthTable::nth_var(3, 2);
        let f = x0.and(&x1.not()).or(&x2);
        let y = ntk.add_lut(vec![a, a, b], f);
        let cuts = enumerate_cuts(&ntk, &CutEnumerationParams::default()).unwrap();
        assert_eq!(cuts.cuts(y)[0].leaves(), &[b]);
        assert_eq!(cuts.cuts(y)[0].function(), &TruthTable::nth_var(1, 0));
        // A single one-leaf cut does not get the trivial cut appended.
        assert_eq!(cuts.cuts(y).len(), 1);

        let unminimized = enumerate_cuts(
            &ntk,
            &CutEnumerationParams {
                minimize_truth_table: false,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(unminimized.cuts(y)[0].leaves(), &[a, b]);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let ntk = full_adder_sum();
        for params in [
            CutEnumerationParams {
                cut_size: 0,
                ..Default::default()
            },
            CutEnumerationParams {
                cut_limit: 0,
                ..Default::default()
            },
        ] {
            assert!(matches!(
                enumerate_cuts(&ntk, &params),
                Err(CutselError::InvalidParams(_))
            ));
        }
    }

    #[test]
    fn test_enumeration_is_deterministic() {
        let ntk = crate::test_utils::random_network(3, 6, 30, 4);
        let params = CutEnumerationParams::default();
        let first = enumerate_cuts(&ntk, &params).unwrap();
        let second = enumerate_cuts(&ntk, &params).unwrap();
        for node in ntk.node_refs() {
            assert_eq!(first.cuts(node), second.cuts(node));
        }
    }
}
