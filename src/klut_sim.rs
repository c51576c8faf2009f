// SPDX-License-Identifier: Apache-2.0

//! Simulation of k-LUT networks and simulation-based equivalence checks.

use std::collections::HashMap;

use bitvec::vec::BitVec;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::cutsel_error::CutselError;
use crate::klut::{KlutNetwork, KlutNode};
use crate::naming::NodeNames;
use crate::truth_table::TruthTable;

/// Networks with at most this many inputs are compared exhaustively.
pub const MAX_EXHAUSTIVE_INPUTS: usize = 16;

/// Evaluates every node for one primary input assignment (in declaration
/// order). The result is indexed by node id.
pub fn eval(ntk: &KlutNetwork, inputs: &[bool]) -> BitVec {
    assert_eq!(
        inputs.len(),
        ntk.num_inputs(),
        "expected one value per primary input"
    );
    let mut values: BitVec = BitVec::repeat(false, ntk.size());
    for (input, value) in ntk.inputs().iter().zip(inputs) {
        values.set(input.id, *value);
    }
    let mut scratch: Vec<bool> = Vec::new();
    for node in ntk.node_refs() {
        let value = match ntk.get(node) {
            KlutNode::Constant(v) => *v,
            KlutNode::Input => continue,
            KlutNode::Lut { fanins, function } => {
                scratch.clear();
                scratch.extend(fanins.iter().map(|f| values[f.id]));
                function.eval(&scratch)
            }
        };
        values.set(node.id, value);
    }
    values
}

/// Output values, in output declaration order.
pub fn eval_outputs(ntk: &KlutNetwork, inputs: &[bool]) -> Vec<bool> {
    let values = eval(ntk, inputs);
    ntk.outputs().iter().map(|o| values[o.node.id]).collect()
}

/// Global function of every node over the primary inputs, where variable `i`
/// is the `i`-th declared input.
pub fn simulate_truth_tables(ntk: &KlutNetwork) -> Vec<TruthTable> {
    let order: Vec<usize> = (0..ntk.num_inputs()).collect();
    simulate_with_input_order(ntk, &order, ntk.num_inputs())
}

/// Like [`simulate_truth_tables`] but input `i` is mapped to variable
/// `var_of_input[i]` of a `num_vars`-variable space.
fn simulate_with_input_order(
    ntk: &KlutNetwork,
    var_of_input: &[usize],
    num_vars: usize,
) -> Vec<TruthTable> {
    assert!(
        num_vars <= MAX_EXHAUSTIVE_INPUTS,
        "exhaustive simulation supports at most {} inputs, got {}",
        MAX_EXHAUSTIVE_INPUTS,
        num_vars
    );
    let mut input_var: HashMap<usize, usize> = HashMap::new();
    for (input, var) in ntk.inputs().iter().zip(var_of_input) {
        input_var.insert(input.id, *var);
    }
    let mut tts: Vec<TruthTable> = Vec::with_capacity(ntk.size());
    for node in ntk.node_refs() {
        let tt = match ntk.get(node) {
            KlutNode::Constant(v) => TruthTable::constant(num_vars, *v),
            KlutNode::Input => TruthTable::nth_var(num_vars, input_var[&node.id]),
            KlutNode::Lut { fanins, function } => {
                let operands: Vec<TruthTable> =
                    fanins.iter().map(|f| tts[f.id].clone()).collect();
                function.compose(&operands, num_vars)
            }
        };
        tts.push(tt);
    }
    tts
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquivOptions {
    /// Random samples drawn when the input count is too large for
    /// exhaustive comparison.
    pub samples: usize,
    pub seed: u64,
}

impl Default for EquivOptions {
    fn default() -> Self {
        Self {
            samples: 4096,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMismatch {
    pub name: String,
    /// A distinguishing assignment, in the left-hand network's input order.
    pub counterexample: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquivReport {
    pub outputs_checked: usize,
    pub mismatches: Vec<OutputMismatch>,
    /// Output names present in only one of the two networks.
    pub missing_outputs: Vec<String>,
    pub exhaustive: bool,
}

impl EquivReport {
    pub fn is_equivalent(&self) -> bool {
        self.mismatches.is_empty() && self.missing_outputs.is_empty()
    }
}

/// Compares the outputs of two networks by name. Inputs are matched by
/// display name and both networks must have the same input names.
pub fn check_equivalence(
    lhs: &KlutNetwork,
    rhs: &KlutNetwork,
    options: &EquivOptions,
) -> Result<EquivReport, CutselError> {
    let rhs_var_of_input = match_inputs(lhs, rhs)?;

    let rhs_outputs: HashMap<&str, usize> = rhs
        .outputs()
        .iter()
        .enumerate()
        .rev()
        .map(|(i, o)| (o.name.as_str(), i))
        .collect();
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let mut missing_outputs: Vec<String> = Vec::new();
    for (i, output) in lhs.outputs().iter().enumerate() {
        match rhs_outputs.get(output.name.as_str()) {
            Some(&j) => pairs.push((i, j)),
            None => missing_outputs.push(output.name.clone()),
        }
    }
    for output in rhs.outputs() {
        if !lhs.outputs().iter().any(|o| o.name == output.name) {
            missing_outputs.push(output.name.clone());
        }
    }

    let n = lhs.num_inputs();
    let exhaustive = n <= MAX_EXHAUSTIVE_INPUTS;
    let mismatches = if exhaustive {
        exhaustive_mismatches(lhs, rhs, &rhs_var_of_input, &pairs)
    } else {
        sampled_mismatches(lhs, rhs, &rhs_var_of_input, &pairs, options)
    };
    log::info!(
        "check_equivalence: outputs={} mismatches={} missing={} exhaustive={}",
        pairs.len(),
        mismatches.len(),
        missing_outputs.len(),
        exhaustive
    );
    Ok(EquivReport {
        outputs_checked: pairs.len(),
        mismatches,
        missing_outputs,
        exhaustive,
    })
}

/// For each rhs input, the position of the lhs input with the same name.
fn match_inputs(lhs: &KlutNetwork, rhs: &KlutNetwork) -> Result<Vec<usize>, CutselError> {
    if lhs.num_inputs() != rhs.num_inputs() {
        return Err(CutselError::InterfaceMismatch(format!(
            "input counts differ: {} vs {}",
            lhs.num_inputs(),
            rhs.num_inputs()
        )));
    }
    let lhs_names = NodeNames::build(lhs);
    let rhs_names = NodeNames::build(rhs);
    let lhs_position: HashMap<&str, usize> = lhs
        .inputs()
        .iter()
        .enumerate()
        .map(|(i, input)| (lhs_names.name(*input), i))
        .collect();
    rhs.inputs()
        .iter()
        .map(|input| {
            let name = rhs_names.name(*input);
            lhs_position.get(name).copied().ok_or_else(|| {
                CutselError::InterfaceMismatch(format!(
                    "input '{}' has no counterpart in '{}'",
                    name, lhs.name
                ))
            })
        })
        .collect()
}

fn exhaustive_mismatches(
    lhs: &KlutNetwork,
    rhs: &KlutNetwork,
    rhs_var_of_input: &[usize],
    pairs: &[(usize, usize)],
) -> Vec<OutputMismatch> {
    let n = lhs.num_inputs();
    let lhs_tts = simulate_truth_tables(lhs);
    let rhs_tts = simulate_with_input_order(rhs, rhs_var_of_input, n);
    let mut mismatches = Vec::new();
    for &(i, j) in pairs {
        let l = &lhs_tts[lhs.outputs()[i].node.id];
        let r = &rhs_tts[rhs.outputs()[j].node.id];
        if l == r {
            continue;
        }
        let diff = l.xor(r);
        let m = (0..diff.num_bits())
            .find(|&m| diff.get_bit(m))
            .unwrap_or_default();
        mismatches.push(OutputMismatch {
            name: lhs.outputs()[i].name.clone(),
            counterexample: (0..n).map(|v| (m >> v) & 1 == 1).collect(),
        });
    }
    mismatches
}

fn sampled_mismatches(
    lhs: &KlutNetwork,
    rhs: &KlutNetwork,
    rhs_var_of_input: &[usize],
    pairs: &[(usize, usize)],
    options: &EquivOptions,
) -> Vec<OutputMismatch> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(options.seed);
    let mut found: Vec<Option<Vec<bool>>> = vec![None; pairs.len()];
    for _ in 0..options.samples {
        let assignment: Vec<bool> = (0..lhs.num_inputs()).map(|_| rng.gen::<bool>()).collect();
        let rhs_assignment: Vec<bool> = rhs_var_of_input.iter().map(|&v| assignment[v]).collect();
        let l = eval_outputs(lhs, &assignment);
        let r = eval_outputs(rhs, &rhs_assignment);
        for (k, &(i, j)) in pairs.iter().enumerate() {
            if found[k].is_none() && l[i] != r[j] {
                found[k] = Some(assignment.clone());
            }
        }
    }
    pairs
        .iter()
        .zip(found)
        .filter_map(|(&(i, _), cex)| {
            cex.map(|counterexample| OutputMismatch {
                name: lhs.outputs()[i].name.clone(),
                counterexample,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{and_or_xor_network, full_adder_sum, ripple_adder, xor3};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_eval_full_adder() {
        let ntk = and_or_xor_network();
        for m in 0..8usize {
            let bits: Vec<bool> = (0..3).map(|i| (m >> i) & 1 == 1).collect();
            let ones = bits.iter().filter(|b| **b).count();
            assert_eq!(
                eval_outputs(&ntk, &bits),
                vec![ones % 2 == 1, ones >= 2],
                "assignment {:03b}",
                m
            );
        }
    }

    #[test]
    fn test_simulated_truth_tables() {
        let ntk = full_adder_sum();
        let tts = simulate_truth_tables(&ntk);
        assert_eq!(tts[ntk.outputs()[0].node.id], xor3());
        assert!(tts[0].is_const0());
        assert!(tts[1].is_const1());
    }

    #[test]
    fn test_equivalent_networks_with_reordered_inputs() {
        let lhs = full_adder_sum();
        let mut rhs = KlutNetwork::new("reordered");
        let cin = rhs.add_input(Some("cin".to_string()));
        let a = rhs.add_input(Some("a".to_string()));
        let b = rhs.add_input(Some("b".to_string()));
        let sum = rhs.add_lut(vec![cin, a, b], xor3());
        rhs.add_output(sum, "sum".to_string());
        let report = check_equivalence(&lhs, &rhs, &EquivOptions::default()).unwrap();
        assert!(report.is_equivalent());
        assert!(report.exhaustive);
        assert_eq!(report.outputs_checked, 1);
    }

    #[test]
    fn test_mismatch_reports_counterexample() {
        let lhs = full_adder_sum();
        let mut rhs = KlutNetwork::new("and3");
        let ins: Vec<_> = ["a", "b", "cin"]
            .iter()
            .map(|n| rhs.add_input(Some(n.to_string())))
            .collect();
        let f = TruthTable::from_hex(3, "80").unwrap();
        let sum = rhs.add_lut(ins, f);
        rhs.add_output(sum, "sum".to_string());
        let report = check_equivalence(&lhs, &rhs, &EquivOptions::default()).unwrap();
        assert!(!report.is_equivalent());
        let cex = &report.mismatches[0].counterexample;
        assert_ne!(eval_outputs(&lhs, cex), eval_outputs(&rhs, cex));
    }

    #[test]
    fn test_missing_outputs_and_input_mismatch() {
        let lhs = and_or_xor_network();
        let mut rhs = and_or_xor_network();
        rhs.add_output(rhs.inputs()[0], "extra".to_string());
        let report = check_equivalence(&lhs, &rhs, &EquivOptions::default()).unwrap();
        assert_eq!(report.missing_outputs, vec!["extra".to_string()]);
        assert!(!report.is_equivalent());

        let other = ripple_adder(1);
        assert!(matches!(
            check_equivalence(&lhs, &other, &EquivOptions::default()),
            Err(CutselError::InterfaceMismatch(_))
        ));
    }

    #[test]
    fn test_sampled_comparison_for_wide_networks() {
        let lhs = ripple_adder(9);
        let rhs = ripple_adder(9);
        let report = check_equivalence(
            &lhs,
            &rhs,
            &EquivOptions {
                samples: 256,
                seed: 1,
            },
        )
        .unwrap();
        assert!(!report.exhaustive);
        assert!(report.is_equivalent());
        assert_eq!(report.outputs_checked, 10);
    }
}
