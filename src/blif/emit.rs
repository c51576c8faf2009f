// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::fmt::Write;

use crate::klut::{KlutNetwork, KlutNode, KlutRef};
use crate::naming::NodeNames;

/// Renders `ntk` as BLIF. Every LUT becomes a `.names` with one cube per
/// minterm of its function; nets are the nodes' display names.
pub fn emit_blif(ntk: &KlutNetwork) -> String {
    let names = NodeNames::build(ntk);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, ".model {}", ntk.name);
    let inputs: Vec<&str> = ntk.inputs().iter().map(|i| names.name(*i)).collect();
    let _ = writeln!(out, ".inputs {}", inputs.join(" "));

    let mut seen_outputs: HashSet<&str> = HashSet::new();
    let mut outputs = Vec::new();
    for output in ntk.outputs() {
        if seen_outputs.insert(output.name.as_str()) {
            outputs.push(output);
        } else {
            log::warn!(
                "emit_blif: duplicate output '{}' dropped",
                output.name
            );
        }
    }
    let output_names: Vec<&str> = outputs.iter().map(|o| o.name.as_str()).collect();
    let _ = writeln!(out, ".outputs {}", output_names.join(" "));

    let mut referenced_constants = [false; 2];
    for node in ntk.node_refs() {
        for fanin in ntk.get(node).get_fanins() {
            if ntk.is_constant(*fanin) {
                referenced_constants[fanin.id] = true;
            }
        }
    }
    for output in &outputs {
        if ntk.is_constant(output.node) {
            referenced_constants[output.node.id] = true;
        }
    }
    for (id, used) in referenced_constants.iter().enumerate() {
        if *used {
            let node = KlutRef { id };
            let _ = writeln!(out, ".names {}", names.name(node));
            if id == 1 {
                let _ = writeln!(out, "1");
            }
        }
    }

    for node in ntk.node_refs() {
        if let KlutNode::Lut { fanins, function } = ntk.get(node) {
            let mut header: Vec<&str> = fanins.iter().map(|f| names.name(*f)).collect();
            header.push(names.name(node));
            let _ = writeln!(out, ".names {}", header.join(" "));
            for m in 0..function.num_bits() {
                if !function.get_bit(m) {
                    continue;
                }
                if fanins.is_empty() {
                    let _ = writeln!(out, "1");
                    continue;
                }
                let cube: String = (0..fanins.len())
                    .map(|i| if (m >> i) & 1 == 1 { '1' } else { '0' })
                    .collect();
                let _ = writeln!(out, "{} 1", cube);
            }
        }
    }

    for output in &outputs {
        let driver = names.name(output.node);
        if driver != output.name {
            let _ = writeln!(out, ".names {} {}", driver, output.name);
            let _ = writeln!(out, "1 1");
        }
    }
    out.push_str(".end\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blif::parse::parse_blif;
    use crate::klut_sim::{check_equivalence, EquivOptions};
    use crate::test_utils::{full_adder_sum, random_network, ripple_adder};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_emit_full_adder_sum() {
        let text = emit_blif(&full_adder_sum());
        assert_eq!(
            text,
            ".model full_adder_sum
.inputs a b cin
.outputs sum
.names a b cin sum
100 1
010 1
001 1
111 1
.end
"
        );
    }

    #[test]
    fn test_round_trip_preserves_function() {
        for ntk in [ripple_adder(3), random_network(21, 5, 18, 4)] {
            let text = emit_blif(&ntk);
            let parsed = parse_blif(&text).unwrap();
            assert_eq!(parsed.num_inputs(), ntk.num_inputs());
            assert_eq!(parsed.num_outputs(), ntk.num_outputs());
            let report = check_equivalence(&ntk, &parsed, &EquivOptions::default()).unwrap();
            assert!(report.is_equivalent(), "{:?}", report);
        }
    }

    #[test]
    fn test_constant_and_renamed_outputs_get_buffers() {
        let mut ntk = KlutNetwork::new("bufs");
        let a = ntk.add_input(Some("a".to_string()));
        ntk.add_output(ntk.get_constant(true), "one".to_string());
        ntk.add_output(a, "a_out".to_string());
        let text = emit_blif(&ntk);
        assert!(text.contains(".names const1\n1\n"));
        assert!(text.contains(".names const1 one\n1 1\n"));
        assert!(text.contains(".names a a_out\n1 1\n"));
        let parsed = parse_blif(&text).unwrap();
        assert_eq!(crate::klut_sim::eval_outputs(&parsed, &[false]), vec![true, false]);
    }
}
