// SPDX-License-Identifier: Apache-2.0

//! Display names for every node of a k-LUT network.
//!
//! Names are inherited where the network carries one and synthesized
//! otherwise:
//! - primary inputs: inherited name, else `pi<k>` where `k` counts only the
//!   unnamed inputs seen so far in declaration order;
//! - constants: `const0` / `const1`;
//! - LUT nodes: inherited name, else `n<index>`.
//!
//! Names are unique: a candidate that is already taken gets the first free
//! `_<j>` suffix (`j >= 1`). Naming depends only on the network, so separate
//! export and rebuild runs over the same network agree on every name.

use std::collections::HashMap;

use crate::klut::{KlutNetwork, KlutNode, KlutRef};

#[derive(Debug, Clone)]
pub struct NodeNames {
    names: Vec<String>,
    by_name: HashMap<String, KlutRef>,
}

impl NodeNames {
    pub fn build(ntk: &KlutNetwork) -> Self {
        let mut assigned: Vec<Option<String>> = vec![None; ntk.size()];
        let mut by_name: HashMap<String, KlutRef> = HashMap::new();

        let mut unnamed_inputs = 0usize;
        for &input in ntk.inputs() {
            let candidate = match ntk.get_name(input) {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => {
                    let synthesized = format!("pi{}", unnamed_inputs);
                    unnamed_inputs += 1;
                    synthesized
                }
            };
            assigned[input.id] = Some(claim(&mut by_name, input, candidate));
        }

        for node in ntk.node_refs() {
            if assigned[node.id].is_some() {
                continue;
            }
            let candidate = match ntk.get(node) {
                KlutNode::Constant(false) => "const0".to_string(),
                KlutNode::Constant(true) => "const1".to_string(),
                KlutNode::Input | KlutNode::Lut { .. } => match ntk.get_name(node) {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => format!("n{}", node.id),
                },
            };
            assigned[node.id] = Some(claim(&mut by_name, node, candidate));
        }

        let names = assigned
            .into_iter()
            .enumerate()
            .map(|(id, name)| name.unwrap_or_else(|| format!("n{}", id)))
            .collect();
        Self { names, by_name }
    }

    pub fn name(&self, node: KlutRef) -> &str {
        &self.names[node.id]
    }

    pub fn lookup(&self, name: &str) -> Option<KlutRef> {
        self.by_name.get(name).copied()
    }
}

fn claim(by_name: &mut HashMap<String, KlutRef>, node: KlutRef, candidate: String) -> String {
    if !by_name.contains_key(&candidate) {
        by_name.insert(candidate.clone(), node);
        return candidate;
    }
    let mut j = 1usize;
    let unique = loop {
        let attempt = format!("{}_{}", candidate, j);
        if !by_name.contains_key(&attempt) {
            break attempt;
        }
        j += 1;
    };
    log::warn!(
        "node %{} name '{}' is already taken; using '{}'",
        node.id,
        candidate,
        unique
    );
    by_name.insert(unique.clone(), node);
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::truth_table::TruthTable;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unnamed_inputs_count_only_unnamed() {
        let mut ntk = KlutNetwork::new("t");
        let a = ntk.add_input(None);
        let b = ntk.add_input(Some("b".to_string()));
        let c = ntk.add_input(None);
        let names = NodeNames::build(&ntk);
        assert_eq!(names.name(a), "pi0");
        assert_eq!(names.name(b), "b");
        assert_eq!(names.name(c), "pi1");
    }

    #[test]
    fn test_constants_and_internal_fallbacks() {
        let mut ntk = KlutNetwork::new("t");
        let a = ntk.add_input(Some("a".to_string()));
        let inv = ntk.add_lut(vec![a], TruthTable::nth_var(1, 0).not());
        let named = ntk.add_lut(vec![inv], TruthTable::nth_var(1, 0));
        ntk.set_name(named, "y".to_string());
        let names = NodeNames::build(&ntk);
        assert_eq!(names.name(KlutRef { id: 0 }), "const0");
        assert_eq!(names.name(KlutRef { id: 1 }), "const1");
        assert_eq!(names.name(inv), format!("n{}", inv.id));
        assert_eq!(names.name(named), "y");
        assert_eq!(names.lookup("y"), Some(named));
        assert_eq!(names.lookup("const1"), Some(KlutRef { id: 1 }));
    }

    #[test]
    fn test_collisions_are_disambiguated() {
        let mut ntk = KlutNetwork::new("t");
        // An inherited name that collides with a synthesized one.
        let named_pi0 = ntk.add_input(Some("pi0".to_string()));
        let unnamed = ntk.add_input(None);
        let lut = ntk.add_lut(vec![named_pi0, unnamed], TruthTable::nth_var(2, 0));
        ntk.set_name(lut, "pi0".to_string());
        let names = NodeNames::build(&ntk);
        assert_eq!(names.name(named_pi0), "pi0");
        assert_eq!(names.name(unnamed), "pi0_1");
        assert_eq!(names.name(lut), "pi0_2");
        assert_eq!(names.lookup("pi0"), Some(named_pi0));
        assert_eq!(names.lookup("pi0_1"), Some(unnamed));
        assert_eq!(names.lookup("pi0_2"), Some(lut));
    }

    #[test]
    fn test_names_are_reproducible() {
        let ntk = crate::test_utils::random_network(7, 4, 12, 3);
        let first = NodeNames::build(&ntk);
        let second = NodeNames::build(&ntk);
        for node in ntk.node_refs() {
            assert_eq!(first.name(node), second.name(node));
        }
    }
}
