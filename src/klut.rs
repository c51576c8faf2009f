// SPDX-License-Identifier: Apache-2.0

//! k-input lookup-table ("k-LUT") networks.
//!
//! Every internal node owns an arbitrary Boolean function of its fan-ins,
//! stored as a truth table whose variable `i` is fan-in `i`. Edges carry no
//! complement attribute; inversions live inside the truth tables.
//!
//! Node 0 is always constant-0 and node 1 is always constant-1. Nodes are
//! appended in creation order and a LUT may only reference nodes created
//! before it, so creation order is a topological order.

use std::fmt;

use crate::truth_table::TruthTable;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct KlutRef {
    pub id: usize,
}

pub const CONST0: KlutRef = KlutRef { id: 0 };
pub const CONST1: KlutRef = KlutRef { id: 1 };

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KlutNode {
    Constant(bool),
    Input,
    Lut {
        fanins: Vec<KlutRef>,
        function: TruthTable,
    },
}

impl KlutNode {
    pub fn get_fanins(&self) -> &[KlutRef] {
        match self {
            KlutNode::Constant(_) | KlutNode::Input => &[],
            KlutNode::Lut { fanins, .. } => fanins,
        }
    }
}

/// A named primary output referencing the node that drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KlutOutput {
    pub name: String,
    pub node: KlutRef,
}

#[derive(Debug, Clone)]
pub struct KlutNetwork {
    pub name: String,
    nodes: Vec<KlutNode>,
    /// Names inherited from the input format (or given by the builder).
    names: Vec<Option<String>>,
    inputs: Vec<KlutRef>,
    outputs: Vec<KlutOutput>,
}

impl KlutNetwork {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: vec![KlutNode::Constant(false), KlutNode::Constant(true)],
            names: vec![None, None],
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn get_constant(&self, value: bool) -> KlutRef {
        if value {
            CONST1
        } else {
            CONST0
        }
    }

    pub fn add_input(&mut self, name: Option<String>) -> KlutRef {
        let node = self.push(KlutNode::Input);
        self.names[node.id] = name;
        self.inputs.push(node);
        node
    }

    /// Appends a LUT node.
    ///
    /// Panics if a fan-in does not refer to an existing node or if the
    /// function's variable count differs from the fan-in count.
    pub fn add_lut(&mut self, fanins: Vec<KlutRef>, function: TruthTable) -> KlutRef {
        assert_eq!(
            fanins.len(),
            function.num_vars(),
            "LUT fan-in count {} does not match truth table variable count {}",
            fanins.len(),
            function.num_vars()
        );
        for fanin in &fanins {
            self.validate_ref(*fanin);
        }
        self.push(KlutNode::Lut { fanins, function })
    }

    pub fn add_output(&mut self, node: KlutRef, name: String) {
        self.validate_ref(node);
        self.outputs.push(KlutOutput { name, node });
    }

    fn push(&mut self, node: KlutNode) -> KlutRef {
        let r = KlutRef {
            id: self.nodes.len(),
        };
        self.nodes.push(node);
        self.names.push(None);
        r
    }

    pub fn set_name(&mut self, node: KlutRef, name: String) {
        self.validate_ref(node);
        self.names[node.id] = Some(name);
    }

    pub fn get_name(&self, node: KlutRef) -> Option<&str> {
        self.names[node.id].as_deref()
    }

    pub fn get(&self, node: KlutRef) -> &KlutNode {
        &self.nodes[node.id]
    }

    /// Total node count including both constants.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    pub fn num_luts(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, KlutNode::Lut { .. }))
            .count()
    }

    pub fn inputs(&self) -> &[KlutRef] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[KlutOutput] {
        &self.outputs
    }

    pub fn is_constant(&self, node: KlutRef) -> bool {
        matches!(self.get(node), KlutNode::Constant(_))
    }

    pub fn is_input(&self, node: KlutRef) -> bool {
        matches!(self.get(node), KlutNode::Input)
    }

    pub fn is_lut(&self, node: KlutRef) -> bool {
        matches!(self.get(node), KlutNode::Lut { .. })
    }

    /// All node references in creation (topological) order.
    pub fn node_refs(&self) -> impl Iterator<Item = KlutRef> {
        (0..self.nodes.len()).map(|id| KlutRef { id })
    }

    /// Number of LUT fan-in references to each node. Primary outputs are not
    /// counted.
    pub fn fanout_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.nodes.len()];
        for node in &self.nodes {
            for fanin in node.get_fanins() {
                counts[fanin.id] += 1;
            }
        }
        counts
    }

    /// Checks that the given KlutRef is in-bounds for this network.
    pub fn validate_ref(&self, node: KlutRef) {
        assert!(
            node.id < self.nodes.len(),
            "KlutRef out of bounds: {:?} (nodes.len() = {})",
            node,
            self.nodes.len()
        );
    }
}

impl fmt::Display for KlutNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node_str = |r: KlutRef| match self.get_name(r) {
            Some(name) => format!("%{}({})", r.id, name),
            None => format!("%{}", r.id),
        };
        let inputs = self
            .inputs
            .iter()
            .map(|i| node_str(*i))
            .collect::<Vec<String>>()
            .join(", ");
        let outputs = self
            .outputs
            .iter()
            .map(|o| o.name.clone())
            .collect::<Vec<String>>()
            .join(", ");
        writeln!(f, "klut {}({}) -> ({}) {{", self.name, inputs, outputs)?;
        for r in self.node_refs() {
            if let KlutNode::Lut { fanins, function } = self.get(r) {
                let args = fanins
                    .iter()
                    .map(|a| format!("%{}", a.id))
                    .collect::<Vec<String>>()
                    .join(", ");
                writeln!(f, "  {} = lut[{}]({})", node_str(r), function, args)?;
            }
        }
        for output in &self.outputs {
            writeln!(f, "  {} = %{}", output.name, output.node.id)?;
        }
        write!(f, "}}")
    }
}
