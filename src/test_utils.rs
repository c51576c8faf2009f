// SPDX-License-Identifier: Apache-2.0

//! Small k-LUT networks shared by unit and integration tests.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::klut::{KlutNetwork, KlutRef};
use crate::truth_table::TruthTable;

pub fn xor3() -> TruthTable {
    let a = TruthTable::nth_var(3, 0);
    let b = TruthTable::nth_var(3, 1);
    let c = TruthTable::nth_var(3, 2);
    a.xor(&b).xor(&c)
}

pub fn majority3() -> TruthTable {
    let a = TruthTable::nth_var(3, 0);
    let b = TruthTable::nth_var(3, 1);
    let c = TruthTable::nth_var(3, 2);
    a.and(&b).or(&a.and(&c)).or(&b.and(&c))
}

fn and2() -> TruthTable {
    TruthTable::nth_var(2, 0).and(&TruthTable::nth_var(2, 1))
}

fn or2() -> TruthTable {
    TruthTable::nth_var(2, 0).or(&TruthTable::nth_var(2, 1))
}

fn xor2() -> TruthTable {
    TruthTable::nth_var(2, 0).xor(&TruthTable::nth_var(2, 1))
}

fn named_lut(
    ntk: &mut KlutNetwork,
    fanins: Vec<KlutRef>,
    function: TruthTable,
    name: &str,
) -> KlutRef {
    let node = ntk.add_lut(fanins, function);
    ntk.set_name(node, name.to_string());
    node
}

/// `sum = a ^ b ^ cin` as a single 3-input LUT.
pub fn full_adder_sum() -> KlutNetwork {
    let mut ntk = KlutNetwork::new("full_adder_sum");
    let a = ntk.add_input(Some("a".to_string()));
    let b = ntk.add_input(Some("b".to_string()));
    let cin = ntk.add_input(Some("cin".to_string()));
    let sum = named_lut(&mut ntk, vec![a, b, cin], xor3(), "sum");
    ntk.add_output(sum, "sum".to_string());
    ntk
}

/// A full adder built from two-input LUTs:
///
/// ```text
/// t0 = a ^ b      sum  = t0 ^ cin
/// t1 = a & b      t2   = t0 & cin
///                 cout = t1 | t2
/// ```
pub fn and_or_xor_network() -> KlutNetwork {
    let mut ntk = KlutNetwork::new("full_adder_2lut");
    let a = ntk.add_input(Some("a".to_string()));
    let b = ntk.add_input(Some("b".to_string()));
    let cin = ntk.add_input(Some("cin".to_string()));
    let t0 = named_lut(&mut ntk, vec![a, b], xor2(), "t0");
    let t1 = named_lut(&mut ntk, vec![a, b], and2(), "t1");
    let sum = named_lut(&mut ntk, vec![t0, cin], xor2(), "sum");
    let t2 = named_lut(&mut ntk, vec![t0, cin], and2(), "t2");
    let cout = named_lut(&mut ntk, vec![t1, t2], or2(), "cout");
    ntk.add_output(sum, "sum".to_string());
    ntk.add_output(cout, "cout".to_string());
    ntk
}

/// A `bits`-wide ripple-carry adder of two-input LUTs with unnamed inputs.
/// Only the sum bits `s<i>` and the final `cout` are named; they are also the
/// outputs.
pub fn ripple_adder(bits: usize) -> KlutNetwork {
    let mut ntk = KlutNetwork::new(&format!("ripple_adder_{}", bits));
    let a: Vec<KlutRef> = (0..bits).map(|_| ntk.add_input(None)).collect();
    let b: Vec<KlutRef> = (0..bits).map(|_| ntk.add_input(None)).collect();
    let mut carry = ntk.get_constant(false);
    let mut sums = Vec::with_capacity(bits);
    for i in 0..bits {
        let p = ntk.add_lut(vec![a[i], b[i]], xor2());
        let g = ntk.add_lut(vec![a[i], b[i]], and2());
        sums.push(named_lut(&mut ntk, vec![p, carry], xor2(), &format!("s{}", i)));
        let pc = ntk.add_lut(vec![p, carry], and2());
        carry = ntk.add_lut(vec![g, pc], or2());
    }
    ntk.set_name(carry, "cout".to_string());
    for (i, s) in sums.into_iter().enumerate() {
        ntk.add_output(s, format!("s{}", i));
    }
    ntk.add_output(carry, "cout".to_string());
    ntk
}

/// A reproducible random network. Every LUT draws 1..=`max_fanin` fan-ins
/// from the inputs and earlier LUTs (duplicates allowed) and a random
/// function. Every other LUT gets a name; every fan-out-free LUT drives an
/// output named after it.
pub fn random_network(
    seed: u64,
    num_inputs: usize,
    num_luts: usize,
    max_fanin: usize,
) -> KlutNetwork {
    assert!(num_inputs > 0 && max_fanin > 0);
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut ntk = KlutNetwork::new(&format!("random_{}", seed));
    let mut pool: Vec<KlutRef> = (0..num_inputs)
        .map(|i| ntk.add_input(Some(format!("x{}", i))))
        .collect();
    let mut luts = Vec::with_capacity(num_luts);
    for i in 0..num_luts {
        let arity = rng.gen_range(1..=max_fanin);
        let fanins: Vec<KlutRef> = (0..arity)
            .map(|_| pool[rng.gen_range(0..pool.len())])
            .collect();
        let function = TruthTable::from_fn(arity, |_| rng.gen::<bool>());
        let node = ntk.add_lut(fanins, function);
        if i % 2 == 0 {
            ntk.set_name(node, format!("g{}", i));
        }
        pool.push(node);
        luts.push(node);
    }
    let fanouts = ntk.fanout_counts();
    for node in luts {
        if fanouts[node.id] == 0 {
            let name = match ntk.get_name(node) {
                Some(name) => name.to_string(),
                None => format!("n{}", node.id),
            };
            ntk.add_output(node, name);
        }
    }
    ntk
}
