// SPDX-License-Identifier: Apache-2.0

//! Single-output Boolean function truth tables over a dynamic number of
//! variables.
//!
//! We represent a Boolean function `f(x0, .., x{n-1}) -> o` as `2^n` bits
//! where bit `m` holds the output value on the input assignment encoded by
//! `m`:
//! - `x0 = (m >> 0) & 1`
//! - `x1 = (m >> 1) & 1`
//! - ...
//!
//! That is, `x0` is the least-significant selector bit and toggles fastest.
//! Hex renderings put the most significant nibble first, so the 3-input XOR
//! is `96` and the single-variable identity is `2`.

use std::fmt;

use bitvec::vec::BitVec;

/// Largest variable count we are willing to materialize.
pub const MAX_VARS: usize = 24;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    num_vars: usize,
    bits: BitVec,
}

impl TruthTable {
    pub fn const0(num_vars: usize) -> Self {
        Self::constant(num_vars, false)
    }

    pub fn const1(num_vars: usize) -> Self {
        Self::constant(num_vars, true)
    }

    pub fn constant(num_vars: usize, value: bool) -> Self {
        assert!(
            num_vars <= MAX_VARS,
            "TruthTable::constant num_vars {} exceeds MAX_VARS {}",
            num_vars,
            MAX_VARS
        );
        Self {
            num_vars,
            bits: BitVec::repeat(value, 1usize << num_vars),
        }
    }

    /// Returns the projection function for variable `var` in an
    /// `num_vars`-variable space.
    pub fn nth_var(num_vars: usize, var: usize) -> Self {
        assert!(
            var < num_vars,
            "TruthTable::nth_var index {} out of range for {} variables",
            var,
            num_vars
        );
        Self::from_fn(num_vars, |m| (m >> var) & 1 == 1)
    }

    /// Builds a table by evaluating `f` on every assignment index.
    pub fn from_fn(num_vars: usize, mut f: impl FnMut(usize) -> bool) -> Self {
        assert!(
            num_vars <= MAX_VARS,
            "TruthTable::from_fn num_vars {} exceeds MAX_VARS {}",
            num_vars,
            MAX_VARS
        );
        let bits: BitVec = (0..(1usize << num_vars)).map(|m| f(m)).collect();
        Self { num_vars, bits }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    #[inline]
    pub fn get_bit(&self, assignment_index: usize) -> bool {
        self.bits[assignment_index]
    }

    #[inline]
    pub fn set_bit(&mut self, assignment_index: usize, value: bool) {
        self.bits.set(assignment_index, value);
    }

    /// Evaluates the function on an explicit assignment; `assignment[i]` is
    /// the value of variable `i`.
    pub fn eval(&self, assignment: &[bool]) -> bool {
        assert_eq!(assignment.len(), self.num_vars);
        let index = assignment
            .iter()
            .enumerate()
            .fold(0usize, |acc, (i, &v)| acc | ((v as usize) << i));
        self.get_bit(index)
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_const0(&self) -> bool {
        self.bits.not_any()
    }

    pub fn is_const1(&self) -> bool {
        self.bits.all()
    }

    #[must_use]
    pub fn not(&self) -> Self {
        Self {
            num_vars: self.num_vars,
            bits: self.bits.iter().by_vals().map(|b| !b).collect(),
        }
    }

    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a & b)
    }

    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a | b)
    }

    #[must_use]
    pub fn xor(&self, other: &Self) -> Self {
        self.zip_with(other, |a, b| a ^ b)
    }

    fn zip_with(&self, other: &Self, op: impl Fn(bool, bool) -> bool) -> Self {
        assert_eq!(
            self.num_vars, other.num_vars,
            "truth table variable counts differ"
        );
        Self {
            num_vars: self.num_vars,
            bits: self
                .bits
                .iter()
                .by_vals()
                .zip(other.bits.iter().by_vals())
                .map(|(a, b)| op(a, b))
                .collect(),
        }
    }

    /// Negative cofactor with respect to `var`; the result keeps the same
    /// variable count and no longer depends on `var`.
    #[must_use]
    pub fn cofactor0(&self, var: usize) -> Self {
        assert!(var < self.num_vars);
        Self::from_fn(self.num_vars, |m| self.get_bit(m & !(1usize << var)))
    }

    /// Positive cofactor with respect to `var`.
    #[must_use]
    pub fn cofactor1(&self, var: usize) -> Self {
        assert!(var < self.num_vars);
        Self::from_fn(self.num_vars, |m| self.get_bit(m | (1usize << var)))
    }

    /// Returns whether the function depends on `var`.
    pub fn has_var(&self, var: usize) -> bool {
        assert!(var < self.num_vars);
        let mask = 1usize << var;
        (0..self.num_bits())
            .filter(|m| m & mask == 0)
            .any(|m| self.get_bit(m) != self.get_bit(m | mask))
    }

    /// Variables the function actually depends on, ascending.
    pub fn support(&self) -> Vec<usize> {
        (0..self.num_vars).filter(|&v| self.has_var(v)).collect()
    }

    /// Removes variables outside the functional support.
    ///
    /// Returns the shrunk table together with the original indices of the
    /// variables that were kept; variable `j` of the result is variable
    /// `support[j]` of `self`.
    pub fn min_base(&self) -> (TruthTable, Vec<usize>) {
        let support = self.support();
        if support.len() == self.num_vars {
            return (self.clone(), support);
        }
        let shrunk = Self::from_fn(support.len(), |m| {
            let full = support
                .iter()
                .enumerate()
                .filter(|(j, _)| (m >> j) & 1 == 1)
                .fold(0usize, |acc, (_, &v)| acc | (1usize << v));
            self.get_bit(full)
        });
        (shrunk, support)
    }

    /// Re-expresses this function in a larger variable space: variable `j` of
    /// `self` becomes variable `positions[j]` of the result.
    #[must_use]
    pub fn expand(&self, positions: &[usize], num_vars: usize) -> Self {
        assert_eq!(positions.len(), self.num_vars);
        debug_assert!(positions.iter().all(|&p| p < num_vars));
        Self::from_fn(num_vars, |m| {
            let local = positions
                .iter()
                .enumerate()
                .filter(|&(_, &p)| (m >> p) & 1 == 1)
                .fold(0usize, |acc, (j, _)| acc | (1usize << j));
            self.get_bit(local)
        })
    }

    /// Composes this function with `inputs`: the result is
    /// `self(inputs[0](x), .., inputs[k-1](x))` over `num_vars` variables.
    #[must_use]
    pub fn compose(&self, inputs: &[TruthTable], num_vars: usize) -> Self {
        assert_eq!(
            inputs.len(),
            self.num_vars,
            "compose: expected {} operand tables",
            self.num_vars
        );
        debug_assert!(inputs.iter().all(|t| t.num_vars == num_vars));
        Self::from_fn(num_vars, |m| {
            let index = inputs
                .iter()
                .enumerate()
                .filter(|(_, t)| t.get_bit(m))
                .fold(0usize, |acc, (j, _)| acc | (1usize << j));
            self.get_bit(index)
        })
    }

    pub fn to_hex(&self) -> String {
        let digits = std::cmp::max(1, self.num_bits() / 4);
        let mut s = String::with_capacity(digits);
        for d in (0..digits).rev() {
            let nibble = (0..4)
                .map(|b| 4 * d + b)
                .filter(|&i| i < self.num_bits() && self.get_bit(i))
                .fold(0u32, |acc, i| acc | (1 << (i - 4 * d)));
            s.push(std::char::from_digit(nibble, 16).unwrap_or('0'));
        }
        s
    }

    /// Parses the hex rendering produced by `to_hex`; an optional `0x` prefix
    /// is accepted.
    pub fn from_hex(num_vars: usize, text: &str) -> Result<Self, String> {
        let digits_text = text.strip_prefix("0x").unwrap_or(text);
        let mut tt = Self::const0(num_vars);
        let digits = std::cmp::max(1, tt.num_bits() / 4);
        if digits_text.len() != digits {
            return Err(format!(
                "expected {} hex digit(s) for a {}-variable truth table, got '{}'",
                digits, num_vars, text
            ));
        }
        for (pos, c) in digits_text.chars().enumerate() {
            let nibble = c
                .to_digit(16)
                .ok_or_else(|| format!("invalid hex digit '{}' in '{}'", c, text))?;
            let d = digits - 1 - pos;
            for b in 0..4 {
                if (nibble >> b) & 1 == 0 {
                    continue;
                }
                let i = 4 * d + b;
                if i >= tt.num_bits() {
                    return Err(format!(
                        "hex value '{}' sets bits beyond a {}-variable truth table",
                        text, num_vars
                    ));
                }
                tt.set_bit(i, true);
            }
        }
        Ok(tt)
    }
}

impl fmt::Display for TruthTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn xor3() -> TruthTable {
        let a = TruthTable::nth_var(3, 0);
        let b = TruthTable::nth_var(3, 1);
        let c = TruthTable::nth_var(3, 2);
        a.xor(&b).xor(&c)
    }

    #[test_case(1, 0, "2"; "identity")]
    #[test_case(2, 0, "a"; "x0 of two")]
    #[test_case(2, 1, "c"; "x1 of two")]
    #[test_case(3, 2, "f0"; "x2 of three")]
    #[test_case(4, 3, "ff00"; "x3 of four")]
    fn test_nth_var_hex(num_vars: usize, var: usize, want: &str) {
        assert_eq!(TruthTable::nth_var(num_vars, var).to_hex(), want);
    }

    #[test]
    fn test_xor3_is_0x96() {
        assert_eq!(xor3().to_hex(), "96");
        assert_eq!(format!("{}", xor3()), "0x96");
    }

    #[test]
    fn test_constants_render_one_digit_minimum() {
        assert_eq!(TruthTable::const0(0).to_hex(), "0");
        assert_eq!(TruthTable::const1(0).to_hex(), "1");
        assert_eq!(TruthTable::const1(1).to_hex(), "3");
    }

    #[test]
    fn test_from_hex_accepts_prefix_and_rejects_overflow() {
        assert_eq!(TruthTable::from_hex(3, "0x96").unwrap(), xor3());
        assert!(TruthTable::from_hex(1, "7").is_err());
        assert!(TruthTable::from_hex(3, "096").is_err());
        assert!(TruthTable::from_hex(3, "9g").is_err());
    }

    #[test]
    fn test_cofactors_of_and() {
        let and2 = TruthTable::nth_var(2, 0).and(&TruthTable::nth_var(2, 1));
        assert!(and2.cofactor0(0).is_const0());
        assert_eq!(and2.cofactor1(0), TruthTable::nth_var(2, 1));
    }

    #[test]
    fn test_min_base_drops_unused_variable() {
        // f(x0, x1, x2) = x0 & x2
        let f = TruthTable::nth_var(3, 0).and(&TruthTable::nth_var(3, 2));
        let (shrunk, support) = f.min_base();
        assert_eq!(support, vec![0, 2]);
        assert_eq!(shrunk, TruthTable::nth_var(2, 0).and(&TruthTable::nth_var(2, 1)));
    }

    #[test]
    fn test_expand_then_min_base_is_identity() {
        let and2 = TruthTable::nth_var(2, 0).and(&TruthTable::nth_var(2, 1).not());
        let wide = and2.expand(&[1, 3], 4);
        assert_eq!(wide.support(), vec![1, 3]);
        let (back, support) = wide.min_base();
        assert_eq!(support, vec![1, 3]);
        assert_eq!(back, and2);
    }

    #[test]
    fn test_compose_builds_xor3_from_xor2() {
        let xor2 = TruthTable::nth_var(2, 0).xor(&TruthTable::nth_var(2, 1));
        let inner = xor2.expand(&[0, 1], 3);
        let composed = xor2.compose(&[inner, TruthTable::nth_var(3, 2)], 3);
        assert_eq!(composed, xor3());
    }

    #[test]
    fn test_eval_matches_bits() {
        let f = xor3();
        assert!(f.eval(&[true, false, false]));
        assert!(!f.eval(&[true, true, false]));
        assert!(f.eval(&[true, true, true]));
        assert_eq!(f.count_ones(), 4);
    }
}
