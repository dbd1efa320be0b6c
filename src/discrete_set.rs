/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use crate::errors::DomainError;
use crate::variable::Variable;

/// A dense truth table over an ordered tuple of `Variable` axes.
///
/// Cells hold a `u32` rather than a plain `bool`: the boolean operators
/// (`and`/`or`/`xor`/`sub`/`not`) always normalize their output to `0`/`1`,
/// but [`DiscreteSet::tensor`] contracts an axis by counting, so its result
/// can legitimately exceed `1`. Callers that only ever combine sets with the
/// boolean operators can treat the table as `bool` throughout; `tensor` is
/// the one place the wider type matters.
///
/// Internally the table is a flat row-major buffer plus a `shape` recording
/// the length used for each axis in that buffer. `shape` does not have to
/// equal `dimensions[i].support().len()` — a transient broadcast copy may
/// carry a length-1 placeholder axis for a variable whose true support is
/// larger. Every `DiscreteSet` handed back to a caller is real: its shape
/// always matches the declared supports.
#[derive(Debug, Clone)]
pub struct DiscreteSet {
    dimensions: Vec<Variable>,
    shape: Vec<usize>,
    values: Vec<u32>,
}

impl DiscreteSet {
    /// Builds a set from an explicit row-major value buffer. `values.len()`
    /// must equal the product of each dimension's support length.
    pub fn new(dimensions: Vec<Variable>, values: Vec<u32>) -> Result<Self, DomainError> {
        check_no_duplicates(&dimensions)?;
        let shape: Vec<usize> = dimensions.iter().map(|v| v.support().len()).collect();
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(DomainError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            dimensions,
            shape,
            values,
        })
    }

    /// Builds a set from booleans instead of raw counts.
    pub fn from_bits(dimensions: Vec<Variable>, bits: Vec<bool>) -> Result<Self, DomainError> {
        Self::new(dimensions, bits.into_iter().map(|b| b as u32).collect())
    }

    /// A set over `dimensions` with every cell equal to `value`.
    pub fn filled(dimensions: Vec<Variable>, value: bool) -> Result<Self, DomainError> {
        check_no_duplicates(&dimensions)?;
        let shape: Vec<usize> = dimensions.iter().map(|v| v.support().len()).collect();
        let len: usize = shape.iter().product();
        Ok(Self {
            dimensions,
            shape,
            values: vec![value as u32; len],
        })
    }

    /// Builds a set by evaluating `f` at every multi-index of the declared
    /// shape. `f` receives the indices in the same order as `dimensions`.
    pub fn from_fn(
        dimensions: Vec<Variable>,
        f: impl Fn(&[usize]) -> bool,
    ) -> Result<Self, DomainError> {
        check_no_duplicates(&dimensions)?;
        let shape: Vec<usize> = dimensions.iter().map(|v| v.support().len()).collect();
        let values = iter_indices(&shape).map(|idx| f(&idx) as u32).collect();
        Ok(Self {
            dimensions,
            shape,
            values,
        })
    }

    /// The set asserting `var == value`: a rank-1 table over `var` with a
    /// single `1` cell (or all-zero if `value` is not in `var`'s support).
    pub fn equals_value(var: &Variable, value: &crate::variable::Atom) -> Self {
        let shape = vec![var.support().len()];
        let mut values = vec![0u32; shape[0]];
        if let Some(i) = var.index_of(value) {
            values[i] = 1;
        }
        Self {
            dimensions: vec![var.clone()],
            shape,
            values,
        }
    }

    /// The set asserting `a == b` by support value: a rank-2 diagonal table.
    pub fn equals_variable(a: &Variable, b: &Variable) -> Self {
        let shape = vec![a.support().len(), b.support().len()];
        let mut values = vec![0u32; shape[0] * shape[1]];
        for (i, av) in a.support().iter().enumerate() {
            for (j, bv) in b.support().iter().enumerate() {
                if av == bv {
                    values[i * shape[1] + j] = 1;
                }
            }
        }
        Self {
            dimensions: vec![a.clone(), b.clone()],
            shape,
            values,
        }
    }

    /// A rank-0 scalar set: no axes, one cell.
    pub fn scalar(value: bool) -> Self {
        Self {
            dimensions: Vec::new(),
            shape: Vec::new(),
            values: vec![value as u32],
        }
    }

    pub fn dimensions(&self) -> &[Variable] {
        &self.dimensions
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn get(&self, idx: &[usize]) -> u32 {
        self.values[self.flat_index(idx)]
    }

    pub fn is_true(&self, idx: &[usize]) -> bool {
        self.get(idx) != 0
    }

    pub fn set(&mut self, idx: &[usize], value: u32) {
        let flat = self.flat_index(idx);
        self.values[flat] = value;
    }

    /// Every multi-index into this set's shape, in row-major order.
    pub fn indices(&self) -> impl Iterator<Item = Vec<usize>> + '_ {
        iter_indices(&self.shape)
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Rebinds this set onto a different (but shape-compatible) tuple of
    /// variables, keeping the value buffer untouched. Used when a twin
    /// network rewrites a function's preimage to range over twin copies of
    /// its parents instead of the originals.
    pub fn with_dimensions(&self, new_dimensions: Vec<Variable>) -> Result<Self, DomainError> {
        check_no_duplicates(&new_dimensions)?;
        if new_dimensions.len() != self.dimensions.len() {
            return Err(DomainError::ShapeMismatch {
                expected: self.dimensions.len(),
                actual: new_dimensions.len(),
            });
        }
        for (d, &len) in new_dimensions.iter().zip(self.shape.iter()) {
            if d.support().len() != len {
                return Err(DomainError::ShapeMismatch {
                    expected: len,
                    actual: d.support().len(),
                });
            }
        }
        Ok(Self {
            dimensions: new_dimensions,
            shape: self.shape.clone(),
            values: self.values.clone(),
        })
    }

    fn flat_index(&self, idx: &[usize]) -> usize {
        let mut flat = 0;
        for (axis, &v) in idx.iter().enumerate() {
            flat = flat * self.shape[axis] + v;
        }
        flat
    }

    /// Reorders axes: `perm[k]` names which current axis becomes axis `k` of
    /// the result.
    fn permute(&self, perm: &[usize]) -> Self {
        let new_dims: Vec<Variable> = perm.iter().map(|&p| self.dimensions[p].clone()).collect();
        let new_shape: Vec<usize> = perm.iter().map(|&p| self.shape[p]).collect();
        let mut new_values = vec![0u32; self.values.len()];
        for (flat, idx_new) in iter_indices(&new_shape).enumerate() {
            let mut idx_old = vec![0usize; perm.len()];
            for (k, &p) in perm.iter().enumerate() {
                idx_old[p] = idx_new[k];
            }
            new_values[flat] = self.get(&idx_old);
        }
        Self {
            dimensions: new_dims,
            shape: new_shape,
            values: new_values,
        }
    }

    /// Moves the axis currently at `from` to position `to`, shifting the
    /// axes in between. A no-op when `from == to`.
    fn move_axis_to(&mut self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let n = self.dimensions.len();
        let mut order: Vec<usize> = (0..n).collect();
        let v = order.remove(from);
        order.insert(to, v);
        *self = self.permute(&order);
    }

    /// Inserts a length-1 placeholder axis for `var` at `pos`. Free: the
    /// value buffer is untouched since the shape product is unchanged.
    fn insert_singleton_axis(&mut self, pos: usize, var: Variable) {
        self.dimensions.insert(pos, var);
        self.shape.insert(pos, 1);
    }

    /// Reshapes `self` in place so its axes are `[self's private axes] ++
    /// other.dimensions`, i.e. `other`'s axes become the rightmost block, in
    /// `other`'s own order. Axes `self` shares with `other` are swapped into
    /// their target slot; axes `self` lacks are inserted as length-1
    /// placeholders.
    ///
    /// Errors if an axis shared with `other` already sits to the right of
    /// its target slot in `self` — `match_to_broadcast` only moves axes
    /// left-to-right relative to the block it is building.
    pub fn match_to_broadcast(&mut self, other: &DiscreteSet) -> Result<(), DomainError> {
        let m = other.dimensions.len();
        let private_len = self
            .dimensions
            .iter()
            .filter(|d| !other.dimensions.contains(d))
            .count();
        for i in (0..m).rev() {
            let dim = other.dimensions[i].clone();
            let target_pos = private_len + i;
            match self.dimensions.iter().position(|d| *d == dim) {
                Some(cur_pos) => {
                    if cur_pos > target_pos {
                        return Err(DomainError::MisalignedAxis {
                            name: dim.name().to_string(),
                        });
                    }
                    self.move_axis_to(cur_pos, target_pos);
                }
                None => self.insert_singleton_axis(target_pos, dim),
            }
        }
        Ok(())
    }

    fn combine(&self, other: &DiscreteSet, op: impl Fn(u32, u32) -> u32) -> Result<Self, DomainError> {
        let mut a = self.copy();
        a.match_to_broadcast(other)?;
        let private_len = a.dimensions.len() - other.dimensions.len();

        let mut final_shape = a.shape.clone();
        for i in 0..other.dimensions.len() {
            let ax = private_len + i;
            final_shape[ax] = final_shape[ax].max(other.shape[i]);
        }

        let mut values = Vec::with_capacity(final_shape.iter().product());
        for idx in iter_indices(&final_shape) {
            let a_idx: Vec<usize> = idx
                .iter()
                .enumerate()
                .map(|(ax, &v)| if a.shape[ax] == 1 { 0 } else { v })
                .collect();
            let b_idx: Vec<usize> = (0..other.dimensions.len())
                .map(|i| {
                    let ax = private_len + i;
                    if other.shape[i] == 1 {
                        0
                    } else {
                        idx[ax]
                    }
                })
                .collect();
            values.push(op(a.get(&a_idx), other.get(&b_idx)));
        }

        Ok(Self {
            dimensions: a.dimensions,
            shape: final_shape,
            values,
        })
    }

    pub fn and(&self, other: &DiscreteSet) -> Result<Self, DomainError> {
        self.combine(other, |a, b| ((a != 0) && (b != 0)) as u32)
    }

    pub fn or(&self, other: &DiscreteSet) -> Result<Self, DomainError> {
        self.combine(other, |a, b| ((a != 0) || (b != 0)) as u32)
    }

    pub fn xor(&self, other: &DiscreteSet) -> Result<Self, DomainError> {
        self.combine(other, |a, b| ((a != 0) ^ (b != 0)) as u32)
    }

    /// `a ∨ ¬b`: cells true in `self` or false in `other`.
    pub fn sub(&self, other: &DiscreteSet) -> Result<Self, DomainError> {
        self.combine(other, |a, b| ((a != 0) || (b == 0)) as u32)
    }

    pub fn not(&self) -> Self {
        Self {
            dimensions: self.dimensions.clone(),
            shape: self.shape.clone(),
            values: self.values.iter().map(|&v| (v == 0) as u32).collect(),
        }
    }

    /// Contracts `axis` out of `self` and `other`, counting the number of
    /// `axis` values for which both operands are true.
    ///
    /// Dimensions shared between the two operands (besides `axis`) are
    /// aligned rather than duplicated; the result's axes are `[shared
    /// (minus axis)] ++ [self-private] ++ [other-private]`. Cell values can
    /// exceed `1` when more than one `axis` value satisfies both operands.
    pub fn tensor(&self, other: &DiscreteSet, axis: &Variable) -> Result<Self, DomainError> {
        if !self.dimensions.contains(axis) {
            return Err(DomainError::AxisNotPresent {
                axis: axis.name().to_string(),
            });
        }
        if !other.dimensions.contains(axis) {
            return Err(DomainError::AxisNotPresent {
                axis: axis.name().to_string(),
            });
        }

        let shared: Vec<Variable> = self
            .dimensions
            .iter()
            .filter(|d| *d != axis && other.dimensions.contains(d))
            .cloned()
            .collect();
        let left_private: Vec<Variable> = self
            .dimensions
            .iter()
            .filter(|d| *d != axis && !other.dimensions.contains(d))
            .cloned()
            .collect();
        let right_private: Vec<Variable> = other
            .dimensions
            .iter()
            .filter(|d| *d != axis && !self.dimensions.contains(d))
            .cloned()
            .collect();

        let mut out_dims = shared.clone();
        out_dims.extend(left_private.iter().cloned());
        out_dims.extend(right_private.iter().cloned());
        let out_shape: Vec<usize> = out_dims.iter().map(|v| v.support().len()).collect();
        let axis_len = axis.support().len();

        let mut values = Vec::with_capacity(out_shape.iter().product());
        for idx in iter_indices(&out_shape) {
            let shared_idx = &idx[0..shared.len()];
            let left_idx = &idx[shared.len()..shared.len() + left_private.len()];
            let right_idx = &idx[shared.len() + left_private.len()..];

            let mut count = 0u32;
            for a in 0..axis_len {
                let self_idx: Vec<usize> = self
                    .dimensions
                    .iter()
                    .map(|d| {
                        if d == axis {
                            a
                        } else if let Some(p) = shared.iter().position(|s| s == d) {
                            shared_idx[p]
                        } else {
                            let p = left_private.iter().position(|s| s == d).unwrap();
                            left_idx[p]
                        }
                    })
                    .collect();
                let other_idx: Vec<usize> = other
                    .dimensions
                    .iter()
                    .map(|d| {
                        if d == axis {
                            a
                        } else if let Some(p) = shared.iter().position(|s| s == d) {
                            shared_idx[p]
                        } else {
                            let p = right_private.iter().position(|s| s == d).unwrap();
                            right_idx[p]
                        }
                    })
                    .collect();
                if self.get(&self_idx) != 0 && other.get(&other_idx) != 0 {
                    count += 1;
                }
            }
            values.push(count);
        }

        Ok(Self {
            dimensions: out_dims,
            shape: out_shape,
            values,
        })
    }

    /// Canonical `(dimensions, shape, values)` with axes sorted by `Variable`
    /// order, so sets that differ only in axis order compare equal.
    fn canonical(&self) -> (Vec<Variable>, Vec<usize>, Vec<u32>) {
        let mut order: Vec<usize> = (0..self.dimensions.len()).collect();
        order.sort_by(|&a, &b| self.dimensions[a].cmp(&self.dimensions[b]));
        let permuted = self.permute(&order);
        (permuted.dimensions, permuted.shape, permuted.values)
    }
}

impl PartialEq for DiscreteSet {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

fn check_no_duplicates(dimensions: &[Variable]) -> Result<(), DomainError> {
    for (i, a) in dimensions.iter().enumerate() {
        if dimensions[i + 1..].iter().any(|b| b == a) {
            return Err(DomainError::DuplicateDimension {
                name: a.name().to_string(),
            });
        }
    }
    Ok(())
}

/// Row-major odometer over `shape`: the last axis varies fastest. Yields a
/// single empty index once for a rank-0 (scalar) shape.
fn iter_indices(shape: &[usize]) -> impl Iterator<Item = Vec<usize>> + '_ {
    let total: usize = shape.iter().product();
    (0..total).map(move |mut flat| {
        let mut idx = vec![0usize; shape.len()];
        for k in (0..shape.len()).rev() {
            let dim = shape[k];
            idx[k] = flat % dim;
            flat /= dim;
        }
        idx
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::Atom;

    fn bool_var(name: &str) -> Variable {
        Variable::boolean(name)
    }

    #[test]
    fn reordering_axes_preserves_membership() {
        let x = bool_var("X");
        let y = bool_var("Y");
        let set = DiscreteSet::from_bits(vec![x.clone(), y.clone()], vec![true, false, false, true]).unwrap();
        let transposed = set.permute(&[1, 0]);
        assert_eq!(set, transposed);
    }

    #[test]
    fn and_or_xor_not_obey_boolean_algebra() {
        let x = bool_var("X");
        let a = DiscreteSet::from_bits(vec![x.clone()], vec![true, false]).unwrap();
        let b = DiscreteSet::from_bits(vec![x.clone()], vec![true, true]).unwrap();

        assert_eq!(a.and(&b).unwrap(), a.clone());
        assert_eq!(a.or(&b).unwrap(), b.clone());
        assert_eq!(a.xor(&b).unwrap(), DiscreteSet::from_bits(vec![x.clone()], vec![false, true]).unwrap());
        assert_eq!(a.not(), DiscreteSet::from_bits(vec![x], vec![false, true]).unwrap());
    }

    #[test]
    fn sub_computes_a_or_not_b() {
        let x = bool_var("X");
        let a = DiscreteSet::from_bits(vec![x.clone()], vec![true, false]).unwrap();
        // a ∨ ¬a is a tautology: every cell must be true. An `a ∧ ¬b` (set
        // difference) formula would instead give all-false here.
        assert_eq!(a.sub(&a).unwrap(), DiscreteSet::filled(vec![x.clone()], true).unwrap());

        let b = DiscreteSet::from_bits(vec![x.clone()], vec![false, false]).unwrap();
        // a = [T,F], b = [F,F]: a ∨ ¬b = [T||T, F||T] = [T,T].
        assert_eq!(a.sub(&b).unwrap(), DiscreteSet::filled(vec![x], true).unwrap());
    }

    #[test]
    fn and_is_commutative_up_to_axis_order() {
        let x = bool_var("X");
        let y = bool_var("Y");
        let a = DiscreteSet::from_bits(vec![x.clone()], vec![true, false]).unwrap();
        let b = DiscreteSet::from_bits(vec![y.clone()], vec![false, true]).unwrap();
        assert_eq!(a.and(&b).unwrap(), b.and(&a).unwrap());
    }

    #[test]
    fn broadcast_combine_expands_missing_axis() {
        let x = bool_var("X");
        let y = bool_var("Y");
        // a depends only on X; combined with something ranging over Y should
        // broadcast a's value across every Y.
        let a = DiscreteSet::from_bits(vec![x.clone()], vec![true, false]).unwrap();
        let b = DiscreteSet::from_bits(vec![x.clone(), y.clone()], vec![true, true, false, false]).unwrap();
        let combined = a.and(&b).unwrap();
        assert_eq!(combined.rank(), 2);
        for idx in combined.indices() {
            let expected = a.is_true(&[idx[0]]) && b.is_true(&idx);
            assert_eq!(combined.is_true(&idx), expected);
        }
    }

    #[test]
    fn tensor_counts_satisfying_axis_values() {
        // X has two values; Y = f(X) deterministically, encoded as a
        // preimage with exactly one true cell per X row.
        let x = bool_var("X");
        let y = bool_var("Y");
        let preimage = DiscreteSet::from_bits(vec![x.clone(), y.clone()], vec![true, false, false, true]).unwrap();
        let target = DiscreteSet::equals_value(&y, &Atom::Bool(true));
        let result = preimage.tensor(&target, &y).unwrap();
        // result ranges over X only; true exactly where X = true (since
        // preimage maps X=true -> Y=true).
        assert_eq!(result.dimensions(), &[x.clone()]);
        assert_eq!(result.get(&[0]), 0);
        assert_eq!(result.get(&[1]), 1);
    }

    #[test]
    fn tensor_rejects_missing_axis() {
        let x = bool_var("X");
        let y = bool_var("Y");
        let a = DiscreteSet::filled(vec![x.clone()], true).unwrap();
        let b = DiscreteSet::filled(vec![y.clone()], true).unwrap();
        assert!(matches!(
            a.tensor(&b, &y),
            Err(DomainError::AxisNotPresent { .. })
        ));
    }

    #[test]
    fn duplicate_dimension_rejected() {
        let x = bool_var("X");
        let err = DiscreteSet::filled(vec![x.clone(), x], false).unwrap_err();
        assert!(matches!(err, DomainError::DuplicateDimension { .. }));
    }

    #[test]
    fn scalar_set_has_single_cell() {
        let s = DiscreteSet::scalar(true);
        assert_eq!(s.rank(), 0);
        assert_eq!(s.get(&[]), 1);
    }
}
