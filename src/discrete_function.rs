/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::collections::HashMap;
use std::rc::Rc;

use crate::discrete_set::DiscreteSet;
use crate::errors::DomainError;
use crate::variable::{Atom, Variable};

/// A deterministic total function `f: dom(in_1) x ... x dom(in_k) -> dom(out)`.
///
/// The callable is only ever invoked at construction (to build the
/// `preimage`) and during forward sampling; every other consumer — the
/// probability evaluator, twin-network construction — works entirely off
/// `preimage`, a `DiscreteSet` over `(inputs..., output)` that is true
/// exactly where `f(inputs) == output`.
#[derive(Clone)]
pub struct DiscreteFunction {
    output: Variable,
    inputs: Vec<Variable>,
    preimage: DiscreteSet,
    callable: Rc<dyn Fn(&[Atom]) -> Atom>,
}

impl DiscreteFunction {
    pub fn new(
        output: Variable,
        inputs: Vec<Variable>,
        f: impl Fn(&[Atom]) -> Atom + 'static,
    ) -> Result<Self, DomainError> {
        let mut dims = inputs.clone();
        dims.push(output.clone());
        let k = inputs.len();
        let preimage = DiscreteSet::from_fn(dims, |idx| {
            let in_vals: Vec<Atom> = idx[..k]
                .iter()
                .zip(inputs.iter())
                .map(|(&i, v)| v.support()[i].clone())
                .collect();
            f(&in_vals) == output.support()[idx[k]]
        })?;
        Ok(Self {
            output,
            inputs,
            preimage,
            callable: Rc::new(f),
        })
    }

    /// Element-wise logical xor over boolean inputs.
    pub fn xor(output: Variable, inputs: Vec<Variable>) -> Result<Self, DomainError> {
        Self::new(output, inputs, |vals: &[Atom]| {
            Atom::Bool(vals.iter().fold(false, |acc, v| acc ^ v.as_bool().unwrap_or(false)))
        })
    }

    /// A zero-input function with a fixed output, used for exogenous roots
    /// under a hard intervention and for `ConstantFunction` roots declared
    /// directly by the caller.
    pub fn constant(output: Variable, value: Atom) -> Result<Self, DomainError> {
        Self::new(output, Vec::new(), move |_| value.clone())
    }

    pub fn output(&self) -> &Variable {
        &self.output
    }

    pub fn inputs(&self) -> &[Variable] {
        &self.inputs
    }

    pub fn preimage(&self) -> &DiscreteSet {
        &self.preimage
    }

    pub fn is_constant(&self) -> bool {
        self.inputs.is_empty()
    }

    pub fn sample(&self, input_values: &[Atom]) -> Atom {
        (self.callable)(input_values)
    }

    /// Rebuilds this function with `new_output` in place of `output`, and
    /// every input present as a key of `replace` swapped for its twin. Used
    /// by twin-network materialisation: a function whose parent is a
    /// descendant of the intervened variable must read the twin copy of
    /// that parent instead of the original.
    pub fn rewrite(&self, new_output: Variable, replace: &HashMap<Variable, Variable>) -> Self {
        let new_inputs: Vec<Variable> = self
            .inputs
            .iter()
            .map(|v| replace.get(v).cloned().unwrap_or_else(|| v.clone()))
            .collect();
        let mut dims = new_inputs.clone();
        dims.push(new_output.clone());
        let preimage = self
            .preimage
            .with_dimensions(dims)
            .expect("twin rewrite preserves the preimage's shape");
        Self {
            output: new_output,
            inputs: new_inputs,
            preimage,
            callable: Rc::clone(&self.callable),
        }
    }
}

impl std::fmt::Debug for DiscreteFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("DiscreteFunction")
            .field("output", &self.output)
            .field("inputs", &self.inputs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xor_preimage_matches_truth_table() {
        let x = Variable::boolean("X");
        let y = Variable::boolean("Y");
        let z = Variable::boolean("Z");
        let f = DiscreteFunction::xor(z.clone(), vec![x.clone(), y.clone()]).unwrap();
        assert_eq!(f.sample(&[Atom::Bool(true), Atom::Bool(false)]), Atom::Bool(true));
        assert_eq!(f.sample(&[Atom::Bool(true), Atom::Bool(true)]), Atom::Bool(false));
        // preimage is true at (X=true, Y=false, Z=true) and false at (X=true, Y=false, Z=false)
        assert_eq!(f.preimage().get(&[1, 0, 1]), 1);
        assert_eq!(f.preimage().get(&[1, 0, 0]), 0);
    }

    #[test]
    fn constant_function_has_no_inputs() {
        let x = Variable::boolean("X");
        let f = DiscreteFunction::constant(x.clone(), Atom::Bool(true)).unwrap();
        assert!(f.is_constant());
        assert_eq!(f.preimage().get(&[1]), 1);
        assert_eq!(f.preimage().get(&[0]), 0);
    }

    #[test]
    fn rewrite_swaps_parents_for_twins() {
        let x = Variable::boolean("X");
        let y = Variable::boolean("Y");
        let z = Variable::boolean("Z");
        let x_twin = x.do_("X", Atom::Bool(true));
        let f = DiscreteFunction::xor(z.clone(), vec![x.clone(), y.clone()]).unwrap();
        let mut replace = HashMap::new();
        replace.insert(x.clone(), x_twin.clone());
        let z_twin = z.do_("X", Atom::Bool(true));
        let f_twin = f.rewrite(z_twin, &replace);
        assert_eq!(f_twin.inputs(), &[x_twin, y]);
    }
}
