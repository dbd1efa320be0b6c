/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::collections::{HashMap, HashSet};

use crate::causal_graph::CausalGraph;
use crate::discrete_function::DiscreteFunction;
use crate::distribution::IndependentDistribution;
use crate::errors::{CausalError, DomainError, ModelBuildError};
use crate::expression::Expression;
use crate::variable::{Atom, Variable};

/// An SCM: an exogenous distribution, a set of deterministic functional
/// equations over endogenous variables, the graph those equations induce,
/// and the twin networks already materialised for counterfactual queries.
#[derive(Clone)]
pub struct CausalModel {
    exogenous: IndependentDistribution,
    functions: HashMap<Variable, DiscreteFunction>,
    graph: CausalGraph,
    topo_order: Vec<Variable>,
    twin_networks: HashSet<(String, Atom)>,
}

impl CausalModel {
    /// Infers the graph from `functions`, topologically sorts the
    /// endogenous variables, and verifies every root is either exogenous or
    /// a zero-input (`ConstantFunction`) equation.
    pub fn new(exogenous: IndependentDistribution, functions: Vec<DiscreteFunction>) -> Result<Self, ModelBuildError> {
        let mut graph = CausalGraph::new();
        let mut fn_map: HashMap<Variable, DiscreteFunction> = HashMap::new();

        for f in functions {
            if fn_map.contains_key(f.output()) {
                return Err(ModelBuildError::DuplicateEquation {
                    variable: f.output().name().to_string(),
                });
            }
            graph.add_node(f.output().clone());
            for input in f.inputs() {
                graph.add_edge(input.clone(), f.output().clone());
            }
            fn_map.insert(f.output().clone(), f);
        }

        for node in graph.nodes() {
            if graph.parents(node).is_empty() {
                let governed =
                    exogenous.contains(node) || fn_map.get(node).map(DiscreteFunction::is_constant).unwrap_or(false);
                if !governed {
                    return Err(ModelBuildError::UngovernedRoot {
                        variable: node.name().to_string(),
                    });
                }
            }
        }

        let topo_order = endogenous_topo_order(&graph, &fn_map)?;

        Ok(Self {
            exogenous,
            functions: fn_map,
            graph,
            topo_order,
            twin_networks: HashSet::new(),
        })
    }

    pub fn graph(&self) -> &CausalGraph {
        &self.graph
    }

    pub fn exogenous(&self) -> &IndependentDistribution {
        &self.exogenous
    }

    pub fn functions(&self) -> &HashMap<Variable, DiscreteFunction> {
        &self.functions
    }

    /// Samples every variable `n` times: exogenous marginals first, then
    /// each endogenous variable in topological order from its already
    /// sampled parents.
    pub fn rvs(&self, n: usize) -> HashMap<Variable, Vec<Atom>> {
        let mut samples = self.exogenous.rvs(n);
        for var in &self.topo_order {
            let f = &self.functions[var];
            let mut out = Vec::with_capacity(n);
            for i in 0..n {
                let input_vals: Vec<Atom> = f.inputs().iter().map(|inp| samples[inp][i].clone()).collect();
                out.push(f.sample(&input_vals));
            }
            samples.insert(var.clone(), out);
        }
        samples
    }

    fn find_original(&self, name: &str) -> Option<Variable> {
        self.graph
            .nodes()
            .iter()
            .find(|v| v.name() == name && v.intervention().is_none())
            .cloned()
    }

    /// Duplicates every descendant of the (original) variable named `x_name`
    /// into a twin tagged with `do(x_name = x_value)`, wires a
    /// `ConstantFunction` for the twin root, and rewrites every other
    /// twinned function to read twin parents instead of originals. A no-op
    /// if this intervention tag was already materialised.
    pub fn add_twin_network(&mut self, x_name: &str, x_value: Atom) -> Result<(), CausalError> {
        let tag = (x_name.to_string(), x_value.clone());
        if self.twin_networks.contains(&tag) {
            return Ok(());
        }

        let x = self
            .find_original(x_name)
            .ok_or_else(|| DomainError::UnknownVariable {
                name: x_name.to_string(),
            })?;
        let descendants = self.graph.descendants(&x);

        let twins: HashMap<Variable, Variable> = descendants
            .iter()
            .map(|d| (d.clone(), d.do_(x_name, x_value.clone())))
            .collect();

        let x_twin = twins[&x].clone();
        let const_fn = DiscreteFunction::constant(x_twin.clone(), x_value.clone())?;
        self.graph.add_node(x_twin.clone());
        self.functions.insert(x_twin, const_fn);

        for d in &descendants {
            if d == &x {
                continue;
            }
            let Some(f) = self.functions.get(d) else {
                continue;
            };
            let twin_d = twins[d].clone();
            let f_twin = f.rewrite(twin_d.clone(), &twins);
            self.graph.add_node(twin_d.clone());
            for input in f_twin.inputs() {
                self.graph.add_edge(input.clone(), twin_d.clone());
            }
            self.functions.insert(twin_d, f_twin);
        }

        self.twin_networks.insert(tag);
        self.topo_order = endogenous_topo_order(&self.graph, &self.functions)?;
        Ok(())
    }

    /// `P(expr)`: reduces `expr`'s truth-set to an exogenous-only truth-set
    /// by contracting out endogenous dimensions in reverse topological
    /// order, then measures it against the exogenous distribution.
    pub fn probability(&mut self, expr: &Expression) -> Result<f64, CausalError> {
        let mut values = expr.values()?;

        let interventions: Vec<(String, Atom)> = values
            .dimensions()
            .iter()
            .filter_map(|v| v.intervention().map(|i| (i.var.clone(), i.value.clone())))
            .collect();
        for (var, value) in interventions {
            self.add_twin_network(&var, value)?;
        }

        loop {
            let mut pending: Vec<Variable> = self
                .topo_order
                .iter()
                .rev()
                .filter(|v| values.dimensions().contains(v))
                .cloned()
                .collect();
            if pending.is_empty() {
                break;
            }
            for v in pending.drain(..) {
                let f = &self.functions[&v];
                values = values.tensor(f.preimage(), &v)?;
            }
        }

        self.exogenous.pmf(&values)
    }

    /// Hard intervention `do(var = value)`: returns a new model with
    /// `functions[var]` replaced by a constant equation and every incoming
    /// edge to `var` gone. `self` is unchanged.
    pub fn intervention(&self, var: &Variable, value: Atom) -> Result<Self, ModelBuildError> {
        let mut new_functions: Vec<DiscreteFunction> = self
            .functions
            .values()
            .filter(|f| f.output() != var)
            .cloned()
            .collect();
        let const_fn = DiscreteFunction::constant(var.clone(), value)
            .expect("a single-dimension DiscreteSet never violates its own shape invariant");
        new_functions.push(const_fn);
        Self::new(self.exogenous.clone(), new_functions)
    }
}

fn endogenous_topo_order(
    graph: &CausalGraph,
    functions: &HashMap<Variable, DiscreteFunction>,
) -> Result<Vec<Variable>, ModelBuildError> {
    graph
        .topological_sort()
        .map(|order| order.into_iter().filter(|v| functions.contains_key(v)).collect())
        .map_err(|_| ModelBuildError::GraphNotAcyclic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Expression;

    fn xor_scm() -> CausalModel {
        let x = Variable::boolean("X");
        let y = Variable::boolean("Y");
        let z = Variable::boolean("Z");
        let exogenous = IndependentDistribution::new(1)
            .with(x.clone(), vec![0.8, 0.2])
            .with(y.clone(), vec![0.6, 0.4]);
        let f_z = DiscreteFunction::xor(z, vec![x, y]).unwrap();
        CausalModel::new(exogenous, vec![f_z]).unwrap()
    }

    #[test]
    fn s1_xor_scm_probability() {
        let mut model = xor_scm();
        let z = Variable::boolean("Z");
        let p_true = model.probability(&Expression::var_eq(z.clone(), Atom::Bool(true))).unwrap();
        assert!((p_true - 0.44).abs() < 1e-9, "expected 0.44, got {p_true}");
        let p_false = model.probability(&Expression::var_eq(z, Atom::Bool(false))).unwrap();
        assert!((p_false - 0.56).abs() < 1e-9);
    }

    #[test]
    fn s2_counterfactual_probability() {
        let mut model = xor_scm();
        let z = Variable::boolean("Z");
        let z_x_false = z.do_("X", Atom::Bool(false));
        let z_x_true = z.do_("X", Atom::Bool(true));
        let expr = Expression::Conjunction(vec![
            Expression::var_eq(z_x_false, Atom::Bool(true)),
            Expression::var_eq(z_x_true, Atom::Bool(false)),
        ]);
        let p = model.probability(&expr).unwrap();
        assert!((p - 0.4).abs() < 1e-9, "expected 0.4, got {p}");
    }

    #[test]
    fn p_true_is_one_and_p_false_is_zero() {
        let mut model = xor_scm();
        let p_true = model
            .probability(&Expression::equals(
                crate::expression::Term::Literal(Atom::Bool(true)),
                crate::expression::Term::Literal(Atom::Bool(true)),
            ))
            .unwrap();
        assert!((p_true - 1.0).abs() < 1e-9);

        let p_false = model
            .probability(&Expression::equals(
                crate::expression::Term::Literal(Atom::Bool(true)),
                crate::expression::Term::Literal(Atom::Bool(false)),
            ))
            .unwrap();
        assert!(p_false.abs() < 1e-9);
    }

    #[test]
    fn intervention_forces_variable_to_value() {
        let model = xor_scm();
        let x = Variable::boolean("X");
        let mut forced = model.intervention(&x, Atom::Bool(true)).unwrap();
        let p = forced.probability(&Expression::var_eq(x, Atom::Bool(true))).unwrap();
        assert!((p - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ungoverned_root_is_rejected() {
        let x = Variable::boolean("X");
        let y = Variable::boolean("Y");
        let f_y = DiscreteFunction::xor(y, vec![x]).unwrap();
        let err = CausalModel::new(IndependentDistribution::new(0), vec![f_y]).unwrap_err();
        assert!(matches!(err, ModelBuildError::UngovernedRoot { .. }));
    }
}
