/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use crate::*;

pub fn get_test_boolean_vars(names: &[&str]) -> Vec<Variable> {
    names.iter().map(|n| Variable::boolean(*n)).collect()
}

/// The XOR SCM used by spec scenarios S1/S2: `X`, `Y` exogenous with skewed
/// marginals, `Z = X xor Y` endogenous.
pub fn get_test_xor_scm() -> CausalModel {
    let x = Variable::boolean("X");
    let y = Variable::boolean("Y");
    let z = Variable::boolean("Z");

    let exogenous = IndependentDistribution::new(1)
        .with(x.clone(), vec![0.8, 0.2])
        .with(y.clone(), vec![0.6, 0.4]);

    let f_z = DiscreteFunction::xor(z, vec![x, y]).expect("xor function is well-formed");
    CausalModel::new(exogenous, vec![f_z]).expect("xor scm has no ungoverned roots")
}

/// The chain `X -> W -> Y` used by the d-separation S3 scenario.
pub fn get_test_chain_graph() -> (CausalGraph, Variable, Variable, Variable) {
    let (x, w, y) = (Variable::boolean("X"), Variable::boolean("W"), Variable::boolean("Y"));
    let mut g = CausalGraph::new();
    g.add_edge(x.clone(), w.clone());
    g.add_edge(w.clone(), y.clone());
    (g, x, w, y)
}

/// The fork `W -> X`, `W -> Y` with `X -> Z` used by the S4 scenario.
pub fn get_test_fork_graph() -> (CausalGraph, Variable, Variable, Variable, Variable) {
    let (w, x, y, z) = (
        Variable::boolean("W"),
        Variable::boolean("X"),
        Variable::boolean("Y"),
        Variable::boolean("Z"),
    );
    let mut g = CausalGraph::new();
    g.add_edge(w.clone(), y.clone());
    g.add_edge(w.clone(), x.clone());
    g.add_edge(x.clone(), z.clone());
    (g, w, x, y, z)
}

/// The confounded triangle `U -> X`, `U -> Y`, `X -> Y` used by the S5
/// back-door scenario, with `U`'s marginal left for the caller to register.
pub fn get_test_confounded_triangle() -> (CausalGraph, Variable, Variable, Variable) {
    let (u, x, y) = (Variable::boolean("U"), Variable::boolean("X"), Variable::boolean("Y"));
    let mut g = CausalGraph::new();
    g.add_edge(u.clone(), x.clone());
    g.add_edge(u.clone(), y.clone());
    g.add_edge(x.clone(), y.clone());
    (g, u, x, y)
}
