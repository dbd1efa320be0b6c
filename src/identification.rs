/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::collections::HashSet;

use crate::causal_graph::CausalGraph;
use crate::errors::PreconditionError;
use crate::expression::Expression;
use crate::variable::Variable;

/// Synthesizes candidate closed-form estimands for `P(Y | do(X))` from the
/// graph alone. `u` names latent nodes that may never appear in an
/// adjustment set. Returns an empty list if no rule below applies — that is
/// not an error, it means "not identifiable by these rules".
///
/// Rules are tried in order and each may contribute to the result; the
/// order affects enumeration, not correctness.
pub fn identify(
    graph: &CausalGraph,
    x: &[Variable],
    y: &[Variable],
    u: &[Variable],
) -> Result<Vec<Expression>, PreconditionError> {
    if !pairwise_disjoint(x, y, u) {
        return Err(PreconditionError::SetsNotDisjoint);
    }

    let mut out = Vec::new();

    // Rule 1: no causal path.
    if graph.remove_into(x).is_d_separated(x, y, &[])? {
        out.push(Expression::probability(vars_symbol(y)));
    }

    // Rule 2: no confounding.
    if graph.remove_out_of(x).is_d_separated(x, y, &[])? {
        out.push(Expression::probability(vars_symbol(y)).given(vars_symbol(x)));
    }

    // Rule 3: back-door adjustment.
    let exclude: HashSet<Variable> = x.iter().chain(y.iter()).chain(u.iter()).cloned().collect();
    let backdoor_graph = graph.remove_out_of(x);
    for b in minimal_adjustment_sets(graph, x, y, &exclude, &backdoor_graph) {
        for sub in identify(graph, x, &b, u)? {
            let mut conditioning = b.clone();
            conditioning.extend(x.iter().cloned());
            out.push(Expression::summation(
                b.clone(),
                Expression::Product(vec![
                    Expression::probability(vars_symbol(y)).given(vars_symbol(&conditioning)),
                    sub,
                ]),
            ));
        }
    }

    // Rule 4: front-door / generalized front-door.
    let children_x: HashSet<Variable> = x.iter().flat_map(|xi| graph.children(xi)).collect();
    let ancestors_y: HashSet<Variable> = y.iter().flat_map(|yi| graph.ancestors(yi)).collect();
    let mut z1: Vec<Variable> = children_x
        .intersection(&ancestors_y)
        .filter(|v| !y.contains(v))
        .cloned()
        .collect();
    z1.sort();

    if !z1.is_empty() {
        let unconfounded_x_z1 = graph.remove_out_of(x).is_d_separated(x, &z1, &[])?;
        let unconfounded_z1_y = graph.remove_into(x).is_d_separated(&z1, y, x)?;

        if unconfounded_x_z1 && unconfounded_z1_y {
            out.push(front_door_term(x, y, &z1));
        } else {
            let exclude_z3: HashSet<Variable> = x.iter().chain(z1.iter()).cloned().collect();
            let z3_sets = minimal_adjustment_sets(graph, x, &z1, &exclude_z3, &graph.remove_out_of(x));

            let exclude_z4: HashSet<Variable> = z1.iter().chain(y.iter()).cloned().collect();
            let z4_sets = minimal_adjustment_sets(graph, &z1, y, &exclude_z4, &graph.remove_into(x));

            let mut seen: HashSet<Vec<Variable>> = HashSet::new();
            for z3 in &z3_sets {
                for z4 in &z4_sets {
                    let mut z2: Vec<Variable> = z3.iter().chain(z4.iter()).cloned().collect();
                    z2.sort();
                    z2.dedup();
                    if z2.iter().any(|v| x.contains(v)) {
                        continue;
                    }
                    if !seen.insert(z2.clone()) {
                        continue;
                    }
                    out.push(generalized_front_door_term(x, y, &z1, &z2));
                }
            }
        }
    }

    Ok(out)
}

fn pairwise_disjoint(x: &[Variable], y: &[Variable], u: &[Variable]) -> bool {
    let disjoint = |a: &[Variable], b: &[Variable]| a.iter().all(|v| !b.contains(v));
    disjoint(x, y) && disjoint(x, u) && disjoint(y, u)
}

/// Subsets of `candidates` (drawn from `nodes \ (x u y u exclude)`) that
/// satisfy the back-door criterion, scanned in ascending cardinality. Stops
/// at the first cardinality with any valid set, per the back-door
/// criterion's enumeration rule.
fn minimal_adjustment_sets(
    graph: &CausalGraph,
    from: &[Variable],
    to: &[Variable],
    exclude: &HashSet<Variable>,
    backdoor_graph: &CausalGraph,
) -> Vec<Vec<Variable>> {
    let mut candidates: Vec<Variable> = graph
        .nodes()
        .iter()
        .filter(|n| !from.contains(n) && !to.contains(n) && !exclude.contains(n))
        .cloned()
        .collect();
    candidates.sort();

    let descendants_from: HashSet<Variable> = from.iter().flat_map(|f| graph.descendants(f)).collect();

    for size in 0..=candidates.len() {
        let mut found = Vec::new();
        for subset in combinations(&candidates, size) {
            if subset.iter().any(|b| descendants_from.contains(b)) {
                continue;
            }
            if backdoor_graph.is_d_separated(from, to, &subset).unwrap_or(false) {
                found.push(subset);
            }
        }
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

fn combinations(items: &[Variable], k: usize) -> Vec<Vec<Variable>> {
    let mut result = Vec::new();
    let mut current = Vec::with_capacity(k);
    combinations_helper(items, k, 0, &mut current, &mut result);
    result
}

fn combinations_helper(
    items: &[Variable],
    k: usize,
    start: usize,
    current: &mut Vec<Variable>,
    result: &mut Vec<Vec<Variable>>,
) {
    if current.len() == k {
        result.push(current.clone());
        return;
    }
    for i in start..items.len() {
        current.push(items[i].clone());
        combinations_helper(items, k, i + 1, current, result);
        current.pop();
    }
}

fn vars_symbol(vars: &[Variable]) -> Expression {
    Expression::Raw(vars.iter().map(Variable::name).collect::<Vec<_>>().join(","))
}

/// A primed copy of `vars`, representing the dummy summation index `X'`
/// ranging over `X`'s support in the front-door formula.
fn primed(vars: &[Variable]) -> Vec<Variable> {
    vars.iter()
        .map(|v| Variable::new(format!("{}'", v.name()), v.support().to_vec()))
        .collect()
}

fn front_door_term(x: &[Variable], y: &[Variable], z1: &[Variable]) -> Expression {
    let x_prime = primed(x);
    let mut y_given = x_prime.clone();
    y_given.extend(z1.iter().cloned());

    Expression::summation(
        z1.to_vec(),
        Expression::Product(vec![
            Expression::probability(vars_symbol(z1)).given(vars_symbol(x)),
            Expression::summation(
                x_prime.clone(),
                Expression::Product(vec![
                    Expression::probability(vars_symbol(y)).given(vars_symbol(&y_given)),
                    Expression::probability(vars_symbol(&x_prime)),
                ]),
            ),
        ]),
    )
}

fn generalized_front_door_term(x: &[Variable], y: &[Variable], z1: &[Variable], z2: &[Variable]) -> Expression {
    let x_prime = primed(x);
    let mut indices = z1.to_vec();
    indices.extend(z2.iter().cloned());

    let mut z1_given = x.to_vec();
    z1_given.extend(z2.iter().cloned());

    let mut y_given = x_prime.clone();
    y_given.extend(z1.iter().cloned());
    y_given.extend(z2.iter().cloned());

    Expression::summation(
        indices,
        Expression::Product(vec![
            Expression::probability(vars_symbol(z2)),
            Expression::probability(vars_symbol(z1)).given(vars_symbol(&z1_given)),
            Expression::summation(
                x_prime.clone(),
                Expression::Product(vec![
                    Expression::probability(vars_symbol(y)).given(vars_symbol(&y_given)),
                    Expression::probability(vars_symbol(&x_prime)).given(vars_symbol(z2)),
                ]),
            ),
        ]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(name: &str) -> Variable {
        Variable::boolean(name)
    }

    #[test]
    fn s5_backdoor_requires_observable_confounder() {
        let (u, x, y) = (v("U"), v("X"), v("Y"));
        let mut g = CausalGraph::new();
        g.add_edge(u.clone(), x.clone());
        g.add_edge(u.clone(), y.clone());
        g.add_edge(x.clone(), y.clone());

        // U latent: no valid adjustment set excludes it, so not identifiable.
        let with_latent = identify(&g, &[x.clone()], &[y.clone()], &[u.clone()]).unwrap();
        assert!(with_latent.is_empty());

        // U observable: the back-door set {U} is now eligible.
        let with_observable = identify(&g, &[x], &[y], &[]).unwrap();
        assert!(!with_observable.is_empty());
    }

    #[test]
    fn no_causal_path_emits_marginal() {
        let (x, y) = (v("X"), v("Y"));
        let g = CausalGraph::new();
        let result = identify(&g, &[x], &[y.clone()], &[]).unwrap();
        assert!(result.iter().any(|e| e.to_string() == "P(Y)"));
    }

    #[test]
    fn disjointness_precondition_enforced() {
        let x = v("X");
        let g = CausalGraph::new();
        let err = identify(&g, &[x.clone()], &[x], &[]).unwrap_err();
        assert!(matches!(err, PreconditionError::SetsNotDisjoint));
    }
}
