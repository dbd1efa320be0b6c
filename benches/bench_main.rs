/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use causal_model::{CausalGraph, CausalModel, DiscreteFunction, DiscreteSet, Expression, IndependentDistribution, Variable};
use criterion::{criterion_group, criterion_main, Criterion};

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

fn chain_graph(len: usize) -> (CausalGraph, Variable, Variable) {
    let mut g = CausalGraph::new();
    let vars: Vec<Variable> = (0..len).map(|i| Variable::boolean(format!("V{i}"))).collect();
    for pair in vars.windows(2) {
        g.add_edge(pair[0].clone(), pair[1].clone());
    }
    (g, vars[0].clone(), vars[len - 1].clone())
}

fn discrete_set_tensor_benchmark(c: &mut Criterion) {
    let x = Variable::boolean("X");
    let y = Variable::boolean("Y");
    let preimage = DiscreteSet::from_fn(vec![x.clone(), y.clone()], |idx| idx[0] != idx[1]).unwrap();
    let x_true = DiscreteSet::equals_value(&x, &causal_model::Atom::Bool(true));

    c.bench_function("tensor_contraction_2x2", |b| b.iter(|| preimage.tensor(&x_true, &x).unwrap()));
}

fn probability_query_benchmark(c: &mut Criterion) {
    let z = Variable::boolean("Z");
    let mut model = xor_scm();

    c.bench_function("xor_scm_probability", |b| {
        b.iter(|| model.probability(&Expression::var_eq(z.clone(), causal_model::Atom::Bool(true))).unwrap())
    });
}

fn d_separation_benchmark(c: &mut Criterion) {
    let (g, start, end) = chain_graph(20);

    c.bench_function("d_separation_chain_20", |b| b.iter(|| g.is_d_separated(&[start.clone()], &[end.clone()], &[]).unwrap()));
}

criterion_group!(benches, discrete_set_tensor_benchmark, probability_query_benchmark, d_separation_benchmark);
criterion_main!(benches);
