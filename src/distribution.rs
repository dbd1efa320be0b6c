/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::discrete_set::DiscreteSet;
use crate::errors::{CausalError, InvariantError, PreconditionError};
use crate::variable::Variable;

/// A joint distribution over exogenous variables, factorized as independent
/// 1-D marginals, plus the seed driving sampling.
///
/// No ambient randomness: the seed is supplied by the caller at
/// construction, never read from the environment.
#[derive(Debug, Clone)]
pub struct IndependentDistribution {
    marginals: HashMap<Variable, Vec<f64>>,
    seed: u64,
}

impl IndependentDistribution {
    pub fn new(seed: u64) -> Self {
        Self {
            marginals: HashMap::new(),
            seed,
        }
    }

    /// Registers `var`'s marginal pmf, aligned with `var.support()`.
    pub fn insert(&mut self, var: Variable, pmf: Vec<f64>) {
        self.marginals.insert(var, pmf);
    }

    pub fn with(mut self, var: Variable, pmf: Vec<f64>) -> Self {
        self.insert(var, pmf);
        self
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.marginals.contains_key(var)
    }

    pub fn marginal(&self, var: &Variable) -> Option<&[f64]> {
        self.marginals.get(var).map(Vec::as_slice)
    }

    /// One sample vector of length `size` per governed variable, drawn from
    /// a generator seeded once and advanced deterministically across
    /// variables in sorted order.
    pub fn rvs(&self, size: usize) -> HashMap<Variable, Vec<crate::variable::Atom>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut vars: Vec<&Variable> = self.marginals.keys().collect();
        vars.sort();

        let mut out = HashMap::new();
        for var in vars {
            let pmf = &self.marginals[var];
            let mut samples = Vec::with_capacity(size);
            for _ in 0..size {
                let u: f64 = rng.random();
                let mut cumulative = 0.0;
                let mut chosen = pmf.len().saturating_sub(1);
                for (i, &p) in pmf.iter().enumerate() {
                    cumulative += p;
                    if u < cumulative {
                        chosen = i;
                        break;
                    }
                }
                samples.push(var.support()[chosen].clone());
            }
            out.insert(var.clone(), samples);
        }
        out
    }

    /// `Sum_{v in set_} Prod_i P(dim_i = support_i[v_i])`: the joint mass of
    /// the valuations `set_` marks true. Every dimension of `set_` must have
    /// a registered marginal.
    pub fn pmf(&self, set_: &DiscreteSet) -> Result<f64, CausalError> {
        for d in set_.dimensions() {
            if !self.contains(d) {
                return Err(PreconditionError::MissingExogenousDistribution {
                    variable: d.name().to_string(),
                }
                .into());
            }
        }

        let mut total = 0.0;
        for idx in set_.indices() {
            if set_.is_true(&idx) {
                let mut p = 1.0;
                for (axis, &i) in idx.iter().enumerate() {
                    let var = &set_.dimensions()[axis];
                    p *= self.marginals[var][i];
                }
                total += p;
            }
        }

        if total > 1.0 + 1e-9 {
            return Err(InvariantError::PmfExceedsOne { mass: total }.into());
        }
        Ok(total.min(1.0))
    }
}
