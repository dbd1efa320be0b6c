/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::error::Error;
use std::fmt;

/// Violations of an operation's stated preconditions. These are fatal to the
/// call that raised them and are never recoverable by retrying with the same
/// inputs.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum PreconditionError {
    /// d-separation (or any graph algorithm that assumes acyclicity) was
    /// invoked on a graph containing a directed cycle.
    GraphNotAcyclic,
    /// An exogenous root of the model's graph has neither an entry in the
    /// `IndependentDistribution` nor a governing `ConstantFunction`.
    MissingExogenousDistribution { variable: String },
    /// `X`, `Y`, and `U` passed to the identification engine are not
    /// pairwise disjoint.
    SetsNotDisjoint,
}

impl Error for PreconditionError {}

impl fmt::Display for PreconditionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PreconditionError::GraphNotAcyclic => {
                write!(f, "operation requires an acyclic graph, but a cycle was found")
            }
            PreconditionError::MissingExogenousDistribution { variable } => {
                write!(
                    f,
                    "exogenous root '{variable}' has no distribution and no constant function"
                )
            }
            PreconditionError::SetsNotDisjoint => {
                write!(f, "X, Y and U must be pairwise disjoint")
            }
        }
    }
}
