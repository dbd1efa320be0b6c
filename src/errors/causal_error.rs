/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use crate::errors::{DomainError, InvariantError, ModelBuildError, PreconditionError};
use std::error::Error;
use std::fmt;

/// Catch-all error returned by the public evaluation APIs
/// (`CausalModel::probability`, `CausalGraph::is_d_separated`, ...). Wraps
/// the more specific error kinds so callers can use `?` across module
/// boundaries without a combinatorial explosion of `Result` types.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CausalError {
    Domain(DomainError),
    Precondition(PreconditionError),
    ModelBuild(ModelBuildError),
    Invariant(InvariantError),
}

impl Error for CausalError {}

impl fmt::Display for CausalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CausalError::Domain(e) => write!(f, "{e}"),
            CausalError::Precondition(e) => write!(f, "{e}"),
            CausalError::ModelBuild(e) => write!(f, "{e}"),
            CausalError::Invariant(e) => write!(f, "{e}"),
        }
    }
}

impl From<DomainError> for CausalError {
    fn from(err: DomainError) -> Self {
        CausalError::Domain(err)
    }
}

impl From<PreconditionError> for CausalError {
    fn from(err: PreconditionError) -> Self {
        CausalError::Precondition(err)
    }
}

impl From<ModelBuildError> for CausalError {
    fn from(err: ModelBuildError) -> Self {
        CausalError::ModelBuild(err)
    }
}

impl From<InvariantError> for CausalError {
    fn from(err: InvariantError) -> Self {
        CausalError::Invariant(err)
    }
}
