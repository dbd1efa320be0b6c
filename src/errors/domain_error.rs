/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::error::Error;
use std::fmt;

/// Errors raised by the `DiscreteSet` algebra itself: axis bookkeeping
/// violations that indicate the caller built an ill-formed truth table or
/// asked for a contraction the operands cannot support.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DomainError {
    /// A dimension appeared twice in the same `DiscreteSet`.
    DuplicateDimension { name: String },
    /// `tensor` was asked to contract over an axis absent from an operand.
    AxisNotPresent { axis: String },
    /// A variable referenced by an expression has no free dimension in scope
    /// of the model being evaluated against.
    UnknownVariable { name: String },
    /// `match_to_broadcast` was asked to move a dimension into a slot that a
    /// different occurrence of the same dimension already occupies further
    /// right — the swap is ill-defined.
    MisalignedAxis { name: String },
    /// The flat value buffer passed to a constructor does not match the
    /// product of the declared axis lengths.
    ShapeMismatch { expected: usize, actual: usize },
    /// `values()` was called on a symbolic-only expression variant
    /// (`ProbabilityExpr`, `SummationExpr`, `ProductExpr`), which exists only
    /// to be rendered or emitted by the identification engine.
    NotEvaluable { description: String },
}

impl Error for DomainError {}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DomainError::DuplicateDimension { name } => {
                write!(f, "duplicate dimension in DiscreteSet: {name}")
            }
            DomainError::AxisNotPresent { axis } => {
                write!(f, "tensor contraction axis not present in operand: {axis}")
            }
            DomainError::UnknownVariable { name } => {
                write!(f, "variable not in scope of model: {name}")
            }
            DomainError::MisalignedAxis { name } => {
                write!(f, "axis cannot be aligned by match_to_broadcast: {name}")
            }
            DomainError::ShapeMismatch { expected, actual } => {
                write!(f, "value buffer length {actual} does not match declared shape product {expected}")
            }
            DomainError::NotEvaluable { description } => {
                write!(f, "expression has no truth-set projection: {description}")
            }
        }
    }
}
