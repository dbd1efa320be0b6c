/*
 * SPDX-License-Identifier: MIT
 * Copyright (c) "2025" . The causal_model Authors and Contributors. All Rights Reserved.
 */

use std::fmt;

use crate::discrete_set::DiscreteSet;
use crate::errors::DomainError;
use crate::variable::{Atom, Variable};

/// One side of an `EqualityExpr`: either a variable or a literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Var(Variable),
    Literal(Atom),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "{v}"),
            Term::Literal(a) => write!(f, "{a}"),
        }
    }
}

/// A propositional or probabilistic term.
///
/// `Equality`, `Conjunction`, `Disjunction`, `ExclusiveDisjunction` and
/// `Negation` expose a truth-set projection via [`Expression::values`].
/// `Probability`, `Summation` and `Product` are symbolic only — they exist
/// to be emitted by the identification engine and rendered with `Display`;
/// calling `values()` on one is a domain error.
#[derive(Debug, Clone)]
pub enum Expression {
    Equality {
        lhs: Term,
        rhs: Term,
    },
    Conjunction(Vec<Expression>),
    Disjunction(Vec<Expression>),
    ExclusiveDisjunction(Vec<Expression>),
    Negation(Box<Expression>),
    Probability {
        event: Box<Expression>,
        condition: Option<Box<Expression>>,
        do_: Option<(Variable, Atom)>,
    },
    Summation {
        indices: Vec<Variable>,
        body: Box<Expression>,
    },
    Product(Vec<Expression>),
    /// A pre-rendered symbolic fragment, e.g. a node-set label like `"Y"` or
    /// `"Z1,Z2"`. Used by the identification engine to name variable sets
    /// that have no single value being asserted — unlike `Equality`, there
    /// is no concrete valuation to project into a truth-set.
    Raw(String),
}

impl Expression {
    pub fn equals(lhs: Term, rhs: Term) -> Self {
        Expression::Equality { lhs, rhs }
    }

    pub fn var_eq(var: Variable, value: Atom) -> Self {
        Self::equals(Term::Var(var), Term::Literal(value))
    }

    pub fn vars_eq(a: Variable, b: Variable) -> Self {
        Self::equals(Term::Var(a), Term::Var(b))
    }

    pub fn not(self) -> Self {
        Expression::Negation(Box::new(self))
    }

    pub fn probability(event: Expression) -> Self {
        Expression::Probability {
            event: Box::new(event),
            condition: None,
            do_: None,
        }
    }

    pub fn given(self, condition: Expression) -> Self {
        match self {
            Expression::Probability { event, do_, .. } => Expression::Probability {
                event,
                condition: Some(Box::new(condition)),
                do_,
            },
            other => other,
        }
    }

    pub fn do_intervention(self, var: Variable, value: Atom) -> Self {
        match self {
            Expression::Probability { event, condition, .. } => Expression::Probability {
                event,
                condition,
                do_: Some((var, value)),
            },
            other => other,
        }
    }

    pub fn summation(indices: Vec<Variable>, body: Expression) -> Self {
        Expression::Summation {
            indices,
            body: Box::new(body),
        }
    }

    /// The free variables of an evaluable expression — the dimensions
    /// `values()` will return.
    pub fn values(&self) -> Result<DiscreteSet, DomainError> {
        match self {
            Expression::Equality { lhs, rhs } => match (lhs, rhs) {
                (Term::Var(v), Term::Literal(a)) | (Term::Literal(a), Term::Var(v)) => {
                    Ok(DiscreteSet::equals_value(v, a))
                }
                (Term::Var(a), Term::Var(b)) => Ok(DiscreteSet::equals_variable(a, b)),
                (Term::Literal(a), Term::Literal(b)) => Ok(DiscreteSet::scalar(a == b)),
            },
            Expression::Conjunction(es) => fold_values(es, |a, b| a.and(b)),
            Expression::Disjunction(es) => fold_values(es, |a, b| a.or(b)),
            Expression::ExclusiveDisjunction(es) => fold_values(es, |a, b| a.xor(b)),
            Expression::Negation(inner) => Ok(inner.values()?.not()),
            Expression::Probability { .. }
            | Expression::Summation { .. }
            | Expression::Product(_)
            | Expression::Raw(_) => Err(DomainError::NotEvaluable {
                description: self.to_string(),
            }),
        }
    }
}

fn fold_values(
    es: &[Expression],
    op: impl Fn(&DiscreteSet, &DiscreteSet) -> Result<DiscreteSet, DomainError>,
) -> Result<DiscreteSet, DomainError> {
    let mut iter = es.iter();
    let first = iter.next().ok_or_else(|| DomainError::NotEvaluable {
        description: "empty expression list".to_string(),
    })?;
    let mut acc = first.values()?;
    for e in iter {
        acc = op(&acc, &e.values()?)?;
    }
    Ok(acc)
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expression::Equality { lhs, rhs } => write!(f, "{lhs} = {rhs}"),
            Expression::Conjunction(es) => write!(f, "{}", join(es, ", ")),
            Expression::Disjunction(es) => write!(f, "{}", join(es, " \u{2228} ")),
            Expression::ExclusiveDisjunction(es) => write!(f, "{}", join(es, " \u{2295} ")),
            Expression::Negation(inner) => match inner.as_ref() {
                Expression::Equality { lhs, rhs } => write!(f, "{lhs} \u{2260} {rhs}"),
                other => write!(f, "\u{ac}{other}"),
            },
            Expression::Probability { event, condition, do_ } => {
                write!(f, "P({event}")?;
                if let Some(c) = condition {
                    write!(f, " | {c}")?;
                }
                if let Some((var, value)) = do_ {
                    write!(f, " | do({} = {})", var.name(), value)?;
                }
                write!(f, ")")
            }
            Expression::Summation { indices, body } => {
                let names: Vec<&str> = indices.iter().map(Variable::name).collect();
                write!(f, "\u{3a3}_{{{}}} {body}", names.join(","))
            }
            Expression::Product(es) => write!(f, "{}", join(es, " ")),
            Expression::Raw(s) => write!(f, "{s}"),
        }
    }
}

fn join(es: &[Expression], sep: &str) -> String {
    es.iter().map(Expression::to_string).collect::<Vec<_>>().join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Variable {
        Variable::boolean("X")
    }

    #[test]
    fn equality_variable_literal_marks_single_index() {
        let set_ = Expression::var_eq(x(), Atom::Bool(true)).values().unwrap();
        assert_eq!(set_.get(&[0]), 0);
        assert_eq!(set_.get(&[1]), 1);
    }

    #[test]
    fn equality_variable_variable_is_diagonal() {
        let (a, b) = (Variable::boolean("A"), Variable::boolean("B"));
        let set_ = Expression::vars_eq(a, b).values().unwrap();
        assert_eq!(set_.get(&[0, 0]), 1);
        assert_eq!(set_.get(&[0, 1]), 0);
        assert_eq!(set_.get(&[1, 1]), 1);
    }

    #[test]
    fn equality_literal_literal_is_scalar() {
        let set_ = Expression::equals(Term::Literal(Atom::Bool(true)), Term::Literal(Atom::Bool(true)))
            .values()
            .unwrap();
        assert_eq!(set_.rank(), 0);
        assert_eq!(set_.get(&[]), 1);
    }

    #[test]
    fn negated_equality_renders_with_not_equal_sign() {
        let expr = Expression::var_eq(x(), Atom::Bool(true)).not();
        assert_eq!(expr.to_string(), "X \u{2260} true");
    }

    #[test]
    fn probability_rendering_omits_empty_clauses() {
        let p = Expression::probability(Expression::var_eq(x(), Atom::Bool(true)));
        assert_eq!(p.to_string(), "P(X = true)");

        let p_do = p.do_intervention(x(), Atom::Bool(false));
        assert_eq!(p_do.to_string(), "P(X = true | do(X = false))");
    }

    #[test]
    fn symbolic_variants_are_not_evaluable() {
        let p = Expression::probability(Expression::var_eq(x(), Atom::Bool(true)));
        assert!(matches!(p.values(), Err(DomainError::NotEvaluable { .. })));
    }
}
