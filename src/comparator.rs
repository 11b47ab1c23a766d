//! Canonical ordering over constraint nodes.
//!
//! Sibling constraints inside a multiplicity group carry no meaning in
//! their order, so the canonicalizer needs one fixed order to rewrite every
//! equivalent group into. The order is:
//!
//! 1. Multiplicity constraints sort before atomic constraints.
//! 2. Multiplicity constraints sort by kind identifier (`and` < `or` <
//!    `xone`), then by the content digest of their canonical JSON form.
//! 3. Atomic constraints sort by stringified left expression, then
//!    operator identifier, then stringified right expression.
//!
//! Comparison is fallible: an expression without a stable rendering must
//! abort the whole equality test instead of landing somewhere arbitrary.
//! Callers therefore extract a [`ConstraintKey`] per element first and run
//! the infallible sort on the keys.

use std::cmp::Ordering;

use serde_json::Value;

use crate::canonicalization::canonical_json;
use crate::error::{PolicyError, Result};
use crate::hash::constraint_digest;
use crate::types::{Constraint, Expression};

/// Total order over constraint nodes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintComparator;

impl ConstraintComparator {
    /// Creates a comparator.
    pub fn new() -> Self {
        Self
    }

    /// Compares two constraints under the canonical order.
    pub fn compare(&self, one: &Constraint, two: &Constraint) -> Result<Ordering> {
        Ok(self.sort_key(one)?.cmp(&self.sort_key(two)?))
    }

    /// Extracts the ordering key of a constraint.
    ///
    /// This is the fallible half of the comparison: stringification and
    /// digest failures surface here, before any sort runs.
    pub fn sort_key(&self, constraint: &Constraint) -> Result<ConstraintKey> {
        match constraint {
            Constraint::Multiplicity(multiplicity) => Ok(ConstraintKey::Multiplicity {
                kind: multiplicity.kind.as_str(),
                digest: constraint_digest(constraint)?,
            }),
            Constraint::Atomic(atomic) => Ok(ConstraintKey::Atomic {
                left: expression_as_string(&atomic.left)?,
                operator: atomic.operator.as_str(),
                right: expression_as_string(&atomic.right)?,
            }),
        }
    }
}

/// The ordering key extracted from a constraint.
///
/// Keys compare by the derived lexicographic order over their fields, and
/// the variant declaration order puts every multiplicity key before every
/// atomic key. The order is canonical only up to two rendering ties: two
/// distinct same-kind multiplicity constraints can share a key if their
/// digests collide (practically impossible with SHA-256), and two
/// distinct atomic constraints can share a key when differently typed
/// literals render alike, as the number `1` and the string `"1"` both do.
/// No secondary tie-break exists. A tie leaves tied elements in their
/// original relative order, which can report equivalent policies as not
/// equal but never reports different policies as equal, since the final
/// check is still exact structural equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstraintKey {
    /// Kind identifier, then content digest.
    Multiplicity {
        kind: &'static str,
        digest: String,
    },
    /// Stringified left expression, operator identifier, stringified right
    /// expression.
    Atomic {
        left: String,
        operator: &'static str,
        right: String,
    },
}

/// Renders an expression for lexical comparison.
///
/// String literals render as their raw text, every other literal as its
/// canonical JSON. The two can coincide (the string `"1"` and the number
/// `1` render alike); see [`ConstraintKey`] for how such ties behave.
/// Reference expressions have no stable rendering and are rejected.
fn expression_as_string(expression: &Expression) -> Result<String> {
    match expression {
        Expression::Literal(Value::String(s)) => Ok(s.clone()),
        Expression::Literal(value) => canonical_json(value),
        Expression::Reference(_) => Err(PolicyError::UnsupportedExpression(
            "reference".to_string(),
        )),
    }
}
