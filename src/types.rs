//! Core types for the constraint tree.
//!
//! A constraint is either atomic (left expression, operator, right
//! expression) or a multiplicity node (AND, OR, XONE) grouping child
//! constraints. Multiplicity children are logically unordered; the list
//! order they happen to carry is a serialization accident that the
//! canonicalizer removes.

use serde::{Deserialize, Serialize};

/// An operand of an atomic constraint.
///
/// Only literal expressions take part in canonical ordering. The reference
/// variant models operands resolved at evaluation time elsewhere; feeding
/// one to the comparator is an error, not a silent fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expression {
    /// A self-contained value.
    Literal(serde_json::Value),
    /// A named value resolved against an evaluation scope.
    Reference(String),
}

impl Expression {
    /// Creates a literal expression from any JSON-convertible value.
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Creates a reference expression pointing at a named scope value.
    pub fn reference(name: impl Into<String>) -> Self {
        Expression::Reference(name.into())
    }
}

/// Relational operator of an atomic constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Geq,
    Lt,
    Leq,
    In,
    HasPart,
    IsA,
    IsAllOf,
    IsAnyOf,
    IsNoneOf,
}

impl Operator {
    /// Stable identifier used for serialization and canonical ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Geq => "geq",
            Operator::Lt => "lt",
            Operator::Leq => "leq",
            Operator::In => "in",
            Operator::HasPart => "has_part",
            Operator::IsA => "is_a",
            Operator::IsAllOf => "is_all_of",
            Operator::IsAnyOf => "is_any_of",
            Operator::IsNoneOf => "is_none_of",
        }
    }
}

/// Logical connective of a multiplicity constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiplicityKind {
    And,
    Or,
    Xone,
}

impl MultiplicityKind {
    /// Stable identifier used for serialization and canonical ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            MultiplicityKind::And => "and",
            MultiplicityKind::Or => "or",
            MultiplicityKind::Xone => "xone",
        }
    }
}

/// A leaf constraint comparing two expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomicConstraint {
    pub left: Expression,
    pub operator: Operator,
    pub right: Expression,
}

/// A composite constraint over one or more children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplicityConstraint {
    pub kind: MultiplicityKind,
    pub children: Vec<Constraint>,
}

/// A node of the constraint tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Constraint {
    Atomic(AtomicConstraint),
    Multiplicity(MultiplicityConstraint),
}

impl Constraint {
    /// Creates an atomic constraint.
    pub fn atomic(left: Expression, operator: Operator, right: Expression) -> Self {
        Constraint::Atomic(AtomicConstraint {
            left,
            operator,
            right,
        })
    }

    /// Creates a multiplicity constraint of the given kind.
    pub fn multiplicity(kind: MultiplicityKind, children: Vec<Constraint>) -> Self {
        Constraint::Multiplicity(MultiplicityConstraint { kind, children })
    }

    /// Creates an AND constraint.
    pub fn and(children: Vec<Constraint>) -> Self {
        Self::multiplicity(MultiplicityKind::And, children)
    }

    /// Creates an OR constraint.
    pub fn or(children: Vec<Constraint>) -> Self {
        Self::multiplicity(MultiplicityKind::Or, children)
    }

    /// Creates a XONE (exactly-one) constraint.
    pub fn xone(children: Vec<Constraint>) -> Self {
        Self::multiplicity(MultiplicityKind::Xone, children)
    }

    /// Returns true for leaf constraints.
    pub fn is_atomic(&self) -> bool {
        matches!(self, Constraint::Atomic(_))
    }

    /// Returns true for composite constraints.
    pub fn is_multiplicity(&self) -> bool {
        matches!(self, Constraint::Multiplicity(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operator_identifiers() {
        assert_eq!(Operator::Eq.as_str(), "eq");
        assert_eq!(Operator::Geq.as_str(), "geq");
        assert_eq!(Operator::HasPart.as_str(), "has_part");
        assert_eq!(Operator::IsNoneOf.as_str(), "is_none_of");
    }

    #[test]
    fn test_operator_serializes_to_identifier() {
        let value = serde_json::to_value(Operator::IsAnyOf).unwrap();
        assert_eq!(value, json!("is_any_of"));
    }

    #[test]
    fn test_atomic_constructor() {
        let constraint = Constraint::atomic(
            Expression::literal("ResourceKind"),
            Operator::Eq,
            Expression::literal("dataset"),
        );
        assert!(constraint.is_atomic());
        assert!(!constraint.is_multiplicity());
    }

    #[test]
    fn test_multiplicity_constructors() {
        let leaf = Constraint::atomic(
            Expression::literal("Region"),
            Operator::In,
            Expression::literal(json!(["eu", "us"])),
        );
        let and = Constraint::and(vec![leaf.clone()]);
        let or = Constraint::or(vec![leaf.clone()]);
        let xone = Constraint::xone(vec![leaf]);
        assert!(and.is_multiplicity());
        match (and, or, xone) {
            (
                Constraint::Multiplicity(a),
                Constraint::Multiplicity(o),
                Constraint::Multiplicity(x),
            ) => {
                assert_eq!(a.kind, MultiplicityKind::And);
                assert_eq!(o.kind, MultiplicityKind::Or);
                assert_eq!(x.kind, MultiplicityKind::Xone);
            }
            _ => panic!("expected multiplicity constraints"),
        }
    }

    #[test]
    fn test_constraint_json_shape() {
        let constraint = Constraint::atomic(
            Expression::literal("Membership"),
            Operator::Eq,
            Expression::literal("active"),
        );
        let value = serde_json::to_value(&constraint).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "atomic",
                "left": { "literal": "Membership" },
                "operator": "eq",
                "right": { "literal": "active" },
            })
        );
    }

    #[test]
    fn test_multiplicity_json_shape() {
        let constraint = Constraint::or(vec![Constraint::atomic(
            Expression::literal("Membership"),
            Operator::Eq,
            Expression::literal("active"),
        )]);
        let value = serde_json::to_value(&constraint).unwrap();
        assert_eq!(value["type"], json!("multiplicity"));
        assert_eq!(value["kind"], json!("or"));
        assert_eq!(value["children"][0]["type"], json!("atomic"));
    }

    #[test]
    fn test_constraint_round_trip() {
        let constraint = Constraint::and(vec![
            Constraint::atomic(
                Expression::literal("Membership"),
                Operator::Eq,
                Expression::literal("active"),
            ),
            Constraint::or(vec![
                Constraint::atomic(
                    Expression::reference("group"),
                    Operator::IsAnyOf,
                    Expression::literal(json!(["gold", "silver"])),
                ),
                Constraint::atomic(
                    Expression::literal("Number"),
                    Operator::Neq,
                    Expression::literal(7),
                ),
            ]),
        ]);
        let json = serde_json::to_string(&constraint).unwrap();
        let parsed: Constraint = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, constraint);
    }
}
