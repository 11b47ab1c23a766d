//! Two-phase semantic equality over policies.
//!
//! Serialized policies reach a negotiation in whatever order their producer
//! happened to emit, so an exact structural comparison rejects documents
//! that agree on every term. The engine answers the semantic question in
//! two phases: try the exact predicate as-is, and when that fails,
//! canonicalize both operands and try once more.
//!
//! Canonicalization rewrites every rule's constraint tree into one fixed
//! shape: single-child multiplicity wrappers collapse, and the children of
//! every multiplicity group are sorted under the canonical order of
//! [`ConstraintComparator`]. Rule lists, actions, duties, remedies and
//! consequences pass through untouched.

use tracing::debug;

use crate::comparator::ConstraintComparator;
use crate::error::{PolicyError, Result};
use crate::policy::{Duty, Permission, Policy, Prohibition};
use crate::types::{Constraint, MultiplicityConstraint};

/// Order-sensitive structural comparison of two policies.
///
/// The engine treats this as an opaque primitive: the fast path runs it on
/// the operands as given, the retry on the two canonical copies.
pub trait ExactEquality {
    /// Returns true when the two policies are structurally identical.
    fn test(&self, one: &Policy, two: &Policy) -> bool;
}

/// Field-by-field comparison through the model's derived `PartialEq`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralEquality;

impl ExactEquality for StructuralEquality {
    fn test(&self, one: &Policy, two: &Policy) -> bool {
        one == two
    }
}

/// The policy equality engine.
#[derive(Debug)]
pub struct PolicyEquality<E = StructuralEquality> {
    exact: E,
    comparator: ConstraintComparator,
}

impl PolicyEquality<StructuralEquality> {
    /// Creates an engine backed by the default structural predicate.
    pub fn new() -> Self {
        Self::with_exact(StructuralEquality)
    }
}

impl Default for PolicyEquality<StructuralEquality> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ExactEquality> PolicyEquality<E> {
    /// Creates an engine around a caller-supplied exact predicate.
    pub fn with_exact(exact: E) -> Self {
        Self {
            exact,
            comparator: ConstraintComparator::new(),
        }
    }

    /// Tests whether two policies express the same terms.
    ///
    /// Policies are equal when they match exactly, or when their canonical
    /// forms do. An error means the comparison could not be carried out;
    /// it never means "not equal".
    pub fn test(&self, one: &Policy, two: &Policy) -> Result<bool> {
        if self.exact.test(one, two) {
            return Ok(true);
        }

        let one_canonical = self.canonicalize(one)?;
        let two_canonical = self.canonicalize(two)?;

        debug!(original = ?one, canonical = ?one_canonical, "canonicalized first policy for retry");
        debug!(original = ?two, canonical = ?two_canonical, "canonicalized second policy for retry");

        Ok(self.exact.test(&one_canonical, &two_canonical))
    }

    /// Produces the canonical copy of a policy.
    ///
    /// Rule lists keep their order; only the constraint tree inside each
    /// rule is rewritten. The input is never modified.
    fn canonicalize(&self, policy: &Policy) -> Result<Policy> {
        Ok(Policy {
            policy_type: policy.policy_type,
            assigner: policy.assigner.clone(),
            assignee: policy.assignee.clone(),
            target: policy.target.clone(),
            permissions: policy
                .permissions
                .iter()
                .map(|permission| self.canonicalize_permission(permission))
                .collect::<Result<_>>()?,
            prohibitions: policy
                .prohibitions
                .iter()
                .map(|prohibition| self.canonicalize_prohibition(prohibition))
                .collect::<Result<_>>()?,
            obligations: policy
                .obligations
                .iter()
                .map(|obligation| self.canonicalize_obligation(obligation))
                .collect::<Result<_>>()?,
            extensible_properties: policy.extensible_properties.clone(),
        })
    }

    fn canonicalize_permission(&self, permission: &Permission) -> Result<Permission> {
        Ok(Permission {
            action: permission.action.clone(),
            constraints: self.canonicalize_constraints(&permission.constraints)?,
            duties: permission.duties.clone(),
        })
    }

    fn canonicalize_prohibition(&self, prohibition: &Prohibition) -> Result<Prohibition> {
        Ok(Prohibition {
            action: prohibition.action.clone(),
            constraints: self.canonicalize_constraints(&prohibition.constraints)?,
            remedies: prohibition.remedies.clone(),
        })
    }

    fn canonicalize_obligation(&self, obligation: &Duty) -> Result<Duty> {
        Ok(Duty {
            action: obligation.action.clone(),
            constraints: self.canonicalize_constraints(&obligation.constraints)?,
            consequences: obligation.consequences.clone(),
        })
    }

    /// Canonicalizes one constraint sequence: collapse trivial wrappers,
    /// recurse into multiplicity children, then sort by extracted keys.
    fn canonicalize_constraints(&self, constraints: &[Constraint]) -> Result<Vec<Constraint>> {
        let mut keyed = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            let canonical = self.canonicalize_constraint(unwrap_multiplicity(constraint)?)?;
            let key = self.comparator.sort_key(&canonical)?;
            keyed.push((key, canonical));
        }
        keyed.sort_by(|(one, _), (two, _)| one.cmp(two));
        Ok(keyed.into_iter().map(|(_, constraint)| constraint).collect())
    }

    /// Rebuilds a multiplicity constraint around its canonicalized
    /// children; atomic constraints pass through unchanged.
    fn canonicalize_constraint(&self, constraint: &Constraint) -> Result<Constraint> {
        match constraint {
            Constraint::Multiplicity(multiplicity) => {
                Ok(Constraint::Multiplicity(MultiplicityConstraint {
                    kind: multiplicity.kind,
                    children: self.canonicalize_constraints(&multiplicity.children)?,
                }))
            }
            Constraint::Atomic(_) => Ok(constraint.clone()),
        }
    }
}

/// Collapses single-child multiplicity wrappers.
///
/// A group of one imposes exactly its child, so `AND(x)`, `OR(x)` and
/// `XONE(x)` all reduce to `x`. The reduction runs to a fixpoint and
/// wrapper chains like `AND(OR(x))` vanish entirely. A multiplicity
/// constraint with no children has no meaning here and is rejected.
fn unwrap_multiplicity(constraint: &Constraint) -> Result<&Constraint> {
    let mut current = constraint;
    while let Constraint::Multiplicity(multiplicity) = current {
        match multiplicity.children.len() {
            0 => {
                return Err(PolicyError::MalformedConstraint(format!(
                    "{} constraint has no children",
                    multiplicity.kind.as_str()
                )))
            }
            1 => current = &multiplicity.children[0],
            _ => break,
        }
    }
    Ok(current)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::policy::{Action, Permission};
    use crate::types::{Expression, MultiplicityKind, Operator};
    use proptest::prelude::*;

    fn arb_operator() -> impl Strategy<Value = Operator> {
        prop_oneof![
            Just(Operator::Eq),
            Just(Operator::Neq),
            Just(Operator::Gt),
            Just(Operator::Leq),
            Just(Operator::In),
            Just(Operator::IsAnyOf),
        ]
    }

    fn arb_kind() -> impl Strategy<Value = MultiplicityKind> {
        prop_oneof![
            Just(MultiplicityKind::And),
            Just(MultiplicityKind::Or),
            Just(MultiplicityKind::Xone),
        ]
    }

    fn arb_atomic() -> impl Strategy<Value = Constraint> {
        ("[a-z]{1,8}", arb_operator(), "[a-z0-9]{1,8}").prop_map(|(left, operator, right)| {
            Constraint::atomic(
                Expression::literal(left),
                operator,
                Expression::literal(right),
            )
        })
    }

    fn arb_constraint() -> impl Strategy<Value = Constraint> {
        arb_atomic().prop_recursive(3, 24, 4, |inner| {
            (arb_kind(), prop::collection::vec(inner, 1..4))
                .prop_map(|(kind, children)| Constraint::multiplicity(kind, children))
        })
    }

    fn reverse_children(constraint: &Constraint) -> Constraint {
        match constraint {
            Constraint::Atomic(_) => constraint.clone(),
            Constraint::Multiplicity(multiplicity) => Constraint::multiplicity(
                multiplicity.kind,
                multiplicity
                    .children
                    .iter()
                    .rev()
                    .map(reverse_children)
                    .collect(),
            ),
        }
    }

    fn policy_of(constraints: Vec<Constraint>) -> Policy {
        Policy::new()
            .with_permission(Permission::new(Action::new("use")).with_constraints(constraints))
    }

    proptest! {
        #[test]
        fn equality_is_reflexive(constraint in arb_constraint()) {
            let engine = PolicyEquality::new();
            let policy = policy_of(vec![constraint]);
            prop_assert!(engine.test(&policy, &policy.clone()).unwrap());
        }

        #[test]
        fn reversing_children_preserves_equality(constraint in arb_constraint()) {
            let engine = PolicyEquality::new();
            let one = policy_of(vec![constraint.clone()]);
            let two = policy_of(vec![reverse_children(&constraint)]);
            prop_assert!(engine.test(&one, &two).unwrap());
        }

        #[test]
        fn wrapping_in_single_child_group_preserves_equality(
            constraint in arb_constraint(),
            kind in arb_kind(),
        ) {
            let engine = PolicyEquality::new();
            let wrapped = policy_of(vec![Constraint::multiplicity(kind, vec![constraint.clone()])]);
            let plain = policy_of(vec![constraint]);
            prop_assert!(engine.test(&wrapped, &plain).unwrap());
        }

        #[test]
        fn canonicalization_is_idempotent(constraint in arb_constraint()) {
            let engine = PolicyEquality::new();
            let policy = policy_of(vec![constraint]);
            let once = engine.canonicalize(&policy).unwrap();
            let twice = engine.canonicalize(&once).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn canonicalization_is_deterministic(constraint in arb_constraint()) {
            let engine = PolicyEquality::new();
            let policy = policy_of(vec![constraint]);
            prop_assert_eq!(
                engine.canonicalize(&policy).unwrap(),
                engine.canonicalize(&policy).unwrap()
            );
        }
    }
}
