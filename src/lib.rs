//! Policy Equality Engine
//!
//! Order-independent semantic equality for usage policies. Two policies
//! that differ only in the ordering of logically unordered constraint
//! groups (AND, OR, XONE children) express the same terms; this crate
//! decides that equivalence during contract negotiation, where an offered
//! policy must be matched against the one the counterparty sent back.
//!
//! The engine compares in two phases: an exact structural check first,
//! then a canonicalization of both operands followed by a second exact
//! check. Canonicalization collapses single-child wrapper groups and
//! sorts multiplicity children into the fixed order defined by
//! [`ConstraintComparator`].

pub mod canonicalization;
pub mod comparator;
pub mod equality;
pub mod error;
pub mod hash;
pub mod policy;
pub mod types;

pub use comparator::{ConstraintComparator, ConstraintKey};
pub use equality::{ExactEquality, PolicyEquality, StructuralEquality};
pub use error::{PolicyError, Result};
pub use policy::Policy;

/// Version of the equality engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::comparator::{ConstraintComparator, ConstraintKey};
    pub use crate::equality::{ExactEquality, PolicyEquality, StructuralEquality};
    pub use crate::error::{PolicyError, Result};
    pub use crate::policy::{Action, Duty, Permission, Policy, PolicyType, Prohibition};
    pub use crate::types::*;
}
