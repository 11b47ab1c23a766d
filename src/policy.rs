//! Policy documents and their rules.
//!
//! A policy carries three rule lists: permissions, prohibitions, and
//! obligations. Rule list order is significant and survives
//! canonicalization; only the constraint trees inside each rule are
//! reordered.

use crate::error::{PolicyError, Result};
use crate::types::Constraint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of policy document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    /// A standalone set of rules, bound to no particular parties.
    Set,
    /// Rules offered by an assigner.
    Offer,
    /// Rules agreed between assigner and assignee.
    Contract,
}

impl Default for PolicyType {
    fn default() -> Self {
        PolicyType::Set
    }
}

/// The action a rule governs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub action_type: String,
}

impl Action {
    /// Creates an action with the given type identifier.
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
        }
    }
}

/// A rule granting an action, optionally bound to duties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub action: Action,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub duties: Vec<Duty>,
}

impl Permission {
    /// Creates a permission for the given action.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            constraints: Vec::new(),
            duties: Vec::new(),
        }
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds all given constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Adds a duty owed when the permission is exercised.
    pub fn with_duty(mut self, duty: Duty) -> Self {
        self.duties.push(duty);
        self
    }
}

/// A rule forbidding an action, optionally bound to remedies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prohibition {
    pub action: Action,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub remedies: Vec<Duty>,
}

impl Prohibition {
    /// Creates a prohibition for the given action.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            constraints: Vec::new(),
            remedies: Vec::new(),
        }
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds all given constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Adds a remedy owed when the prohibition is infringed.
    pub fn with_remedy(mut self, remedy: Duty) -> Self {
        self.remedies.push(remedy);
        self
    }
}

/// A rule obliging an action, optionally chained to consequences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Duty {
    pub action: Action,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    #[serde(default)]
    pub consequences: Vec<Duty>,
}

impl Duty {
    /// Creates a duty for the given action.
    pub fn new(action: Action) -> Self {
        Self {
            action,
            constraints: Vec::new(),
            consequences: Vec::new(),
        }
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Adds all given constraints.
    pub fn with_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Adds a consequence owed when the duty is not fulfilled.
    pub fn with_consequence(mut self, consequence: Duty) -> Self {
        self.consequences.push(consequence);
        self
    }
}

/// A complete policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    /// Kind of document.
    #[serde(default)]
    pub policy_type: PolicyType,

    /// Party granting the rules.
    #[serde(default)]
    pub assigner: Option<String>,

    /// Party receiving the rules.
    #[serde(default)]
    pub assignee: Option<String>,

    /// Asset the rules apply to.
    #[serde(default)]
    pub target: Option<String>,

    /// Rules granting actions.
    #[serde(default)]
    pub permissions: Vec<Permission>,

    /// Rules forbidding actions.
    #[serde(default)]
    pub prohibitions: Vec<Prohibition>,

    /// Rules obliging actions.
    #[serde(default)]
    pub obligations: Vec<Duty>,

    /// Free-form properties carried alongside the rules.
    #[serde(default)]
    pub extensible_properties: HashMap<String, serde_json::Value>,
}

impl Policy {
    /// Creates an empty policy of the default kind.
    pub fn new() -> Self {
        Self {
            policy_type: PolicyType::default(),
            assigner: None,
            assignee: None,
            target: None,
            permissions: Vec::new(),
            prohibitions: Vec::new(),
            obligations: Vec::new(),
            extensible_properties: HashMap::new(),
        }
    }

    /// Sets the document kind.
    pub fn with_policy_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = policy_type;
        self
    }

    /// Sets the assigner party.
    pub fn with_assigner(mut self, assigner: impl Into<String>) -> Self {
        self.assigner = Some(assigner.into());
        self
    }

    /// Sets the assignee party.
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the target asset.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    /// Adds a permission.
    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }

    /// Adds a prohibition.
    pub fn with_prohibition(mut self, prohibition: Prohibition) -> Self {
        self.prohibitions.push(prohibition);
        self
    }

    /// Adds an obligation.
    pub fn with_obligation(mut self, obligation: Duty) -> Self {
        self.obligations.push(obligation);
        self
    }

    /// Sets a free-form property.
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extensible_properties.insert(key.into(), value);
        self
    }

    /// Parses a policy from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Policy = serde_json::from_str(json)?;
        Ok(policy)
    }

    /// Serializes the policy to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PolicyError::SerializationError(e.to_string()))
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::new()
    }
}
