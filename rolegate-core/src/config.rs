//! Role-hierarchy and permission-grant declarations.
//!
//! An [`AccessConfig`] is loaded once at startup and never mutated
//! afterwards. It is passed explicitly to [`RoleGraph::compile`](crate::closure::RoleGraph::compile)
//! so independently configured engines can coexist in one process.

use crate::closure::closure_of;
use crate::error::{ConfigError, Result};
use crate::types::{DirectoryPermissions as P, DirectoryRoles as R, Permission, Role};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Role → roles it directly inherits from, in declaration order.
pub type RoleHierarchy = BTreeMap<Role, Vec<Role>>;

/// Role → permissions assigned directly to it, excluding inherited ones.
pub type PermissionGrantMap = BTreeMap<Role, BTreeSet<Permission>>;

/// The two static declarations the engine is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessConfig {
    /// Role-Hierarchy Declaration
    #[serde(default, alias = "role_hierarchy")]
    pub role_hierarchy: RoleHierarchy,
    /// Permission-Grant Declaration
    #[serde(default, alias = "permission_grants")]
    pub permission_grants: PermissionGrantMap,
}

impl AccessConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a role with its direct parents and direct permissions.
    ///
    /// The role is entered into both declarations, even when `parents` or
    /// `permissions` is empty. Declaring the same role twice extends the
    /// earlier entry.
    pub fn with_role(mut self, role: &str, parents: &[&str], permissions: &[&str]) -> Self {
        let role = Role::from(role);
        self.role_hierarchy
            .entry(role.clone())
            .or_default()
            .extend(parents.iter().copied().map(Role::from));
        self.permission_grants
            .entry(role)
            .or_default()
            .extend(permissions.iter().copied().map(Permission::from));
        self
    }

    /// Declare only inheritance edges for a role, leaving the grant map untouched.
    pub fn with_inheritance(mut self, role: &str, parents: &[&str]) -> Self {
        self.role_hierarchy
            .entry(Role::from(role))
            .or_default()
            .extend(parents.iter().copied().map(Role::from));
        self
    }

    /// Declare only direct grants for a role, leaving the hierarchy untouched.
    pub fn with_grants(mut self, role: &str, permissions: &[&str]) -> Self {
        self.permission_grants
            .entry(Role::from(role))
            .or_default()
            .extend(permissions.iter().copied().map(Permission::from));
        self
    }

    /// Parse a configuration from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(ConfigError::Parse)
    }

    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_json_str(&content)?;

        tracing::info!(
            path,
            roles = config.role_hierarchy.len(),
            granted_roles = config.permission_grants.len(),
            "Loaded access configuration"
        );
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialization)?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))
    }

    /// The configuration shipped with the restaurant directory.
    pub fn restaurant_directory() -> Self {
        Self::new()
            .with_role(R::SUPER_ADMIN, &[R::ADMIN], &[P::ADMIN_DELETE])
            .with_role(R::ADMIN, &[R::SHOP_OWNER], &[P::USER_DELETE])
            .with_role(
                R::SHOP_OWNER,
                &[R::CUSTOMER],
                &[
                    P::RESTAURANT_CREATE,
                    P::RESTAURANT_UPDATE,
                    P::RESTAURANT_DELETE,
                    P::RESTAURANT_READ,
                    P::MENU_CREATE,
                    P::MENU_UPDATE,
                    P::MENU_DELETE,
                ],
            )
            .with_role(R::CUSTOMER, &[], &[P::RESTAURANT_READ, P::MENU_READ])
    }

    /// Every role named anywhere in either declaration.
    pub fn declared_roles(&self) -> BTreeSet<&Role> {
        self.role_hierarchy
            .iter()
            .flat_map(|(role, parents)| std::iter::once(role).chain(parents.iter()))
            .chain(self.permission_grants.keys())
            .collect()
    }

    /// Advisory findings about the declarations.
    ///
    /// Nothing reported here prevents loading or changes resolution: a
    /// dangling reference still resolves to an empty closure, exactly as if
    /// the role had been declared with no further privilege.
    pub fn diagnostics(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        for (role, parents) in &self.role_hierarchy {
            for parent in parents {
                if parent == role {
                    issues.push(ConfigIssue::SelfInheritance { role: role.clone() });
                } else if !self.role_hierarchy.contains_key(parent) {
                    issues.push(ConfigIssue::UndeclaredParent {
                        role: role.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            if !self.permission_grants.contains_key(role) {
                issues.push(ConfigIssue::NoGrantEntry { role: role.clone() });
            }
            if closure_of(&self.role_hierarchy, role.as_str()).contains(role) {
                issues.push(ConfigIssue::InCycle { role: role.clone() });
            }
        }

        for role in self.permission_grants.keys() {
            if !self.role_hierarchy.contains_key(role) {
                issues.push(ConfigIssue::NoHierarchyEntry { role: role.clone() });
            }
        }

        issues
    }
}

/// An advisory finding produced by [`AccessConfig::diagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    /// A role inherits from a role that has no hierarchy entry of its own.
    UndeclaredParent {
        /// Inheriting role.
        role: Role,
        /// Referenced parent.
        parent: Role,
    },
    /// A role lists itself as a parent.
    SelfInheritance {
        /// Offending role.
        role: Role,
    },
    /// A role can reach itself through the hierarchy.
    InCycle {
        /// Role on the cycle.
        role: Role,
    },
    /// A hierarchy role has no permission-grant entry.
    NoGrantEntry {
        /// Role without grants.
        role: Role,
    },
    /// A granted role has no hierarchy entry.
    NoHierarchyEntry {
        /// Role without hierarchy entry.
        role: Role,
    },
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndeclaredParent { role, parent } => {
                write!(f, "role '{}' inherits from undeclared role '{}'", role, parent)
            }
            Self::SelfInheritance { role } => write!(f, "role '{}' inherits from itself", role),
            Self::InCycle { role } => write!(f, "role '{}' is part of an inheritance cycle", role),
            Self::NoGrantEntry { role } => {
                write!(f, "role '{}' has no permission-grant entry", role)
            }
            Self::NoHierarchyEntry { role } => {
                write!(f, "role '{}' has no role-hierarchy entry", role)
            }
        }
    }
}
