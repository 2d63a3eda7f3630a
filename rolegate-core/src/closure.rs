//! Hierarchy and permission closure resolution.
//!
//! [`closure_of`] walks the inheritance graph with an explicit stack, so
//! neither deep hierarchies nor cycles can blow the call stack. A role that
//! was already expanded in the current walk is skipped, which is the whole
//! of the cycle handling: a cycle's members are each recorded once, and a
//! cycle that routes back to the starting role records the starting role.
//!
//! [`RoleGraph`] runs both resolvers for every declared role once and keeps
//! the results. It is immutable after [`RoleGraph::compile`] and is meant to
//! be shared behind an [`Arc`] by every engine built from the same
//! configuration.

use crate::config::{AccessConfig, PermissionGrantMap, RoleHierarchy};
use crate::engine::PermissionEngine;
use crate::subject::SubjectContext;
use crate::types::{Permission, Role};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

/// Per-role transitive closure of inherited roles.
pub type RoleClosureCache = HashMap<Role, HashSet<Role>>;

/// Per-role effective permission set (direct and inherited).
pub type PermissionClosureCache = HashMap<Role, HashSet<Permission>>;

/// Every role reachable from `role` through the hierarchy.
///
/// The starting role is only part of the result when a cycle leads back to
/// it. A role with no hierarchy entry has no parents and yields an empty set.
pub fn closure_of(hierarchy: &RoleHierarchy, role: &str) -> HashSet<Role> {
    let mut reached: HashSet<Role> = HashSet::new();
    let mut stack: Vec<&Role> = match hierarchy.get(role) {
        Some(parents) => parents.iter().rev().collect(),
        None => return reached,
    };

    while let Some(current) = stack.pop() {
        if reached.contains(current) {
            // Already expanded during this walk.
            continue;
        }
        reached.insert(current.clone());

        if let Some(parents) = hierarchy.get(current) {
            stack.extend(parents.iter().rev());
        }
    }

    reached
}

/// The permissions available to holders of `role`.
///
/// Reads the role's inherited roles from `role_closures`, which must already
/// be populated for the whole hierarchy. Roles without a grant entry
/// contribute nothing.
pub fn permissions_of(
    grants: &PermissionGrantMap,
    role_closures: &RoleClosureCache,
    role: &str,
) -> HashSet<Permission> {
    let mut permissions: HashSet<Permission> = grants
        .get(role)
        .map(|own| own.iter().cloned().collect())
        .unwrap_or_default();

    if let Some(inherited) = role_closures.get(role) {
        for ancestor in inherited {
            if let Some(granted) = grants.get(ancestor) {
                permissions.extend(granted.iter().cloned());
            }
        }
    }

    permissions
}

/// Precomputed role and permission closures for one configuration.
#[derive(Debug, Clone, Default)]
pub struct RoleGraph {
    role_closures: RoleClosureCache,
    permission_closures: PermissionClosureCache,
}

impl RoleGraph {
    /// Resolve every declared role.
    ///
    /// Role closures are computed for each key of the hierarchy first; the
    /// permission closures for each key of the grant map are derived from
    /// them afterwards.
    ///
    /// Configuration issues are not reported here; see
    /// [`AccessConfig::diagnostics`].
    pub fn compile(config: &AccessConfig) -> Self {
        let role_closures: RoleClosureCache = config
            .role_hierarchy
            .keys()
            .map(|role| (role.clone(), closure_of(&config.role_hierarchy, role.as_str())))
            .collect();

        let permission_closures: PermissionClosureCache = config
            .permission_grants
            .keys()
            .map(|role| {
                let permissions =
                    permissions_of(&config.permission_grants, &role_closures, role.as_str());
                (role.clone(), permissions)
            })
            .collect();

        debug!(
            roles = role_closures.len(),
            granted_roles = permission_closures.len(),
            "Compiled role graph"
        );

        Self {
            role_closures,
            permission_closures,
        }
    }

    /// Compile and wrap in an [`Arc`] ready for sharing.
    pub fn shared(config: &AccessConfig) -> Arc<Self> {
        Arc::new(Self::compile(config))
    }

    /// Cached closure for `role`, or `None` if it has no hierarchy entry.
    pub fn role_closure(&self, role: &str) -> Option<&HashSet<Role>> {
        self.role_closures.get(role)
    }

    /// Cached effective permissions for `role`, or `None` if it has no grant entry.
    pub fn permission_closure(&self, role: &str) -> Option<&HashSet<Permission>> {
        self.permission_closures.get(role)
    }

    /// Whether holding `held` satisfies a requirement for `required`.
    pub fn subsumes(&self, held: &str, required: &str) -> bool {
        held == required
            || self
                .role_closure(held)
                .is_some_and(|closure| closure.contains(required))
    }

    /// Whether holding `role` grants `permission` through the role system.
    pub fn grants(&self, role: &str, permission: &str) -> bool {
        self.permission_closure(role)
            .is_some_and(|permissions| permissions.contains(permission))
    }

    /// The full role closure cache.
    pub fn role_closures(&self) -> &RoleClosureCache {
        &self.role_closures
    }

    /// The full permission closure cache.
    pub fn permission_closures(&self) -> &PermissionClosureCache {
        &self.permission_closures
    }

    /// Build an engine for `subject` that shares this graph.
    pub fn engine_for(self: &Arc<Self>, subject: SubjectContext) -> PermissionEngine {
        PermissionEngine::with_graph(Arc::clone(self), subject)
    }
}
