//! The permission resolution engine.
//!
//! A [`PermissionEngine`] pairs a compiled [`RoleGraph`] with one
//! [`SubjectContext`] and answers role and permission questions about that
//! subject. Every query is a pure read; none of them can fail.

use crate::closure::RoleGraph;
use crate::config::AccessConfig;
use crate::subject::SubjectContext;
use crate::types::{Permission, Role};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Answers authorization queries for a single subject.
#[derive(Debug, Clone)]
pub struct PermissionEngine {
    graph: Arc<RoleGraph>,
    subject: SubjectContext,
}

impl PermissionEngine {
    /// Compile `config` from scratch and bind it to `subject`.
    ///
    /// Every call resolves every declared role again. Prefer
    /// [`RoleGraph::engine_for`] when many subjects share one configuration.
    pub fn new(config: &AccessConfig, subject: SubjectContext) -> Self {
        Self::with_graph(RoleGraph::shared(config), subject)
    }

    /// Bind an already compiled graph to `subject`.
    pub fn with_graph(graph: Arc<RoleGraph>, subject: SubjectContext) -> Self {
        Self { graph, subject }
    }

    /// The subject this engine answers for.
    pub fn subject(&self) -> &SubjectContext {
        &self.subject
    }

    /// Roles held by the subject.
    pub fn roles(&self) -> &[Role] {
        self.subject.roles()
    }

    /// Permissions granted to the subject outside the role system.
    pub fn direct_permissions(&self) -> &[Permission] {
        self.subject.direct_permissions()
    }

    /// The compiled graph backing this engine.
    pub fn graph(&self) -> &Arc<RoleGraph> {
        &self.graph
    }

    /// True if the subject holds `required` or a role that inherits it.
    pub fn has_role(&self, required: &str) -> bool {
        self.subject
            .roles()
            .iter()
            .any(|held| self.graph.subsumes(held.as_str(), required))
    }

    /// True if `required` is granted directly or through any held role.
    pub fn has_permission(&self, required: &str) -> bool {
        self.subject.direct_permissions().iter().any(|p| p == required)
            || self
                .subject
                .roles()
                .iter()
                .any(|held| self.graph.grants(held.as_str(), required))
    }

    /// True if every permission in `required` passes [`has_permission`](Self::has_permission).
    ///
    /// An empty list is trivially satisfied.
    pub fn has_permissions<P: AsRef<str>>(&self, required: &[P]) -> bool {
        required.iter().all(|p| self.has_permission(p.as_ref()))
    }

    /// True if at least one permission in `required` passes [`has_permission`](Self::has_permission).
    ///
    /// An empty list is never satisfied.
    pub fn has_any_permission<P: AsRef<str>>(&self, required: &[P]) -> bool {
        required.iter().any(|p| self.has_permission(p.as_ref()))
    }

    /// The subject's "highest" role, or `None` if it holds no roles.
    ///
    /// Folds left over the held roles: the accumulator starts at the first
    /// role and is replaced by each later role it does not already inherit.
    /// Two roles that do not subsume each other are not ordered, so the one
    /// listed later wins.
    pub fn max_role(&self) -> Option<&Role> {
        let (first, rest) = self.subject.roles().split_first()?;

        Some(rest.iter().fold(first, |max, candidate| {
            let subsumed = self
                .graph
                .role_closure(max.as_str())
                .is_some_and(|closure| closure.contains(candidate));
            if subsumed { max } else { candidate }
        }))
    }

    /// Every permission the subject effectively holds, sorted.
    pub fn effective_permissions(&self) -> BTreeSet<Permission> {
        let mut permissions: BTreeSet<Permission> =
            self.subject.direct_permissions().iter().cloned().collect();

        for held in self.subject.roles() {
            if let Some(granted) = self.graph.permission_closure(held.as_str()) {
                permissions.extend(granted.iter().cloned());
            }
        }

        permissions
    }
}
