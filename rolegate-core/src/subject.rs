//! Authorization inputs for one authenticated subject.

use crate::types::{Permission, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The roles a subject holds and the permissions granted to it directly.
///
/// Direct permissions are independent of role membership: a subject with no
/// roles at all can still pass a permission check through them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectContext {
    #[serde(default)]
    roles: Vec<Role>,
    #[serde(default)]
    direct_permissions: Vec<Permission>,
}

impl SubjectContext {
    /// Create a subject from held roles and direct permissions.
    pub fn new<R, P>(roles: R, direct_permissions: P) -> Self
    where
        R: IntoIterator,
        R::Item: Into<Role>,
        P: IntoIterator,
        P::Item: Into<Permission>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            direct_permissions: direct_permissions.into_iter().map(Into::into).collect(),
        }
    }

    /// A subject holding exactly one role and no direct permissions.
    pub fn with_role(role: impl Into<Role>) -> Self {
        Self {
            roles: vec![role.into()],
            direct_permissions: Vec::new(),
        }
    }

    /// A subject holding no roles, authorized only through direct permissions.
    pub fn with_direct_permissions<P>(direct_permissions: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<Permission>,
    {
        Self::new(Vec::<Role>::new(), direct_permissions)
    }

    /// Roles held, in the order they were supplied.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Permissions granted outside the role system.
    pub fn direct_permissions(&self) -> &[Permission] {
        &self.direct_permissions
    }

    /// Whether the subject holds at least one role.
    pub fn has_any_role(&self) -> bool {
        !self.roles.is_empty()
    }
}

impl fmt::Display for SubjectContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roles: Vec<&str> = self.roles.iter().map(Role::as_str).collect();
        write!(
            f,
            "roles=[{}] direct_permissions={}",
            roles.join(","),
            self.direct_permissions.len()
        )
    }
}
