//! Declarative access guards
//!
//! A guard decides whether protected content should be shown for the current
//! subject. Every shape short-circuits when there is no subject, so the
//! engine is never consulted for anonymous visitors.

use rolegate_core::{Permission, PermissionEngine, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a list of required permissions is combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMatch {
    /// Every permission must be held
    #[default]
    All,
    /// At least one permission must be held
    Any,
}

/// How a literal role list is compared against the subject's roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleMatching {
    /// A held role must appear in the list verbatim; inheritance is ignored
    #[default]
    Exact,
    /// A held role that inherits any listed role also matches
    Inherited,
}

/// Outcome of evaluating a guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The subject satisfies the guard
    Granted,
    /// The subject is known but does not satisfy the guard
    Denied,
    /// There is no authenticated subject
    Unauthenticated,
}

impl GuardDecision {
    /// Whether protected content may be shown
    pub fn is_granted(self) -> bool {
        self == GuardDecision::Granted
    }
}

impl From<bool> for GuardDecision {
    fn from(granted: bool) -> Self {
        if granted {
            GuardDecision::Granted
        } else {
            GuardDecision::Denied
        }
    }
}

/// The guard shapes used across the directory UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AccessGuard {
    /// Require one role, honoring inheritance
    RequireRole { role: Role },
    /// Require a set of permissions
    RequirePermissions {
        permissions: Vec<Permission>,
        #[serde(default)]
        mode: PermissionMatch,
    },
    /// Require a role and a set of permissions
    RequireRoleAndPermissions {
        role: Role,
        permissions: Vec<Permission>,
        #[serde(default)]
        mode: PermissionMatch,
    },
    /// Require the subject to hold one of the listed roles
    RequireOneOfRoles {
        roles: Vec<Role>,
        #[serde(default)]
        matching: RoleMatching,
    },
}

impl AccessGuard {
    /// Require `role` or any role inheriting it
    pub fn role(role: impl Into<Role>) -> Self {
        Self::RequireRole { role: role.into() }
    }

    /// Require every permission in `permissions`
    pub fn all_permissions<P: Into<Permission>>(permissions: impl IntoIterator<Item = P>) -> Self {
        Self::RequirePermissions {
            permissions: permissions.into_iter().map(Into::into).collect(),
            mode: PermissionMatch::All,
        }
    }

    /// Require at least one permission in `permissions`
    pub fn any_permission<P: Into<Permission>>(permissions: impl IntoIterator<Item = P>) -> Self {
        Self::RequirePermissions {
            permissions: permissions.into_iter().map(Into::into).collect(),
            mode: PermissionMatch::Any,
        }
    }

    /// Require `role` together with every permission in `permissions`
    pub fn role_and_permissions<P: Into<Permission>>(
        role: impl Into<Role>,
        permissions: impl IntoIterator<Item = P>,
    ) -> Self {
        Self::RequireRoleAndPermissions {
            role: role.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            mode: PermissionMatch::All,
        }
    }

    /// Require one of `roles`, compared verbatim
    pub fn one_of_roles<R: Into<Role>>(roles: impl IntoIterator<Item = R>) -> Self {
        Self::RequireOneOfRoles {
            roles: roles.into_iter().map(Into::into).collect(),
            matching: RoleMatching::Exact,
        }
    }

    /// Switch a role-list guard to the given matching policy
    ///
    /// Other guard shapes are returned unchanged.
    pub fn with_role_matching(self, policy: RoleMatching) -> Self {
        match self {
            Self::RequireOneOfRoles { roles, .. } => Self::RequireOneOfRoles {
                roles,
                matching: policy,
            },
            other => other,
        }
    }

    /// Switch a permission guard to the given combination mode
    ///
    /// Role-only guards are returned unchanged.
    pub fn with_permission_match(self, new_mode: PermissionMatch) -> Self {
        match self {
            Self::RequirePermissions { permissions, .. } => Self::RequirePermissions {
                permissions,
                mode: new_mode,
            },
            Self::RequireRoleAndPermissions {
                role, permissions, ..
            } => Self::RequireRoleAndPermissions {
                role,
                permissions,
                mode: new_mode,
            },
            other => other,
        }
    }

    /// Evaluate the guard
    ///
    /// `None` stands for "no authenticated subject" and yields
    /// [`GuardDecision::Unauthenticated`] without touching any engine.
    pub fn evaluate(&self, engine: Option<&PermissionEngine>) -> GuardDecision {
        let Some(engine) = engine else {
            return GuardDecision::Unauthenticated;
        };

        let granted = match self {
            Self::RequireRole { role } => engine.has_role(role.as_str()),
            Self::RequirePermissions { permissions, mode } => {
                permissions_pass(engine, permissions, *mode)
            }
            Self::RequireRoleAndPermissions {
                role,
                permissions,
                mode,
            } => engine.has_role(role.as_str()) && permissions_pass(engine, permissions, *mode),
            Self::RequireOneOfRoles { roles, matching } => match matching {
                RoleMatching::Exact => engine.roles().iter().any(|held| roles.contains(held)),
                RoleMatching::Inherited => roles.iter().any(|role| engine.has_role(role.as_str())),
            },
        };

        GuardDecision::from(granted)
    }

    /// Produce `allowed` if the guard passes, `fallback` otherwise
    ///
    /// Only one of the two closures runs.
    pub fn protect<T>(
        &self,
        engine: Option<&PermissionEngine>,
        allowed: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        if self.evaluate(engine).is_granted() {
            allowed()
        } else {
            fallback()
        }
    }
}

fn permissions_pass(
    engine: &PermissionEngine,
    permissions: &[Permission],
    mode: PermissionMatch,
) -> bool {
    match mode {
        PermissionMatch::All => engine.has_permissions(permissions),
        PermissionMatch::Any => engine.has_any_permission(permissions),
    }
}

fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

impl fmt::Display for AccessGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = |mode: &PermissionMatch| match mode {
            PermissionMatch::All => " & ",
            PermissionMatch::Any => " | ",
        };

        match self {
            Self::RequireRole { role } => write!(f, "role({})", role),
            Self::RequirePermissions { permissions, mode } => {
                write!(f, "permissions({})", join(permissions, separator(mode)))
            }
            Self::RequireRoleAndPermissions {
                role,
                permissions,
                mode,
            } => write!(
                f,
                "role({}) & permissions({})",
                role,
                join(permissions, separator(mode))
            ),
            Self::RequireOneOfRoles { roles, matching } => {
                let kind = match matching {
                    RoleMatching::Exact => "exact",
                    RoleMatching::Inherited => "inherited",
                };
                write!(f, "one_of_roles[{}]({})", kind, join(roles, ", "))
            }
        }
    }
}
