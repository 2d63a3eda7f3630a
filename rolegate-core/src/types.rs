//! Role and permission identifiers.
//!
//! Both are opaque strings. The engine never parses them; it only hashes and
//! compares them for equality, so `"restaurant:create"` carries no more
//! structure than `"x"` does.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A named privilege tier a subject can hold (e.g. `"admin"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Create a role identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A named fine-grained capability (e.g. `"menu:update"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(String);

impl Permission {
    /// Create a permission identifier.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Borrow<str> lets `HashMap<Role, _>` and `HashSet<Permission>` be queried
// with plain `&str`. Derived Hash/Eq/Ord delegate to the inner String, which
// agree with str's.
macro_rules! impl_identifier {
    ($ty:ident) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $ty {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $ty {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl PartialEq<str> for $ty {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $ty {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

impl_identifier!(Role);
impl_identifier!(Permission);

/// Roles used by the restaurant directory.
pub struct DirectoryRoles;

impl DirectoryRoles {
    /// Platform operator; inherits `admin`.
    pub const SUPER_ADMIN: &'static str = "super_admin";
    /// Directory administrator; inherits `shop_owner`.
    pub const ADMIN: &'static str = "admin";
    /// Owner of one or more restaurant listings; inherits `customer`.
    pub const SHOP_OWNER: &'static str = "shop_owner";
    /// Signed-in diner.
    pub const CUSTOMER: &'static str = "customer";
}

/// Permissions used by the restaurant directory.
pub struct DirectoryPermissions;

impl DirectoryPermissions {
    /// Restaurant listing permissions
    pub const RESTAURANT_CREATE: &'static str = "restaurant:create";
    /// Read a restaurant listing.
    pub const RESTAURANT_READ: &'static str = "restaurant:read";
    /// Edit a restaurant listing.
    pub const RESTAURANT_UPDATE: &'static str = "restaurant:update";
    /// Remove a restaurant listing.
    pub const RESTAURANT_DELETE: &'static str = "restaurant:delete";

    /// Menu permissions
    pub const MENU_CREATE: &'static str = "menu:create";
    /// Read a menu.
    pub const MENU_READ: &'static str = "menu:read";
    /// Edit a menu.
    pub const MENU_UPDATE: &'static str = "menu:update";
    /// Remove a menu.
    pub const MENU_DELETE: &'static str = "menu:delete";

    /// Account administration
    pub const USER_DELETE: &'static str = "user:delete";
    /// Removing administrators
    pub const ADMIN_DELETE: &'static str = "admin:delete";
}
