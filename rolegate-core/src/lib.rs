//! # rolegate-core
//!
//! Role hierarchy closure and permission resolution.
//!
//! Two static declarations drive everything here: which roles each role
//! inherits from, and which permissions each role is granted directly.
//! [`RoleGraph::compile`] resolves both into per-role caches once, and a
//! [`PermissionEngine`] binds those caches to one subject's roles and direct
//! permissions to answer queries.
//!
//! ```rust
//! use rolegate_core::prelude::*;
//!
//! let graph = RoleGraph::shared(&AccessConfig::restaurant_directory());
//! let engine = graph.engine_for(SubjectContext::with_role("admin"));
//!
//! assert!(engine.has_role("customer"));
//! assert!(engine.has_permission("restaurant:create"));
//! assert!(!engine.has_permission("admin:delete"));
//! assert_eq!(engine.max_role().map(Role::as_str), Some("admin"));
//! ```
//!
//! ## API Stability
//!
//! **Current Status: EXPERIMENTAL (v0.x.x)**

#![warn(missing_docs)]

pub mod closure;
pub mod config;
pub mod engine;
pub mod error;
pub mod subject;
pub mod types;

pub use closure::RoleGraph;
pub use config::AccessConfig;
pub use engine::PermissionEngine;
pub use error::{ConfigError, Result};
pub use subject::SubjectContext;
pub use types::{Permission, Role};

/// Common imports
pub mod prelude {
    pub use crate::closure::{RoleGraph, closure_of, permissions_of};
    pub use crate::config::{AccessConfig, ConfigIssue, PermissionGrantMap, RoleHierarchy};
    pub use crate::engine::PermissionEngine;
    pub use crate::error::{ConfigError, Result};
    pub use crate::subject::SubjectContext;
    pub use crate::types::{DirectoryPermissions, DirectoryRoles, Permission, Role};
}
