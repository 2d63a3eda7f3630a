//! Access guards for the restaurant directory
//!
//! This crate connects the rolegate permission engine to the two things
//! around it: the identity/session subsystem that says who is signed in, and
//! the declarative guards that decide whether protected content is shown.
//!
//! # Features
//!
//! - **Guard shapes**: require a role, a permission set (all or any), a role
//!   and permissions together, or one of a literal list of roles
//! - **Anonymous short-circuit**: no subject means the fallback, without
//!   consulting the engine
//! - **Shared role graph**: closures are computed once per configuration
//! - **Audit logging**: optional structured log line per decision
//!
//! # Quick Start
//!
//! ```rust
//! use rolegate_guard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let gatekeeper = Gatekeeper::builder()
//!         .with_default_roles()
//!         .with_identity(StaticIdentity::new(SubjectContext::with_role("shop_owner")))
//!         .with_audit_logging(true)
//!         .build()?;
//!
//!     let guard = AccessGuard::all_permissions(["menu:update"]);
//!     let shown = gatekeeper.protect(&guard, || "edit menu", || "read only").await;
//!     assert_eq!(shown, "edit menu");
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gatekeeper;
pub mod guard;
pub mod identity;

pub mod prelude {
    //! Common imports for rolegate guards

    pub use crate::error::*;
    pub use crate::gatekeeper::{Gatekeeper, GatekeeperBuilder};
    pub use crate::guard::*;
    pub use crate::identity::*;

    // Re-export key engine types
    pub use rolegate_core::{
        AccessConfig, Permission, PermissionEngine, Role, RoleGraph, SubjectContext,
    };

    // Common Result type
    pub type Result<T> = std::result::Result<T, GuardError>;
}

pub use error::GuardError;
pub use gatekeeper::Gatekeeper;
pub use guard::{AccessGuard, GuardDecision};
pub use prelude::Result;
