//! # rolegate
//!
//! Role and permission resolution for the restaurant directory.
//!
//! This crate re-exports the constituent crates:
//! - `rolegate-core`: declarations, closure resolution and the permission engine
//! - `rolegate-guard`: identity wiring and declarative access guards

pub use rolegate_core as core;
pub use rolegate_guard as guard;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::guard::prelude::{
        AccessGuard, Gatekeeper, GatekeeperBuilder, GuardDecision, GuardError, GuardResult,
        IdentityProvider, PermissionMatch, RoleMatching, SessionClaims, SessionIdentity,
        StaticIdentity,
    };
}
