//! Subject resolution from the identity/session subsystem

use crate::error::GuardResult;
use async_trait::async_trait;
use rolegate_core::{Permission, SubjectContext};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trait for supplying the current authenticated subject
///
/// `Ok(None)` means nobody is signed in. Guards treat that as failing every
/// check without consulting an engine.
#[async_trait]
pub trait IdentityProvider {
    /// Resolve the subject for the current request or session
    async fn current_subject(&self) -> GuardResult<Option<SubjectContext>>;
}

/// Identity provider that always returns the same subject
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    subject: Option<SubjectContext>,
}

impl StaticIdentity {
    /// Always resolve to `subject`
    pub fn new(subject: SubjectContext) -> Self {
        Self {
            subject: Some(subject),
        }
    }

    /// Never resolve a subject
    pub fn anonymous() -> Self {
        Self { subject: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_subject(&self) -> GuardResult<Option<SubjectContext>> {
        Ok(self.subject.clone())
    }
}

/// Role and permission claims carried by a session
///
/// Sessions issued by the directory carry a single `role`; newer ones may
/// carry a `roles` list. Both are honored, `role` first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, alias = "directPermissions")]
    pub permissions: Vec<String>,
}

impl SessionClaims {
    /// Convert claims into a subject context
    ///
    /// Empty strings are dropped; claimed order and repeats are kept, since
    /// [`max_role`](rolegate_core::PermissionEngine::max_role) folds over the
    /// list as given. Older session wiring always sent `[""]` as the direct
    /// permission list, which must not turn into a grant.
    pub fn into_subject(self) -> SubjectContext {
        let roles = self
            .role
            .into_iter()
            .chain(self.roles)
            .filter(|role| !role.is_empty());

        let permissions = self
            .permissions
            .into_iter()
            .map(Permission::from)
            .filter(|p| !p.is_empty());

        SubjectContext::new(roles, permissions)
    }
}

const CLAIM_FIELDS: [&str; 4] = ["role", "roles", "permissions", "directPermissions"];

/// Identity provider backed by a session payload
///
/// The payload is either the claims object itself or an object with the
/// claims under `user`. A `null` payload or `null` user means no subject.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    claims: Option<SessionClaims>,
}

impl SessionIdentity {
    /// Parse a session payload
    ///
    /// A payload with no `user` key and no claim fields of its own carries no
    /// subject.
    pub fn from_session(session: &Value) -> GuardResult<Self> {
        let user = match session.get("user") {
            Some(user) => user,
            None if CLAIM_FIELDS.iter().any(|field| session.get(field).is_some()) => session,
            None => return Ok(Self { claims: None }),
        };

        let claims = if user.is_null() {
            None
        } else {
            Some(serde_json::from_value(user.clone())?)
        };

        Ok(Self { claims })
    }

    /// The parsed claims, if a subject is signed in
    pub fn claims(&self) -> Option<&SessionClaims> {
        self.claims.as_ref()
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn current_subject(&self) -> GuardResult<Option<SubjectContext>> {
        Ok(self.claims.clone().map(SessionClaims::into_subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuardError;
    use rolegate_core::{AccessConfig, PermissionEngine, Role};
    use serde_json::json;

    #[test]
    fn test_stub_direct_permission_is_dropped() {
        let claims = SessionClaims {
            role: Some("customer".to_string()),
            roles: Vec::new(),
            permissions: vec![String::new()],
        };

        let subject = claims.into_subject();
        assert_eq!(subject.roles(), &[Role::from("customer")]);
        assert!(subject.direct_permissions().is_empty());
    }

    #[test]
    fn test_role_and_roles_are_merged() {
        let claims = SessionClaims {
            role: Some("admin".to_string()),
            roles: vec!["admin".to_string(), "".to_string(), "customer".to_string()],
            permissions: vec!["menu:read".to_string()],
        };

        let subject = claims.into_subject();
        assert_eq!(
            subject.roles(),
            &[Role::from("admin"), Role::from("admin"), Role::from("customer")]
        );
        assert_eq!(subject.direct_permissions(), &[Permission::from("menu:read")]);
    }

    #[test]
    fn test_claimed_role_order_and_repeats_reach_max_role() {
        let config = AccessConfig::new()
            .with_role("a", &[], &["a:perm"])
            .with_role("b", &[], &["b:perm"]);
        let claimed = ["a", "b", "a"];

        let claims = SessionClaims {
            role: None,
            roles: claimed.iter().map(|r| r.to_string()).collect(),
            permissions: Vec::new(),
        };
        let via_claims = PermissionEngine::new(&config, claims.into_subject());
        let direct = PermissionEngine::new(
            &config,
            SubjectContext::new(claimed, Vec::<Permission>::new()),
        );

        assert_eq!(via_claims.roles(), direct.roles());
        assert_eq!(via_claims.max_role(), direct.max_role());
        assert_eq!(via_claims.max_role().unwrap(), "a");
    }

    #[test]
    fn test_session_payload_shapes() {
        let nested = SessionIdentity::from_session(&json!({
            "user": { "role": "shop_owner", "permissions": [""] },
            "expires": "2026-10-18T00:00:00Z"
        }))
        .unwrap();
        let subject = tokio_test::block_on(nested.current_subject()).unwrap().unwrap();
        assert_eq!(subject, SubjectContext::with_role("shop_owner"));

        let flat = SessionIdentity::from_session(&json!({ "roles": ["customer"] })).unwrap();
        assert!(flat.claims().is_some());

        let signed_out = SessionIdentity::from_session(&json!({ "user": null })).unwrap();
        assert!(tokio_test::block_on(signed_out.current_subject()).unwrap().is_none());

        let no_session = SessionIdentity::from_session(&Value::Null).unwrap();
        assert!(no_session.claims().is_none());
    }

    #[test]
    fn test_payload_without_claims_is_no_subject() {
        for payload in [json!({}), json!({ "expires": "2026-10-18T00:00:00Z" })] {
            let identity = SessionIdentity::from_session(&payload).unwrap();
            assert!(identity.claims().is_none(), "{}", payload);
            assert!(tokio_test::block_on(identity.current_subject()).unwrap().is_none());
        }

        let legacy = SessionIdentity::from_session(&json!({ "directPermissions": ["menu:read"] }))
            .unwrap();
        assert!(legacy.claims().is_some());
    }

    #[test]
    fn test_malformed_claims_are_rejected() {
        let result = SessionIdentity::from_session(&json!({ "user": { "roles": "admin" } }));
        assert!(matches!(result, Err(GuardError::InvalidClaims(_))));
    }

    #[tokio::test]
    async fn test_static_identity() {
        let anonymous = StaticIdentity::anonymous();
        assert!(anonymous.current_subject().await.unwrap().is_none());

        let fixed = StaticIdentity::new(SubjectContext::with_role("admin"));
        let subject = fixed.current_subject().await.unwrap().unwrap();
        assert_eq!(subject.roles(), &[Role::from("admin")]);
    }
}
