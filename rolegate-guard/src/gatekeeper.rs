//! Guard evaluation wired to an identity provider

use crate::error::{GuardError, GuardResult};
use crate::guard::{AccessGuard, GuardDecision};
use crate::identity::{IdentityProvider, StaticIdentity};
use rolegate_core::{AccessConfig, PermissionEngine, RoleGraph, SubjectContext};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Evaluates guards for whoever the identity provider says is signed in
///
/// The role graph is compiled once when the gatekeeper is built and shared
/// by every engine it hands out.
pub struct Gatekeeper {
    graph: Arc<RoleGraph>,
    identity: Box<dyn IdentityProvider + Send + Sync>,
    audit_enabled: bool,
}

impl Gatekeeper {
    /// Create a new gatekeeper builder
    pub fn builder() -> GatekeeperBuilder {
        GatekeeperBuilder::new()
    }

    /// The shared role graph
    pub fn graph(&self) -> &Arc<RoleGraph> {
        &self.graph
    }

    /// Bind the shared graph to an explicit subject
    pub fn engine_for(&self, subject: SubjectContext) -> PermissionEngine {
        self.graph.engine_for(subject)
    }

    /// Engine for the current subject, or `None` when nobody is signed in
    pub async fn current_engine(&self) -> GuardResult<Option<PermissionEngine>> {
        let subject = self.identity.current_subject().await?;
        Ok(subject.map(|subject| self.engine_for(subject)))
    }

    /// Evaluate `guard` against the current subject
    pub async fn authorize(&self, guard: &AccessGuard) -> GuardResult<GuardDecision> {
        debug!(guard = %guard, "Evaluating access guard");

        let engine = self.current_engine().await?;
        let decision = guard.evaluate(engine.as_ref());

        if self.audit_enabled {
            let subject = engine
                .as_ref()
                .map(|engine| engine.subject().to_string())
                .unwrap_or_else(|| "anonymous".to_string());

            match decision {
                GuardDecision::Granted => info!(
                    subject = %subject,
                    guard = %guard,
                    result = "granted",
                    "Access check"
                ),
                GuardDecision::Denied | GuardDecision::Unauthenticated => warn!(
                    subject = %subject,
                    guard = %guard,
                    result = ?decision,
                    "Access check"
                ),
            }
        }

        Ok(decision)
    }

    /// Produce `allowed` if `guard` passes for the current subject, `fallback` otherwise
    ///
    /// Failing to resolve the subject counts as failing the guard.
    pub async fn protect<T>(
        &self,
        guard: &AccessGuard,
        allowed: impl FnOnce() -> T,
        fallback: impl FnOnce() -> T,
    ) -> T {
        match self.authorize(guard).await {
            Ok(decision) if decision.is_granted() => allowed(),
            Ok(_) => fallback(),
            Err(e) => {
                warn!(guard = %guard, error = %e, "Identity lookup failed, using fallback");
                fallback()
            }
        }
    }
}

/// Builder for [`Gatekeeper`]
pub struct GatekeeperBuilder {
    config: Option<AccessConfig>,
    graph: Option<Arc<RoleGraph>>,
    identity: Option<Box<dyn IdentityProvider + Send + Sync>>,
    audit_enabled: bool,
}

impl GatekeeperBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            graph: None,
            identity: None,
            audit_enabled: false,
        }
    }

    /// Use the restaurant directory's shipped roles and grants
    pub fn with_default_roles(self) -> Self {
        self.with_config(AccessConfig::restaurant_directory())
    }

    /// Compile `config` when the gatekeeper is built
    pub fn with_config(mut self, config: AccessConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Load the access configuration from a JSON file
    pub fn with_config_file(self, path: &str) -> GuardResult<Self> {
        let config = AccessConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Reuse an already compiled graph
    pub fn with_graph(mut self, graph: Arc<RoleGraph>) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Set the identity provider
    pub fn with_identity<T>(mut self, identity: T) -> Self
    where
        T: IdentityProvider + Send + Sync + 'static,
    {
        self.identity = Some(Box::new(identity));
        self
    }

    /// Enable audit logging
    pub fn with_audit_logging(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// Build the gatekeeper
    pub fn build(self) -> GuardResult<Gatekeeper> {
        let graph = match (self.graph, self.config) {
            (Some(_), Some(_)) => {
                return Err(GuardError::Configuration(
                    "both a compiled graph and an access configuration were supplied".to_string(),
                ));
            }
            (Some(graph), None) => graph,
            (None, Some(config)) => {
                for issue in config.diagnostics() {
                    warn!("Access configuration: {}", issue);
                }
                RoleGraph::shared(&config)
            }
            (None, None) => {
                return Err(GuardError::Configuration(
                    "no access configuration supplied".to_string(),
                ));
            }
        };

        let identity = self
            .identity
            .unwrap_or_else(|| Box::new(StaticIdentity::anonymous()));

        Ok(Gatekeeper {
            graph,
            identity,
            audit_enabled: self.audit_enabled,
        })
    }
}

impl Default for GatekeeperBuilder {
    fn default() -> Self {
        Self::new()
    }
}
