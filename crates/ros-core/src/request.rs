//! Request-scoped context threaded explicitly through the pipeline.
//!
//! The caller's authenticated identity, opaque credential, and optional
//! deadline travel as one value instead of hiding in task-local state. Every
//! pipeline call takes a `&RequestContext` parameter so there is no ambient
//! lookup to fail at runtime.

use std::time::{Duration, Instant};

use uuid::Uuid;

use crate::constants::{DEFAULT_SCHEMA, UNKNOWN_TENANT};

/// Authenticated caller identity as resolved by the ingress surface.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    pub account_number: String,
    pub org_id: String,
    pub username: String,
}

/// Context for one upload request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub identity: Option<Identity>,
    /// Opaque caller credential forwarded to downstream consumers for
    /// re-authentication. Never inspected here.
    pub credential: String,
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new(identity: Option<Identity>, credential: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            identity,
            credential: credential.into(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Remaining time budget, if a deadline was supplied. `Duration::ZERO`
    /// once the deadline has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// Tenant schema segment for storage keys: `org_{org_id}` when the
    /// caller carries an org, the fixed default otherwise.
    pub fn schema_name(&self) -> String {
        match &self.identity {
            Some(identity) if !identity.org_id.is_empty() => {
                format!("org_{}", identity.org_id)
            }
            _ => DEFAULT_SCHEMA.to_string(),
        }
    }

    pub fn account_number(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.account_number.as_str())
            .filter(|a| !a.is_empty())
            .unwrap_or(UNKNOWN_TENANT)
    }

    pub fn org_id(&self) -> &str {
        self.identity
            .as_ref()
            .map(|i| i.org_id.as_str())
            .filter(|o| !o.is_empty())
            .unwrap_or(UNKNOWN_TENANT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_name_uses_org_id() {
        let ctx = RequestContext::new(
            Some(Identity {
                account_number: "12345".to_string(),
                org_id: "67890".to_string(),
                username: "operator".to_string(),
            }),
            "token",
        );
        assert_eq!(ctx.schema_name(), "org_67890");
        assert_eq!(ctx.account_number(), "12345");
        assert_eq!(ctx.org_id(), "67890");
    }

    #[test]
    fn test_anonymous_context_falls_back_to_defaults() {
        let ctx = RequestContext::new(None, "token");
        assert_eq!(ctx.schema_name(), DEFAULT_SCHEMA);
        assert_eq!(ctx.account_number(), UNKNOWN_TENANT);
        assert_eq!(ctx.org_id(), UNKNOWN_TENANT);
    }

    #[test]
    fn test_remaining_saturates_at_zero() {
        let ctx = RequestContext::new(None, "token")
            .with_deadline(Instant::now() - Duration::from_secs(1));
        assert_eq!(ctx.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = RequestContext::new(None, "token");
        let b = RequestContext::new(None, "token");
        assert_ne!(a.request_id, b.request_id);
    }
}
