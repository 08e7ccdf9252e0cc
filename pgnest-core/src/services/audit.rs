use tracing::debug;

use super::{Marketplace, users::require_admin};
use crate::error::DomainResult;
use crate::models::{AuditAction, AuditLog, AuditQuery, AuditTarget, User};

impl Marketplace {
    /// Append an audit entry for an action taken by `actor`.
    pub fn record(
        &self,
        actor: &User,
        action: AuditAction,
        target: AuditTarget,
        target_id: &str,
        details: Option<String>,
    ) -> DomainResult<AuditLog> {
        let _guard = self.lock();
        let seq = self.store.audit_logs.len() as u64 + 1;
        let log = AuditLog::new(seq, &actor.id, action, target, target_id, details);
        self.store.audit_logs.insert(log.clone())?;
        debug!("audit #{} {} {} {}", seq, action, target, target_id);
        Ok(log)
    }

    /// Newest entries first.
    pub fn audit_logs(&self, admin: &User, query: &AuditQuery) -> DomainResult<Vec<AuditLog>> {
        require_admin(admin)?;
        let mut logs = self.store.audit_logs.find(|log| query.matches(log));
        logs.sort_by(|a, b| b.seq.cmp(&a.seq));
        logs.truncate(query.effective_limit());
        Ok(logs)
    }
}
