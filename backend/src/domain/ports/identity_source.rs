//! Port resolving who is making the current call.

use crate::domain::UserId;

/// Resolves the acting identity for the current call.
///
/// `None` denotes an anonymous caller.
pub trait IdentitySource: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;
}

/// Identity fixed at construction time.
///
/// Used by background callers and tests, and by inbound adapters once they
/// have resolved the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixedIdentity(Option<UserId>);

impl FixedIdentity {
    pub fn user(id: UserId) -> Self {
        Self(Some(id))
    }

    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentitySource for FixedIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.0
    }
}
