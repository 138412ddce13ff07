use std::sync::{PoisonError, RwLock};

use crate::entities::user::{SessionInfo, SessionRole};
use crate::error::{AppError, AppResult};

/// Who the upstream session cookie currently belongs to.
///
/// The cookie itself is opaque; this only records the role of the last
/// successful login so routes can be gated without a round trip.
#[derive(Debug, Default)]
pub struct Session {
    role: RwLock<Option<SessionRole>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, role: SessionRole) {
        *self.role.write().unwrap_or_else(PoisonError::into_inner) = Some(role);
        tracing::info!(role = ?role, "Session established");
    }

    pub fn sign_out(&self) {
        if self
            .role
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
        {
            tracing::info!("Session cleared");
        }
    }

    pub fn role(&self) -> Option<SessionRole> {
        *self.role.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn info(&self) -> SessionInfo {
        let role = self.role();
        SessionInfo {
            authenticated: role.is_some(),
            role,
        }
    }

    /// Admins pass every gate; users only the user gate.
    pub fn require(&self, needed: SessionRole) -> AppResult<()> {
        match (self.role(), needed) {
            (None, _) => Err(AppError::Unauthorized("Please sign in first".to_string())),
            (Some(SessionRole::Admin), _) => Ok(()),
            (Some(SessionRole::User), SessionRole::User) => Ok(()),
            (Some(SessionRole::User), SessionRole::Admin) => {
                Err(AppError::Forbidden("Admin access required".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gates_follow_role() {
        let session = Session::new();
        assert!(matches!(
            session.require(SessionRole::User),
            Err(AppError::Unauthorized(_))
        ));

        session.sign_in(SessionRole::User);
        assert!(session.require(SessionRole::User).is_ok());
        assert!(matches!(
            session.require(SessionRole::Admin),
            Err(AppError::Forbidden(_))
        ));

        session.sign_in(SessionRole::Admin);
        assert!(session.require(SessionRole::Admin).is_ok());
        assert!(session.require(SessionRole::User).is_ok());

        session.sign_out();
        assert_eq!(
            session.info(),
            SessionInfo {
                authenticated: false,
                role: None
            }
        );
    }
}
