use shared_types::{AppError, Session, UserRole};

use crate::provider::{RoleResolver, SessionProvider};

/// True if `user_id` holds exactly `role`. A failed lookup counts as no role.
pub async fn has_role(resolver: &dyn RoleResolver, user_id: &str, role: &UserRole) -> bool {
    match resolver.resolve_role(user_id).await {
        Ok(Some(record)) => record.role == *role,
        Ok(None) => false,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "Role check failed, treating as no role");
            false
        }
    }
}

/// Confirm the current session belongs to a user holding `role`.
///
/// This repeats the gate's check for pages that act on privileged data; the
/// authoritative enforcement still happens in the backend.
pub async fn require_role(
    provider: &dyn SessionProvider,
    resolver: &dyn RoleResolver,
    role: &UserRole,
) -> Result<Session, AppError> {
    let session = provider.current_session().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Session fetch failed, treating as signed out");
        Session::absent()
    });

    let Some(user_id) = session.user_id() else {
        return Err(AppError::unauthorized("Sign in required"));
    };
    if !has_role(resolver, user_id, role).await {
        return Err(AppError::forbidden(format!("{role} role required")));
    }
    Ok(session)
}
