use shared_types::{AuthorizationDecision, RoleHomes, RoleLookup, Session, UserRole};

/// Decide access for one set of inputs.
///
/// `session` is `None` until the first session is known. The role-home
/// redirect is keyed on the role the user actually has, never on the one the
/// route asked for; a missing record goes to the default home.
pub fn evaluate(
    session: Option<&Session>,
    role: &RoleLookup,
    required: Option<&UserRole>,
    homes: &RoleHomes,
) -> AuthorizationDecision {
    let Some(session) = session else {
        return AuthorizationDecision::loading();
    };
    if !session.is_present() {
        return AuthorizationDecision::redirect_to_login();
    }

    let resolved = match role {
        RoleLookup::Idle | RoleLookup::Pending => return AuthorizationDecision::loading(),
        RoleLookup::Settled(record) => record.as_ref().map(|r| r.role.clone()),
    };

    match required {
        None => AuthorizationDecision::authorized_no_role_required(resolved),
        Some(required) if resolved.as_ref() == Some(required) => {
            AuthorizationDecision::authorized_with_role(required.clone())
        }
        Some(_) => {
            let target = homes.home_for(resolved.as_ref()).to_string();
            AuthorizationDecision::redirect_to_role_home(target, resolved)
        }
    }
}
