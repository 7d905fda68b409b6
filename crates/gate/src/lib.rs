//! Client-side authorization gate for protected views.
//!
//! [`AuthGate`] combines a [`SessionProvider`] and a [`RoleResolver`] into an
//! [`AuthorizationDecision`](shared_types::AuthorizationDecision): render the
//! view, show a placeholder, or redirect. The decision is UX only; the
//! backend remains the authority on what a user may read or write.

pub mod evaluate;
pub mod gate;
pub mod provider;
pub mod role_check;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use evaluate::evaluate;
pub use gate::{AuthGate, GateOptions};
pub use provider::{RoleResolver, SessionListener, SessionListeners, SessionProvider, Subscription};
pub use role_check::{has_role, require_role};
