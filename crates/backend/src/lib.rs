//! Adapters between the authorization gate and the hosted backend: the
//! session store, the role resolver, the admin console and the ambient
//! config and logging setup.

pub mod admin;
pub mod client;
pub mod config;
pub mod error_convert;
pub mod roles;
pub mod services;
pub mod session;
pub mod telemetry;

pub use admin::AdminConsole;
pub use client::{AuthUser, BackendClient, TokenGrant};
pub use roles::RemoteRoleResolver;
pub use services::Services;
pub use session::RemoteSessionStore;
