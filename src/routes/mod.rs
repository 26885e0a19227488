//! Router Module Index
//!
//! Routes are grouped by who may reach them. Every group except `public` is wrapped
//! in the access guard with its own `RouteGuardConfig`, so the access rule lives next
//! to the routes it protects.

/// Routes reachable by anyone. Handlers here must not assume an identity.
pub mod public;

/// Routes for any signed-in user, whatever the role.
pub mod authenticated;

/// Role-specific dashboards (candidate, employer).
pub mod dashboards;

/// Routes restricted to the `admin` role.
pub mod admin;
