//! Stateless JWT authentication.
//!
//! Tokens are issued at login, carried in the `Authorization: Bearer` header
//! or the `access_token` cookie, and verified by [`jwt_auth_middleware`].
//! Role enforcement for admin-only routes is layered on via
//! [`require_admin_middleware`].

mod config;
mod jwt;
mod middleware;

pub use config::JwtConfig;
pub use jwt::{JwtAuth, JwtClaims, TOKEN_COOKIE, TOKEN_TTL_SECS};
pub use middleware::{jwt_auth_middleware, require_admin_middleware};
