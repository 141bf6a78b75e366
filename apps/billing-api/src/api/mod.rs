//! Route composition.
//!
//! `/auth` carries its own JWT layer (login must stay reachable without a
//! session); everything else lives in the protected group behind the JWT
//! middleware, with admin-only routers additionally gated.

pub mod adapters;
pub mod dashboard;

use axum::{middleware, Router};
use axum_helpers::{jwt_auth_middleware, require_admin_middleware};

use crate::state::AppState;

pub fn routes(state: &AppState) -> Router {
    let protected = Router::new()
        .nest(
            "/records",
            domain_records::handlers::router(state.records.clone()),
        )
        .nest(
            "/organizations",
            domain_catalog::handlers::organizations_router(state.catalog.clone()),
        )
        .nest(
            "/services",
            domain_catalog::handlers::services_router(state.catalog.clone()),
        )
        .nest(
            "/fees",
            domain_catalog::handlers::fees_router(state.catalog.clone()),
        )
        .nest(
            "/technicians",
            domain_catalog::handlers::technicians_router(state.catalog.clone()),
        )
        .nest(
            "/export",
            domain_exports::handlers::router(state.exports.clone())
                .route_layer(middleware::from_fn(require_admin_middleware)),
        )
        .nest(
            "/users",
            domain_users::handlers::admin_router(state.users.clone())
                .route_layer(middleware::from_fn(require_admin_middleware)),
        )
        .merge(dashboard::router(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.jwt.clone(),
            jwt_auth_middleware,
        ));

    Router::new()
        .nest(
            "/auth",
            domain_users::handlers::auth_router(state.users.clone(), state.jwt.clone()),
        )
        .merge(protected)
}
