//! Admin and staff dashboard endpoints.
//!
//! These aggregate across domains (records backlog, catalog counts, latest
//! export batch), so they live in the api crate rather than any one domain.

use axum::{extract::State, middleware, routing::get, Extension, Json, Router};
use axum_helpers::{require_admin_middleware, AppError, JwtClaims};
use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use domain_records::StaffRecordStats;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminDashboardStats {
    pub unbilled_count: usize,
    pub entries_this_month: usize,
    pub active_organizations: usize,
    pub suspended_organizations: usize,
    pub unbilled_older_than_30_days: usize,
    /// When the most recent export batch ran, if any
    pub last_export_date: Option<DateTime<Utc>>,
    /// Records attributed to that batch
    pub last_export_count: u32,
    pub export_done_this_month: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/admin/dashboard-stats", get(admin_dashboard_stats))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route("/staff/dashboard-stats", get(staff_dashboard_stats))
        .with_state(state)
}

/// Billing backlog and catalog overview for the admin home screen
#[utoipa::path(
    get,
    path = "/admin/dashboard-stats",
    tag = "dashboards",
    responses((status = 200, description = "Admin dashboard stats", body = AdminDashboardStats))
)]
pub async fn admin_dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<AdminDashboardStats>, AppError> {
    let backlog = state.records.unbilled_stats().await?;
    let active_organizations = state.catalog.count_billable_organizations().await?;
    let suspended_organizations = state.catalog.count_suspended_organizations().await?;

    // The latest batch is authoritative for "last export", rather than
    // inferring it from record update timestamps
    let latest = state.exports.service.latest().await?;
    let now = Utc::now();
    let (last_export_date, last_export_count, export_done_this_month) = match latest {
        Some(batch) => (
            Some(batch.created_at),
            batch.record_count,
            batch.created_at.year() == now.year() && batch.created_at.month() == now.month(),
        ),
        None => (None, 0, false),
    };

    Ok(Json(AdminDashboardStats {
        unbilled_count: backlog.unbilled_count,
        entries_this_month: backlog.entries_this_month,
        active_organizations,
        suspended_organizations,
        unbilled_older_than_30_days: backlog.unbilled_older_than_30_days,
        last_export_date,
        last_export_count,
        export_done_this_month,
    }))
}

/// The caller's own entry counts
#[utoipa::path(
    get,
    path = "/staff/dashboard-stats",
    tag = "dashboards",
    responses((status = 200, description = "Staff dashboard stats", body = StaffRecordStats))
)]
pub async fn staff_dashboard_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<StaffRecordStats>, AppError> {
    let user_id = claims.user_id()?;
    Ok(Json(state.records.staff_stats(user_id).await?))
}
