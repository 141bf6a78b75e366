//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation for all APIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LiveScan Billing API",
        version = "0.1.0",
        description = "Billing administration for live-scan service transactions: \
                       reference data, service record entry, and CSV/XLSX invoice exports",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/auth", api = domain_users::UsersApiDoc),
        (path = "/api/organizations", api = domain_catalog::CatalogApiDoc),
        (path = "/api/records", api = domain_records::RecordsApiDoc),
        (path = "/api/export", api = domain_exports::ExportsApiDoc)
    ),
    paths(
        crate::api::dashboard::admin_dashboard_stats,
        crate::api::dashboard::staff_dashboard_stats,
    ),
    components(schemas(
        crate::api::dashboard::AdminDashboardStats,
        domain_records::StaffRecordStats,
    )),
    tags(
        (name = "auth", description = "Login, session, and password reset"),
        (name = "users", description = "Admin staff management"),
        (name = "catalog", description = "Reference data: organizations, services, fees, technicians"),
        (name = "records", description = "Billable service record entry and listing"),
        (name = "exports", description = "Billing export runs, history, and downloads"),
        (name = "dashboards", description = "Admin and staff dashboard aggregates")
    )
)]
pub struct ApiDoc;
