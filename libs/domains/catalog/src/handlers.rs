use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use axum_helpers::{require_admin_middleware, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    CreateFee, CreateOrganization, CreateService, CreateTechnician, Fee, Organization, Service,
    Technician, UpdateFee, UpdateOrganization, UpdateService, UpdateTechnician,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

/// OpenAPI documentation for the catalog API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_organizations,
        list_billable_organizations,
        create_organization,
        update_organization,
        toggle_organization_active,
        toggle_organization_suspended,
        list_services,
        list_active_services,
        create_service,
        update_service,
        toggle_service_active,
        list_fees,
        list_active_fees,
        create_fee,
        update_fee,
        toggle_fee_active,
        list_technicians,
        list_active_technicians,
        create_technician,
        update_technician,
        toggle_technician_active,
    ),
    components(schemas(
        Organization,
        CreateOrganization,
        UpdateOrganization,
        Service,
        CreateService,
        UpdateService,
        Fee,
        CreateFee,
        UpdateFee,
        Technician,
        CreateTechnician,
        UpdateTechnician,
    )),
    tags(
        (name = "catalog", description = "Reference data: organizations, services, fees, technicians")
    )
)]
pub struct CatalogApiDoc;

/// Router for organization routes.
///
/// CRUD and toggles are admin-only; the `/active` listing feeds the staff
/// entry form and only needs an authenticated session.
pub fn organizations_router<R: CatalogRepository + 'static>(
    service: Arc<CatalogService<R>>,
) -> Router {
    Router::new()
        .route("/", get(list_organizations).post(create_organization))
        .route("/{id}", patch(update_organization))
        .route("/{id}/toggle-active", patch(toggle_organization_active))
        .route("/{id}/toggle-suspend", patch(toggle_organization_suspended))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route("/active", get(list_billable_organizations))
        .with_state(service)
}

/// Router for service routes
pub fn services_router<R: CatalogRepository + 'static>(service: Arc<CatalogService<R>>) -> Router {
    Router::new()
        .route("/", get(list_services).post(create_service))
        .route("/{id}", patch(update_service))
        .route("/{id}/toggle-active", patch(toggle_service_active))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route("/active", get(list_active_services))
        .with_state(service)
}

/// Router for fee routes
pub fn fees_router<R: CatalogRepository + 'static>(service: Arc<CatalogService<R>>) -> Router {
    Router::new()
        .route("/", get(list_fees).post(create_fee))
        .route("/{id}", patch(update_fee))
        .route("/{id}/toggle-active", patch(toggle_fee_active))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route("/active", get(list_active_fees))
        .with_state(service)
}

/// Router for technician routes
pub fn technicians_router<R: CatalogRepository + 'static>(
    service: Arc<CatalogService<R>>,
) -> Router {
    Router::new()
        .route("/", get(list_technicians).post(create_technician))
        .route("/{id}", patch(update_technician))
        .route("/{id}/toggle-active", patch(toggle_technician_active))
        .route_layer(middleware::from_fn(require_admin_middleware))
        .route("/active", get(list_active_technicians))
        .with_state(service)
}

// ---- Organizations ----

/// List all organizations (admin)
#[utoipa::path(
    get,
    path = "",
    tag = "catalog",
    responses(
        (status = 200, description = "List of organizations", body = Vec<Organization>),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_organizations<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Organization>>> {
    Ok(Json(service.list_organizations().await?))
}

/// List active, non-suspended organizations (staff entry form)
#[utoipa::path(
    get,
    path = "/active",
    tag = "catalog",
    responses(
        (status = 200, description = "Billable organizations", body = Vec<Organization>)
    )
)]
pub async fn list_billable_organizations<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Organization>>> {
    Ok(Json(service.list_billable_organizations().await?))
}

/// Create an organization
#[utoipa::path(
    post,
    path = "",
    tag = "catalog",
    request_body = CreateOrganization,
    responses(
        (status = 201, description = "Organization created", body = Organization),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "Duplicate name")
    )
)]
pub async fn create_organization<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateOrganization>,
) -> CatalogResult<impl IntoResponse> {
    let org = service.create_organization(input).await?;
    Ok((StatusCode::CREATED, Json(org)))
}

/// Update an organization
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Organization ID")),
    request_body = UpdateOrganization,
    responses(
        (status = 200, description = "Organization updated", body = Organization),
        (status = 404, description = "Organization not found")
    )
)]
pub async fn update_organization<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateOrganization>,
) -> CatalogResult<Json<Organization>> {
    Ok(Json(service.update_organization(id, input).await?))
}

/// Activate / deactivate an organization (soft delete)
#[utoipa::path(
    patch,
    path = "/{id}/toggle-active",
    tag = "catalog",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization toggled", body = Organization),
        (status = 404, description = "Organization not found")
    )
)]
pub async fn toggle_organization_active<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Organization>> {
    Ok(Json(service.toggle_organization_active(id).await?))
}

/// Suspend / reactivate an organization's billing
#[utoipa::path(
    patch,
    path = "/{id}/toggle-suspend",
    tag = "catalog",
    params(("id" = String, Path, description = "Organization ID")),
    responses(
        (status = 200, description = "Organization toggled", body = Organization),
        (status = 404, description = "Organization not found")
    )
)]
pub async fn toggle_organization_suspended<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Organization>> {
    Ok(Json(service.toggle_organization_suspended(id).await?))
}

// ---- Services ----

/// List all services (admin)
#[utoipa::path(
    get,
    path = "",
    tag = "catalog",
    responses((status = 200, description = "List of services", body = Vec<Service>))
)]
pub async fn list_services<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Service>>> {
    Ok(Json(service.list_services().await?))
}

/// List active services (staff entry form)
#[utoipa::path(
    get,
    path = "/active",
    tag = "catalog",
    responses((status = 200, description = "Active services", body = Vec<Service>))
)]
pub async fn list_active_services<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Service>>> {
    Ok(Json(service.list_active_services().await?))
}

/// Create a service
#[utoipa::path(
    post,
    path = "",
    tag = "catalog",
    request_body = CreateService,
    responses(
        (status = 201, description = "Service created", body = Service),
        (status = 409, description = "Duplicate name")
    )
)]
pub async fn create_service<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateService>,
) -> CatalogResult<impl IntoResponse> {
    let created = service.create_service(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a service
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Service ID")),
    request_body = UpdateService,
    responses(
        (status = 200, description = "Service updated", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn update_service<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateService>,
) -> CatalogResult<Json<Service>> {
    Ok(Json(service.update_service(id, input).await?))
}

/// Activate / deactivate a service
#[utoipa::path(
    patch,
    path = "/{id}/toggle-active",
    tag = "catalog",
    params(("id" = String, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service toggled", body = Service),
        (status = 404, description = "Service not found")
    )
)]
pub async fn toggle_service_active<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Service>> {
    Ok(Json(service.toggle_service_active(id).await?))
}

// ---- Fees ----

/// List all fees (admin)
#[utoipa::path(
    get,
    path = "",
    tag = "catalog",
    responses((status = 200, description = "List of fees", body = Vec<Fee>))
)]
pub async fn list_fees<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Fee>>> {
    Ok(Json(service.list_fees().await?))
}

/// List active fees (staff entry form)
#[utoipa::path(
    get,
    path = "/active",
    tag = "catalog",
    responses((status = 200, description = "Active fees", body = Vec<Fee>))
)]
pub async fn list_active_fees<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Fee>>> {
    Ok(Json(service.list_active_fees().await?))
}

/// Create a fee
#[utoipa::path(
    post,
    path = "",
    tag = "catalog",
    request_body = CreateFee,
    responses((status = 201, description = "Fee created", body = Fee))
)]
pub async fn create_fee<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateFee>,
) -> CatalogResult<impl IntoResponse> {
    let fee = service.create_fee(input).await?;
    Ok((StatusCode::CREATED, Json(fee)))
}

/// Update a fee
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Fee ID")),
    request_body = UpdateFee,
    responses(
        (status = 200, description = "Fee updated", body = Fee),
        (status = 404, description = "Fee not found")
    )
)]
pub async fn update_fee<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateFee>,
) -> CatalogResult<Json<Fee>> {
    Ok(Json(service.update_fee(id, input).await?))
}

/// Activate / deactivate a fee
#[utoipa::path(
    patch,
    path = "/{id}/toggle-active",
    tag = "catalog",
    params(("id" = String, Path, description = "Fee ID")),
    responses(
        (status = 200, description = "Fee toggled", body = Fee),
        (status = 404, description = "Fee not found")
    )
)]
pub async fn toggle_fee_active<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Fee>> {
    Ok(Json(service.toggle_fee_active(id).await?))
}

// ---- Technicians ----

/// List all technicians (admin)
#[utoipa::path(
    get,
    path = "",
    tag = "catalog",
    responses((status = 200, description = "List of technicians", body = Vec<Technician>))
)]
pub async fn list_technicians<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Technician>>> {
    Ok(Json(service.list_technicians().await?))
}

/// List active technicians (staff entry form)
#[utoipa::path(
    get,
    path = "/active",
    tag = "catalog",
    responses((status = 200, description = "Active technicians", body = Vec<Technician>))
)]
pub async fn list_active_technicians<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
) -> CatalogResult<Json<Vec<Technician>>> {
    Ok(Json(service.list_active_technicians().await?))
}

/// Create a technician
#[utoipa::path(
    post,
    path = "",
    tag = "catalog",
    request_body = CreateTechnician,
    responses((status = 201, description = "Technician created", body = Technician))
)]
pub async fn create_technician<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTechnician>,
) -> CatalogResult<impl IntoResponse> {
    let tech = service.create_technician(input).await?;
    Ok((StatusCode::CREATED, Json(tech)))
}

/// Update a technician
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "catalog",
    params(("id" = String, Path, description = "Technician ID")),
    request_body = UpdateTechnician,
    responses(
        (status = 200, description = "Technician updated", body = Technician),
        (status = 404, description = "Technician not found")
    )
)]
pub async fn update_technician<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTechnician>,
) -> CatalogResult<Json<Technician>> {
    Ok(Json(service.update_technician(id, input).await?))
}

/// Activate / deactivate a technician
#[utoipa::path(
    patch,
    path = "/{id}/toggle-active",
    tag = "catalog",
    params(("id" = String, Path, description = "Technician ID")),
    responses(
        (status = 200, description = "Technician toggled", body = Technician),
        (status = 404, description = "Technician not found")
    )
)]
pub async fn toggle_technician_active<R: CatalogRepository>(
    State(service): State<Arc<CatalogService<R>>>,
    UuidPath(id): UuidPath,
) -> CatalogResult<Json<Technician>> {
    Ok(Json(service.toggle_technician_active(id).await?))
}
