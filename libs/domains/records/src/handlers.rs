use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use axum_helpers::{AppError, JwtClaims, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::models::{CreateServiceRecord, ServiceRecord, UpdateServiceRecord};
use crate::reference::ReferenceData;
use crate::repository::ServiceRecordRepository;
use crate::service::RecordService;

/// OpenAPI documentation for the service-record API
#[derive(OpenApi)]
#[openapi(
    paths(create_record, update_record, get_record, list_my_records, list_all_records),
    components(schemas(ServiceRecord, CreateServiceRecord, UpdateServiceRecord)),
    tags(
        (name = "records", description = "Billable service record entry and listing")
    )
)]
pub struct RecordsApiDoc;

/// Router for record routes.
///
/// Everything here assumes an authenticated session; the all-records listing
/// additionally rejects non-admin callers itself, since it shares `/` with
/// the staff create route.
pub fn router<R, D>(service: Arc<RecordService<R, D>>) -> Router
where
    R: ServiceRecordRepository + 'static,
    D: ReferenceData + 'static,
{
    Router::new()
        .route("/", get(list_all_records).post(create_record))
        .route("/mine", get(list_my_records))
        .route("/{id}", get(get_record).patch(update_record))
        .with_state(service)
}

/// Create a service record
#[utoipa::path(
    post,
    path = "",
    tag = "records",
    request_body = CreateServiceRecord,
    responses(
        (status = 201, description = "Record created", body = ServiceRecord),
        (status = 400, description = "Invalid input or ineligible reference data")
    )
)]
pub async fn create_record<R, D>(
    State(service): State<Arc<RecordService<R, D>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<CreateServiceRecord>,
) -> Result<impl IntoResponse, AppError>
where
    R: ServiceRecordRepository,
    D: ReferenceData,
{
    let entered_by = claims.user_id()?;
    let record = service.create(input, entered_by).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update an unbilled service record
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "records",
    params(("id" = String, Path, description = "Record ID")),
    request_body = UpdateServiceRecord,
    responses(
        (status = 200, description = "Record updated", body = ServiceRecord),
        (status = 403, description = "Record already billed or not owned by caller"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn update_record<R, D>(
    State(service): State<Arc<RecordService<R, D>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateServiceRecord>,
) -> Result<Json<ServiceRecord>, AppError>
where
    R: ServiceRecordRepository,
    D: ReferenceData,
{
    let actor_id = claims.user_id()?;
    let record = service
        .update(id, input, actor_id, claims.is_admin())
        .await?;
    Ok(Json(record))
}

/// Fetch a single record (staff: own records only)
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "records",
    params(("id" = String, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record", body = ServiceRecord),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_record<R, D>(
    State(service): State<Arc<RecordService<R, D>>>,
    Extension(claims): Extension<JwtClaims>,
    UuidPath(id): UuidPath,
) -> Result<Json<ServiceRecord>, AppError>
where
    R: ServiceRecordRepository,
    D: ReferenceData,
{
    let actor_id = claims.user_id()?;
    let record = service.get(id, actor_id, claims.is_admin()).await?;
    Ok(Json(record))
}

/// The caller's recent entries, newest-first
#[utoipa::path(
    get,
    path = "/mine",
    tag = "records",
    responses((status = 200, description = "Caller's records", body = Vec<ServiceRecord>))
)]
pub async fn list_my_records<R, D>(
    State(service): State<Arc<RecordService<R, D>>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<Vec<ServiceRecord>>, AppError>
where
    R: ServiceRecordRepository,
    D: ReferenceData,
{
    let user_id = claims.user_id()?;
    Ok(Json(service.list_mine(user_id).await?))
}

/// All records, newest-first (admin)
#[utoipa::path(
    get,
    path = "",
    tag = "records",
    responses(
        (status = 200, description = "All records", body = Vec<ServiceRecord>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn list_all_records<R, D>(
    State(service): State<Arc<RecordService<R, D>>>,
    Extension(claims): Extension<JwtClaims>,
) -> Result<Json<Vec<ServiceRecord>>, AppError>
where
    R: ServiceRecordRepository,
    D: ReferenceData,
{
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(Json(service.list_all().await?))
}
