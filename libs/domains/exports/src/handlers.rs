use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_helpers::{AppError, JwtClaims, UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::directory::{ExporterDirectory, OrganizationDirectory};
use crate::models::{
    DownloadUrl, ExportFormat, ExportHistoryEntry, ExportRequest, ExportStatus,
};
use crate::records::BillableRecords;
use crate::repository::ExportBatchRepository;
use crate::service::ExportService;
use crate::storage::ArtifactStore;

/// OpenAPI documentation for the export API
#[derive(OpenApi)]
#[openapi(
    paths(run_export, export_history, download_export),
    components(schemas(
        ExportRequest,
        ExportFormat,
        ExportStatus,
        ExportHistoryEntry,
        DownloadUrl,
    )),
    tags(
        (name = "exports", description = "Billing export runs, history, and downloads")
    )
)]
pub struct ExportsApiDoc;

/// Handler state: the engine plus the exporter-email seam the history view
/// needs (resolved by the api crate over the users domain).
pub struct ExportApiState<B, R, O, A>
where
    B: ExportBatchRepository,
    R: BillableRecords,
    O: OrganizationDirectory,
    A: ArtifactStore,
{
    pub service: ExportService<B, R, O, A>,
    pub exporters: Arc<dyn ExporterDirectory>,
}

/// Router for export routes (mount behind the admin middleware)
pub fn router<B, R, O, A>(state: Arc<ExportApiState<B, R, O, A>>) -> Router
where
    B: ExportBatchRepository + 'static,
    R: BillableRecords + 'static,
    O: OrganizationDirectory + 'static,
    A: ArtifactStore + 'static,
{
    Router::new()
        .route("/monthly", post(run_export))
        .route("/history", get(export_history))
        .route("/{id}/download", get(download_export))
        .with_state(state)
}

/// Run a billing export and stream the rendered file back
#[utoipa::path(
    post,
    path = "/monthly",
    tag = "exports",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Rendered export file", content_type = "application/octet-stream"),
        (status = 400, description = "Invalid request or no unbilled records in range"),
        (status = 500, description = "Render, storage, or database failure")
    )
)]
pub async fn run_export<B, R, O, A>(
    State(state): State<Arc<ExportApiState<B, R, O, A>>>,
    Extension(claims): Extension<JwtClaims>,
    ValidatedJson(input): ValidatedJson<ExportRequest>,
) -> Result<impl IntoResponse, AppError>
where
    B: ExportBatchRepository,
    R: BillableRecords,
    O: OrganizationDirectory,
    A: ArtifactStore,
{
    let exported_by = claims.user_id()?;
    let file = state.service.run_export(input, exported_by).await?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", file.filename),
        ),
    ];
    Ok((headers, file.bytes))
}

/// All export batches, newest-first, with exporter emails
#[utoipa::path(
    get,
    path = "/history",
    tag = "exports",
    responses((status = 200, description = "Export history", body = Vec<ExportHistoryEntry>))
)]
pub async fn export_history<B, R, O, A>(
    State(state): State<Arc<ExportApiState<B, R, O, A>>>,
) -> Result<Json<Vec<ExportHistoryEntry>>, AppError>
where
    B: ExportBatchRepository,
    R: BillableRecords,
    O: OrganizationDirectory,
    A: ArtifactStore,
{
    let batches = state.service.history().await?;

    let mut exporter_ids: Vec<_> = batches.iter().map(|b| b.exported_by).collect();
    exporter_ids.sort_unstable();
    exporter_ids.dedup();
    let emails = state.exporters.emails(exporter_ids).await?;

    let entries = batches
        .into_iter()
        .map(|batch| {
            let email = emails.get(&batch.exported_by).cloned();
            ExportHistoryEntry::from_batch(batch, email)
        })
        .collect();

    Ok(Json(entries))
}

/// Time-limited signed download URL for a batch's stored file
#[utoipa::path(
    get,
    path = "/{id}/download",
    tag = "exports",
    params(("id" = String, Path, description = "Export batch ID")),
    responses(
        (status = 200, description = "Signed URL", body = DownloadUrl),
        (status = 404, description = "Batch unknown or has no stored file")
    )
)]
pub async fn download_export<B, R, O, A>(
    State(state): State<Arc<ExportApiState<B, R, O, A>>>,
    UuidPath(id): UuidPath,
) -> Result<Json<DownloadUrl>, AppError>
where
    B: ExportBatchRepository,
    R: BillableRecords,
    O: OrganizationDirectory,
    A: ArtifactStore,
{
    let url = state.service.download_url(id).await?;
    Ok(Json(DownloadUrl { url }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::directory::{MockExporterDirectory, MockOrganizationDirectory};
    use crate::models::ExportBatch;
    use crate::records::MockBillableRecords;
    use crate::repository::MockExportBatchRepository;
    use crate::service::ExportService;
    use crate::storage::MockArtifactStore;

    fn batch(exported_by: Uuid) -> ExportBatch {
        ExportBatch {
            id: Uuid::now_v7(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            format: ExportFormat::Csv,
            status: ExportStatus::Uploaded,
            record_count: 3,
            exported_by,
            select_all_organizations: true,
            organization_ids: vec![],
            file_key: Some("exports/abc/report.csv".to_string()),
            created_at: Utc::now(),
        }
    }

    fn test_router(
        batches: MockExportBatchRepository,
        exporters: MockExporterDirectory,
    ) -> axum::Router {
        let state = Arc::new(ExportApiState {
            service: ExportService::new(
                batches,
                MockBillableRecords::new(),
                MockOrganizationDirectory::new(),
                MockArtifactStore::new(),
            ),
            exporters: Arc::new(exporters),
        });
        router(state)
    }

    #[tokio::test]
    async fn test_history_resolves_exporter_emails() {
        let exporter = Uuid::now_v7();
        let stored = batch(exporter);

        let mut batches = MockExportBatchRepository::new();
        batches
            .expect_list_newest_first()
            .returning(move || Ok(vec![stored.clone()]));

        let mut exporters = MockExporterDirectory::new();
        exporters.expect_emails().returning(move |_| {
            Ok(HashMap::from([(exporter, "admin@example.com".to_string())]))
        });

        let response = test_router(batches, exporters)
            .oneshot(
                Request::builder()
                    .uri("/history")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let entries: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["exported_by_email"], "admin@example.com");
        assert_eq!(entries[0]["has_file"], true);
        assert_eq!(entries[0]["record_count"], 3);
    }

    #[tokio::test]
    async fn test_download_unknown_batch_is_404() {
        let mut batches = MockExportBatchRepository::new();
        batches.expect_get_by_id().returning(|_| Ok(None));

        let response = test_router(batches, MockExporterDirectory::new())
            .oneshot(
                Request::builder()
                    .uri(format!("/{}/download", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_monthly_rejects_inverted_range_over_http() {
        let claims = JwtClaims {
            sub: Uuid::now_v7().to_string(),
            email: "admin@example.com".to_string(),
            name: "Admin".to_string(),
            role: "admin".to_string(),
            exp: i64::MAX,
            iat: 0,
            jti: "test".to_string(),
        };

        let app = test_router(MockExportBatchRepository::new(), MockExporterDirectory::new())
            .layer(axum::Extension(claims));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/monthly")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"startDate":"2026-02-01","endDate":"2026-01-01","format":"csv"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
