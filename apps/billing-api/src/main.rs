use std::sync::Arc;

use axum::routing::get;
use axum_helpers::{
    create_app, create_router, health_router, run_health_checks, HealthCheckFuture, JwtAuth,
};
use core_config::tracing::{init_tracing, install_color_eyre};
use notifications_email::{EmailProvider, SmtpProvider};
use tracing::info;

use domain_catalog::{CatalogService, PgCatalogRepository};
use domain_exports::{
    ExportApiState, ExportService, PgBillableRecords, PgExportBatchRepository, S3ArtifactStore,
};
use domain_records::{PgServiceRecordRepository, RecordService};
use domain_users::{PgUserRepository, UserService, UsersApiState};

mod api;
mod config;
mod openapi;
mod state;

use api::adapters::{CatalogOrganizationDirectory, CatalogReferenceData, UserExporterDirectory};
use config::Config;
use state::{AppState, ExportSvc};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.environment);

    // Connect to Postgres with retry and bring the schema up to date
    let db = database::postgres::connect_from_config_with_retry(config.postgres.clone(), None)
        .await?;
    database::postgres::run_migrations::<migration::Migrator>(&db, "billing_api").await?;

    let jwt = JwtAuth::new(&config.jwt);

    // Domain services
    let catalog = Arc::new(CatalogService::new(PgCatalogRepository::new(db.clone())));

    let records = Arc::new(RecordService::new(
        PgServiceRecordRepository::new(db.clone()),
        CatalogReferenceData::new(catalog.clone()),
    ));

    let mailer: Arc<dyn EmailProvider> = Arc::new(SmtpProvider::new(config.smtp.clone())?);
    let user_service = UserService::new(PgUserRepository::new(db.clone()), mailer, jwt.clone());
    let users = Arc::new(UsersApiState {
        service: user_service.clone(),
        secure_cookies: config.environment.use_https(),
    });

    let export_service: ExportSvc = ExportService::new(
        PgExportBatchRepository::new(db.clone()),
        PgBillableRecords::new(db.clone()),
        CatalogOrganizationDirectory::new(catalog.clone()),
        S3ArtifactStore::new(&config.storage)?,
    );
    let exports = Arc::new(ExportApiState {
        service: export_service,
        exporters: Arc::new(UserExporterDirectory::new(user_service)),
    });

    let state = AppState {
        config,
        db: db.clone(),
        jwt,
        catalog,
        records,
        exports,
        users,
    };

    // Build router with API routes
    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = create_router::<openapi::ApiDoc>(api_routes).await?;

    // Merge health endpoints; readiness probes the database
    let ready_db = db.clone();
    let app = router
        .merge(health_router(state.config.app.clone()))
        .route(
            "/ready",
            get(move || {
                let db = ready_db.clone();
                async move {
                    let checks: Vec<(&str, HealthCheckFuture)> = vec![(
                        "database",
                        Box::pin(async {
                            database::postgres::check_health(&db)
                                .await
                                .map_err(|e| e.to_string())
                        }),
                    )];
                    run_health_checks(checks).await
                }
            }),
        );

    info!("Starting LiveScan billing API");
    create_app(app, &state.config.server).await?;

    info!("Billing API shutdown complete");
    Ok(())
}
