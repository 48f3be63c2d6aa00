use axum::Router;
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder};
use utoipa_swagger_ui::SwaggerUi;

use crate::config;
use crate::note::{Note, NoteStore, create_notes_router};
use crate::resource::docs::resource_openapi;
use crate::task::{Task, TaskStore, create_tasks_router};

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: config::Config) -> anyhow::Result<()> {
    let server_address = format!("{}:{}", &config.listen_address, &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    let app = create_app(Arc::new(db));

    axum::serve(listener, app).await?;
    Ok(())
}

/// Creates the application router serving both collections, the health check
/// and the API documentation.
pub fn create_app(db: Arc<sea_orm::DatabaseConnection>) -> Router {
    let notes_router = create_notes_router(NoteStore::new(db.clone()));
    let tasks_router = create_tasks_router(TaskStore::new(db));

    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .merge(notes_router)
        .merge(tasks_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// OpenAPI document covering every collection.
pub fn api_doc() -> OpenApi {
    let mut doc = OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Jotter")
                .description(Some("Notes and tasks over HTTP"))
                .version(env!("CARGO_PKG_VERSION")),
        )
        .build();
    doc.merge(resource_openapi::<Note>());
    doc.merge(resource_openapi::<Task>());
    doc
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
