use super::shutdown::ShutdownCoordinator;
use crate::errors::AppError;
use crate::errors::handlers::not_found;
use crate::http::cors::{create_cors_layer, parse_allowed_origins};
use crate::http::security::security_headers;
use axum::handler::HandlerWithoutStateExt;
use axum::response::{IntoResponse, Response};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::any::Any;
use std::io;
use std::path::Path;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Assemble the application router with CORS origins from `CORS_ALLOWED_ORIGIN`.
///
/// The variable is required and holds comma-separated origins, e.g.
/// `CORS_ALLOWED_ORIGIN=http://localhost:3000,https://skills.example.com`.
///
/// See [`build_router`] for the layout of the result.
///
/// # Errors
/// Fails when `CORS_ALLOWED_ORIGIN` is unset or yields no valid origin.
pub fn create_router<T>(apis: Router, static_dir: Option<&Path>) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    let origins_str = std::env::var("CORS_ALLOWED_ORIGIN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN environment variable is required. Example: CORS_ALLOWED_ORIGIN=http://localhost:3000",
        )
    })?;

    let allowed_origins = parse_allowed_origins(&origins_str);
    if allowed_origins.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CORS_ALLOWED_ORIGIN must contain at least one valid origin",
        ));
    }

    info!("CORS configured with allowed origins: {}", origins_str);

    Ok(build_router::<T>(
        apis,
        create_cors_layer(allowed_origins),
        static_dir,
    ))
}

/// Combine API routes with docs, static files and the shared middleware stack.
///
/// - `apis` nested under `/api`
/// - Swagger UI, ReDoc, RapiDoc and Scalar over `T`'s document
/// - files from `static_dir` for everything else, `index.html` on `/`
/// - content-negotiated 404 for unknown paths
/// - request tracing, security headers, CORS, compression, and a 500 body for panics
pub fn build_router<T>(apis: Router, cors_layer: CorsLayer, static_dir: Option<&Path>) -> Router
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis);

    let router = match static_dir {
        Some(dir) => {
            info!("Serving static files from {}", dir.display());
            router.fallback_service(
                ServeDir::new(dir)
                    .call_fallback_on_method_not_allowed(true)
                    .not_found_service(not_found.into_service()),
            )
        }
        None => router.fallback(not_found),
    };

    router
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::custom(handle_panic))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::InternalServerError(format!("handler panicked: {detail}")).into_response()
}

/// Serve with coordinated shutdown, then run `cleanup` bounded by `shutdown_timeout`.
///
/// ```ignore
/// let cleanup = async move {
///     mongo_client.shutdown().await;
/// };
///
/// create_production_app(router, &config, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_handle = coordinator.clone();
    tokio::spawn(async move { signal_handle.wait_for_signal().await });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(coordinator.clone().wait_for_shutdown())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => tracing::warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result
}
