use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::{REQUEST_ID_HEADER, logging_middleware};
use crate::metrics::metrics_middleware;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::modules::attendance::init_attendance_router;
use crate::modules::auth::init_auth_router;
use crate::modules::classes::init_classes_router;
use crate::modules::fees::init_fees_router;
use crate::modules::schools::init_schools_router;
use crate::modules::stats::{init_platform_stats_router, init_stats_router};
use crate::modules::students::init_students_router;
use crate::modules::teachers::init_teachers_router;
use crate::modules::timetable::init_timetable_router;
use crate::state::AppState;

/// Room for the JSON `data` part and multipart framing next to the image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

fn cors_layer(state: &AppState) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = state
        .cors_config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
}

pub fn init_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.upload_config.max_bytes + MULTIPART_OVERHEAD);

    let admin = Router::new()
        .nest(
            "/teachers",
            init_teachers_router(state.clone()).layer(upload_limit.clone()),
        )
        .nest(
            "/students",
            init_students_router(state.clone()).layer(upload_limit),
        )
        .nest("/classes", init_classes_router(state.clone()))
        .nest("/timetable", init_timetable_router(state.clone()))
        .nest("/stats", init_stats_router(state.clone()));

    let api = Router::new()
        .nest("/auth", init_auth_router(state.clone()))
        .nest("/schools", init_schools_router(state.clone()))
        .nest("/super-admin/stats", init_platform_stats_router(state.clone()))
        .nest("/admin", admin)
        .nest("/attendance", init_attendance_router(state.clone()))
        .nest("/fees", init_fees_router(state.clone()));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest("/api", api)
        .nest_service(
            state.images.public_path(),
            ServeDir::new(state.images.root_dir()),
        )
        .with_state(state.clone())
        .layer(cors_layer(&state))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
}
