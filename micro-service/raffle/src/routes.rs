use crate::{
    handlers::rifa::{
        create_rifa, health_check, list_rifas, method_not_allowed, payment, purchased_numbers,
        save_rifa, summary,
    },
    service::SharedRaffleService,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use axum::{
    Router,
    extract::Extension,
    http::{Method, header},
    routing::{get, post},
};

use app_config::AppConfig;
use app_error::middleware_handling::error_handling_middleware;
use app_middleware::{logging_middleware, security_headers_middleware};

const ALLOW_POST: &str = "POST";
const ALLOW_GET: &str = "GET,HEAD";
const ALLOW_GET_POST: &str = "GET,HEAD,POST";

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins = if allowed_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect::<Vec<_>>(),
        )
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn create_routes(raffle_service: SharedRaffleService, config: &AppConfig) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config.server.allowed_origins));

    let app = Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/saveRifa",
            post(save_rifa).fallback(|method: Method| async move {
                method_not_allowed(method, ALLOW_POST)
            }),
        )
        .route(
            "/api/rifa",
            get(list_rifas)
                .post(create_rifa)
                .fallback(|method: Method| async move {
                    method_not_allowed(method, ALLOW_GET_POST)
                }),
        )
        .route(
            "/api/getRifas",
            get(purchased_numbers).fallback(|method: Method| async move {
                method_not_allowed(method, ALLOW_GET)
            }),
        )
        .route(
            "/api/summary",
            get(summary).fallback(|method: Method| async move {
                method_not_allowed(method, ALLOW_GET)
            }),
        )
        .route(
            "/api/payment",
            get(payment).fallback(|method: Method| async move {
                method_not_allowed(method, ALLOW_GET)
            }),
        );

    let app = app.layer(Extension(raffle_service));

    let app = app
        .layer(axum::middleware::from_fn(error_handling_middleware))
        .layer(RequestBodyLimitLayer::new(config.server.body_limit));

    let app = app
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware));

    app.layer(middleware_stack)
}
