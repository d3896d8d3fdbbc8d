use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::root))
        .merge(auth_routes())
        .merge(detect_routes(config.server.max_upload_bytes))
        .merge(vehicle_routes())
        .merge(stats_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::logout))
}

fn detect_routes(max_upload_bytes: usize) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::detect::detect))
        .layer(handlers::detect::detect_body_limit(max_upload_bytes))
}

fn vehicle_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::vehicle::get_list))
        .routes(routes!(
            handlers::vehicle::get_detail,
            handlers::vehicle::delete_detail
        ))
}

fn stats_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::stats::total))
        .routes(routes!(handlers::stats::per_region))
        .routes(routes!(handlers::stats::daily))
        .routes(routes!(handlers::stats::monthly))
}
