/// Liveness check.
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    operation_id = "root",
    summary = "Liveness check",
    responses((status = 200, description = "Service is up", body = String)),
)]
pub async fn root() -> &'static str {
    "Hello, World!"
}
