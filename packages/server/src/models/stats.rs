use serde::Serialize;

#[derive(Serialize, utoipa::ToSchema)]
pub struct TotalResponse {
    #[schema(example = 42)]
    pub total: u64,
}
