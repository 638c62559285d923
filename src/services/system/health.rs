use actix_web::{HttpResponse, Result as ActixResult};
use serde::Serialize;
use ts_rs::TS;

/// 健康检查不套统一信封
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "system.ts")]
pub struct HealthResponse {
    pub ok: bool,
    pub message: String,
}

pub async fn handle_health() -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(HealthResponse {
        ok: true,
        message: "Server Running".to_string(),
    }))
}
