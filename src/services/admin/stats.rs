use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{ApiResponse, stats::StatsResponse};

pub async fn get_admin_stats(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let stats = storage.get_admin_stats().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StatsResponse { stats },
        "Stats fetched",
    )))
}
