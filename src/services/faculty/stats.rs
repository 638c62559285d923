use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FacultyService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, stats::StatsResponse};

pub async fn get_faculty_stats(
    service: &FacultyService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let claim = RequireJWT::current_claim(request)?;
    let stats = storage.get_faculty_stats(claim.user_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StatsResponse { stats },
        "Stats fetched",
    )))
}
