use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FacultyService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, reviews::requests::ReviewListParams};

pub async fn list_reviews(
    service: &FacultyService,
    request: &HttpRequest,
    params: ReviewListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let claim = RequireJWT::current_claim(request)?;
    let page = params.pagination.resolve()?;

    let response = storage.list_reviews_by_faculty(claim.user_id, page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Reviews fetched")))
}
