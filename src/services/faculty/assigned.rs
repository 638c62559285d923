use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FacultyService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    submissions::requests::{AssignedListParams, SubmissionListQuery},
};

pub async fn list_assigned(
    service: &FacultyService,
    request: &HttpRequest,
    params: AssignedListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let claim = RequireJWT::current_claim(request)?;
    let page = params.pagination.resolve()?;

    let query = SubmissionListQuery {
        assigned_faculty_id: Some(claim.user_id),
        status: params.status,
        ..Default::default()
    };
    let response = storage.list_submissions_with_pagination(query, page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Submissions fetched")))
}
