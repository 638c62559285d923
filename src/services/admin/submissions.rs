use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{
    ApiResponse,
    submissions::requests::{SubmissionListParams, SubmissionListQuery},
};

pub async fn list_submissions(
    service: &AdminService,
    request: &HttpRequest,
    params: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let page = params.pagination.resolve()?;

    let query = SubmissionListQuery {
        status: params.status,
        submission_type: params.submission_type,
        search: params.search,
        ..Default::default()
    };
    let response = storage.list_submissions_with_pagination(query, page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Submissions fetched")))
}
