use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, SubmissionId};

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: SubmissionId,
) -> ActixResult<HttpResponse> {
    let claim = RequireJWT::current_claim(request)?;
    let detail = service.lifecycle(request)?.view(&claim, submission_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "Submission fetched")))
}
