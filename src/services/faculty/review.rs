use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse,
    reviews::{requests::ReviewSubmissionRequest, responses::ReviewOutcomeResponse},
};
use crate::services::SubmissionLifecycle;

pub async fn review_submission(
    lifecycle: &SubmissionLifecycle,
    request: &HttpRequest,
    body: ReviewSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let claim = RequireJWT::current_claim(request)?;
    let (submission_id, input) = body.validate()?;

    let (review, new_status) = lifecycle.review(&claim, submission_id, input).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ReviewOutcomeResponse { review, new_status },
        "Reviewed",
    )))
}
