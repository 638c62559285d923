use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, SubmissionId, UserId,
    submissions::{requests::AssignFacultyRequest, responses::SubmissionResponse},
};
use crate::services::SubmissionLifecycle;

pub async fn assign_faculty(
    lifecycle: &SubmissionLifecycle,
    request: &HttpRequest,
    body: AssignFacultyRequest,
) -> ActixResult<HttpResponse> {
    let claim = RequireJWT::current_claim(request)?;
    let (submission_id, faculty_id) = body.validate()?;

    let submission = lifecycle
        .assign(&claim, SubmissionId(submission_id), UserId(faculty_id))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SubmissionResponse { submission },
        "Assigned",
    )))
}
