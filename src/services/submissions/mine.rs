use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, PaginationQuery,
    submissions::{requests::SubmissionListQuery, responses::MySubmissionsResponse},
};

pub async fn list_my_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    query: PaginationQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let claim = RequireJWT::current_claim(request)?;
    let page = query.resolve()?;

    let listing = storage
        .list_submissions_with_pagination(
            SubmissionListQuery {
                student_id: Some(claim.user_id),
                ..Default::default()
            },
            page,
        )
        .await?;

    // 只取本页提交的评审
    let ids: Vec<_> = listing.submissions.iter().map(|s| s.submission.id).collect();
    let reviews = storage.list_reviews_for_submissions(&ids).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        MySubmissionsResponse {
            submissions: listing.submissions,
            reviews,
            pagination: listing.pagination,
        },
        "Submissions fetched",
    )))
}
