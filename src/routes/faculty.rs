use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimiters};
use crate::models::reviews::requests::{ReviewListParams, ReviewSubmissionRequest};
use crate::models::submissions::requests::AssignedListParams;
use crate::models::users::entities::UserRole;
use crate::services::FacultyService;

// 懒加载的全局 FacultyService 实例
static FACULTY_SERVICE: Lazy<FacultyService> = Lazy::new(FacultyService::new_lazy);

pub async fn list_assigned(
    req: HttpRequest,
    query: web::Query<AssignedListParams>,
) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE.list_assigned(&req, query.into_inner()).await
}

pub async fn list_reviews(
    req: HttpRequest,
    query: web::Query<ReviewListParams>,
) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE.list_reviews(&req, query.into_inner()).await
}

pub async fn review_submission(
    req: HttpRequest,
    body: web::Json<ReviewSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE.review(&req, body.into_inner()).await
}

pub async fn get_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE.stats(&req).await
}

// 配置路由
pub fn configure_faculty_routes(cfg: &mut web::ServiceConfig, limiters: &RateLimiters) {
    cfg.service(
        web::scope("/api/faculty")
            .wrap(limiters.api.clone())
            .wrap(middlewares::RequireRole::new(UserRole::Faculty))
            .wrap(middlewares::RequireJWT)
            .route("/assigned", web::get().to(list_assigned))
            .route("/reviews", web::get().to(list_reviews))
            .route("/review", web::post().to(review_submission))
            .route("/stats", web::get().to(get_stats)),
    );
}
