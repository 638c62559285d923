use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimiters};
use crate::models::users::entities::UserRole;
use crate::models::{PaginationQuery, SubmissionId};
use crate::services::SubmissionService;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 上传报告
pub async fn upload_submission(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.upload(&req, payload).await
}

// 我的提交
pub async fn list_my_submissions(
    req: HttpRequest,
    query: web::Query<PaginationQuery>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_mine(&req, query.into_inner()).await
}

// 获取提交详情
pub async fn get_submission(req: HttpRequest, path: web::Path<i64>) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .get_submission(&req, SubmissionId(path.into_inner()))
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig, limiters: &RateLimiters) {
    cfg.service(
        web::scope("/api/submissions")
            .wrap(limiters.api.clone())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/upload")
                    .wrap(middlewares::RequireRole::new(UserRole::Student))
                    .route(web::post().to(upload_submission)),
            )
            .service(
                web::resource("/mine")
                    .wrap(middlewares::RequireRole::new(UserRole::Student))
                    .route(web::get().to(list_my_submissions)),
            )
            .route("/{id}", web::get().to(get_submission)),
    );
}
