use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimiters};
use crate::models::submissions::requests::{AssignFacultyRequest, SubmissionListParams};
use crate::models::users::entities::UserRole;
use crate::models::users::requests::UserListParams;
use crate::services::AdminService;

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_users(&req, query.into_inner()).await
}

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_submissions(&req, query.into_inner()).await
}

pub async fn list_faculty(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_faculty(&req).await
}

pub async fn assign_faculty(
    req: HttpRequest,
    body: web::Json<AssignFacultyRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.assign(&req, body.into_inner()).await
}

pub async fn get_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.stats(&req).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig, limiters: &RateLimiters) {
    cfg.service(
        web::scope("/api/admin")
            .wrap(limiters.api.clone())
            .wrap(middlewares::RequireRole::new(UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .route("/users", web::get().to(list_users))
            .route("/submissions", web::get().to(list_submissions))
            .route("/faculty", web::get().to(list_faculty))
            .route("/assign", web::post().to(assign_faculty))
            .route("/stats", web::get().to(get_stats)),
    );
}
