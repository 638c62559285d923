use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::FileService;

// 懒加载的全局 FileService 实例
static FILE_SERVICE: Lazy<FileService> = Lazy::new(FileService::new_lazy);

pub async fn serve_upload(
    request: HttpRequest,
    file_name: web::Path<String>,
) -> ActixResult<HttpResponse> {
    FILE_SERVICE
        .handle_serve(&request, file_name.into_inner())
        .await
}

// 配置路由（公开访问）
pub fn configure_file_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/uploads/{file}", web::get().to(serve_upload));
}
