use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::TrackerError;
use crate::models::{
    ApiResponse,
    auth::{requests::RegisterRequest, responses::RegisterResponse},
    users::requests::CreateUserRequest,
};
use crate::utils::password::hash_password_blocking;

use super::AuthService;

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config(request)?;

    // 1. 字段校验（邮箱在此转为小写）
    let registration = register_request.validate()?;

    // 2. 检查邮箱是否已存在
    if storage.get_user_by_email(&registration.email).await?.is_some() {
        return Err(TrackerError::conflict("Email already registered").into());
    }

    // 3. 在阻塞线程池中哈希密码
    let password_hash =
        hash_password_blocking(registration.password, config.argon2.clone()).await?;

    // 4. 创建用户（并发注册由唯一索引兜底，同样返回 Conflict）
    let user = storage
        .create_user(CreateUserRequest {
            name: registration.name,
            email: registration.email,
            password_hash,
            role: registration.role,
            dept: registration.dept,
            year: registration.year,
        })
        .await?;

    info!("User {} registered as {}", user.id, user.role);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        RegisterResponse { user_id: user.id },
        "Registered",
    )))
}
