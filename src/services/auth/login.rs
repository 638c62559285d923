use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::errors::TrackerError;
use crate::models::{
    ApiResponse,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::utils::jwt::JwtUtils;
use crate::utils::password::{verify_dummy_blocking, verify_password_blocking};

use super::AuthService;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = service.get_config(request)?;

    login_request.validate()?;
    let email = login_request.email.trim().to_lowercase();

    // 1. 根据邮箱获取用户，未知邮箱与错误密码返回同一提示
    //    未知邮箱同样执行一次哈希验证，耗时与错误密码一致
    let Some(user) = storage.get_user_by_email(&email).await? else {
        verify_dummy_blocking(login_request.password, config.argon2.clone()).await?;
        info!("Login failed: unknown email");
        return Err(TrackerError::unauthenticated(INVALID_CREDENTIALS).into());
    };

    // 2. 验证密码
    if !verify_password_blocking(login_request.password, user.password_hash.clone()).await? {
        info!("Login failed: bad password for user {}", user.id);
        return Err(TrackerError::unauthenticated(INVALID_CREDENTIALS).into());
    }

    // 3. 签发访问令牌
    let jwt = JwtUtils::new(&config.jwt);
    let token = jwt
        .generate_access_token(user.id.get(), user.role.as_str(), &user.name)
        .map_err(TrackerError::from)?;

    info!("User {} logged in successfully", user.id);

    let response = LoginResponse {
        token,
        role: user.role,
        name: user.name,
        user_id: user.id,
        expires_in: jwt.expires_in(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}
