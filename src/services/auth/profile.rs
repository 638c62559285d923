use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::TrackerError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, auth::responses::UserInfoResponse};

use super::AuthService;

pub async fn handle_get_user(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let claim = RequireJWT::current_claim(request)?;

    // 令牌有效但用户已不存在
    let user = storage
        .get_user_by_id(claim.user_id)
        .await?
        .ok_or_else(|| TrackerError::unauthenticated("User not found"))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User fetched",
    )))
}
