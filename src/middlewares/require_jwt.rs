/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，成功后把 [`AuthClaim`] 写入请求扩展。
 * 不访问存储，完全无状态。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/submissions")
 *     .wrap(RequireRole::new(UserRole::Student))
 *     .wrap(RequireJWT)
 *     .route("/mine", web::get().to(mine_handler))
 * ```
 *
 * ## 失败情形
 *
 * - 缺少或格式错误的请求头: 401 "Token missing"
 * - 签名/过期/类型校验失败，或声明中的角色、用户 ID 非法: 401 "Invalid token"
 * - OPTIONS 预检请求直接返回 204
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{debug, info};

use super::reject;
use crate::config::AppConfig;
use crate::errors::{Result, TrackerError};
use crate::models::auth::AuthClaim;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

// 提取并验证 access token
fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<AuthClaim> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| TrackerError::unauthenticated("Token missing"))?;

    let config = req
        .app_data::<web::Data<AppConfig>>()
        .ok_or_else(|| TrackerError::internal("AppConfig not found in app data"))?;

    let claims = JwtUtils::new(&config.jwt)
        .verify_access_token(token)
        .map_err(|err| {
            info!("JWT token validation failed: {}", err);
            TrackerError::unauthenticated("Invalid token")
        })?;

    AuthClaim::try_from(claims).map_err(|err| {
        info!("JWT claims rejected: {}", err);
        TrackerError::unauthenticated("Invalid token")
    })
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 处理 OPTIONS 请求
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            match extract_and_validate_jwt(&req) {
                Ok(claim) => {
                    debug!("JWT authentication successful for ID: {}", claim.user_id);
                    req.extensions_mut().insert(claim);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(reject(req, err))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取身份
impl RequireJWT {
    /// 从请求扩展中提取身份
    /// 此函数应该在应用了RequireJWT中间件的路由处理程序中使用
    pub fn extract_claim(req: &HttpRequest) -> Option<AuthClaim> {
        req.extensions().get::<AuthClaim>().cloned()
    }

    /// 同上，缺失时返回 Unauthenticated
    pub fn current_claim(req: &HttpRequest) -> Result<AuthClaim> {
        Self::extract_claim(req).ok_or_else(|| TrackerError::unauthenticated("Token missing"))
    }
}
