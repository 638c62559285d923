/*!
 * 速率限制中间件
 *
 * 固定窗口计数：每个键在窗口开始后最多放行 `max_requests` 次，
 * 超出返回 429 并附带 `Retry-After`（窗口剩余秒数）。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * let limiters = RateLimiters::from_config(&config.rate_limit);
 *
 * web::scope("/auth")
 *     .service(
 *         web::resource("/login")
 *             .wrap(limiters.auth.clone())
 *             .route(web::post().to(login_handler)),
 *     )
 * ```
 *
 * ## 限制键
 *
 * - 已认证请求（RequireJWT 之后）使用用户 ID
 * - 其他请求使用客户端 IP
 * - 每个限制器实例持有独立的计数表
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::{HeaderName, HeaderValue, RETRY_AFTER},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::config::RateLimitConfig;
use crate::errors::TrackerError;
use crate::models::auth::AuthClaim;

/// 计数表条目在最后一次写入后保留的时长
const ENTRY_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Copy, Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// 速率限制配置
#[derive(Clone)]
pub struct RateLimit {
    /// 时间窗口内允许的最大请求数
    max_requests: u32,
    /// 时间窗口
    window: Duration,
    /// 限制键前缀（用于区分不同端点）
    key_prefix: String,
    enabled: bool,
    counters: Cache<String, Window>,
}

impl RateLimit {
    /// 创建新的速率限制器
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        let window = Duration::from_secs(window_secs.max(1));
        Self {
            max_requests,
            window,
            key_prefix: String::new(),
            enabled: true,
            counters: Cache::builder()
                .time_to_live(ENTRY_TTL.max(window))
                .max_capacity(100_000)
                .build(),
        }
    }

    /// 设置限制键前缀
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 登录/注册限制（默认 5 次/15 分钟/IP）
    pub fn auth(config: &RateLimitConfig) -> Self {
        Self::new(config.auth_max_requests, config.window_secs)
            .with_prefix("auth")
            .enabled(config.enabled)
    }

    /// 通用 API 限制（默认 100 次/15 分钟/用户）
    pub fn api(config: &RateLimitConfig) -> Self {
        Self::new(config.api_max_requests, config.window_secs)
            .with_prefix("api")
            .enabled(config.enabled)
    }

    /// 记录一次请求；超限时返回需等待的秒数
    async fn hit(&self, key: String) -> Result<u32, u64> {
        let window = self.window;
        let entry = self
            .counters
            .entry(key)
            .and_upsert_with(|existing| {
                let now = Instant::now();
                let next = match existing.map(|e| e.into_value()) {
                    Some(w) if now.duration_since(w.started) < window => Window {
                        started: w.started,
                        count: w.count.saturating_add(1),
                    },
                    _ => Window {
                        started: now,
                        count: 1,
                    },
                };
                std::future::ready(next)
            })
            .await;

        let current = entry.into_value();
        if current.count > self.max_requests {
            let elapsed = Instant::now().duration_since(current.started);
            let retry_after = window.saturating_sub(elapsed).as_secs().max(1);
            Err(retry_after)
        } else {
            Ok(self.max_requests - current.count)
        }
    }
}

/// 按用途划分的限制器（进程内共享计数）
#[derive(Clone)]
pub struct RateLimiters {
    pub auth: RateLimit,
    pub api: RateLimit,
}

impl RateLimiters {
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            auth: RateLimit::auth(config),
            api: RateLimit::api(config),
        }
    }
}

/// 从请求中提取客户端 IP（X-Forwarded-For / Forwarded 优先，其次对端地址）
fn extract_client_ip(req: &ServiceRequest) -> String {
    req.connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            if !limit.enabled {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            // 构建限制键
            // 先释放扩展的借用，connection_info 内部会写扩展
            let user_id = req.extensions().get::<AuthClaim>().map(|claim| claim.user_id);
            let identifier = match user_id {
                Some(id) => format!("user:{id}"),
                None => format!("ip:{}", extract_client_ip(&req)),
            };
            let key = format!("{}:{}", limit.key_prefix, identifier);

            match limit.hit(key.clone()).await {
                Ok(remaining) => {
                    let mut res = srv.call(req).await?;
                    if let Ok(value) = HeaderValue::from_str(&remaining.to_string()) {
                        res.headers_mut()
                            .insert(HeaderName::from_static("x-ratelimit-remaining"), value);
                    }
                    Ok(res.map_into_left_body())
                }
                Err(retry_after) => {
                    warn!("Rate limit exceeded for key: {} (limit {})", key, limit.max_requests);
                    let mut response =
                        TrackerError::rate_limited("Too many requests, please try again later")
                            .error_response();
                    if let Ok(value) = HeaderValue::from_str(&retry_after.to_string()) {
                        response.headers_mut().insert(RETRY_AFTER, value);
                    }
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test, web};

    fn config(max: u32) -> RateLimitConfig {
        RateLimitConfig {
            enabled: true,
            window_secs: 60,
            auth_max_requests: max,
            api_max_requests: 100,
        }
    }

    #[actix_web::test]
    async fn test_presets_follow_config() {
        let cfg = config(5);
        let auth = RateLimit::auth(&cfg);
        assert_eq!(auth.max_requests, 5);
        assert_eq!(auth.key_prefix, "auth");
        assert_eq!(auth.window, Duration::from_secs(60));
        assert_eq!(RateLimit::api(&cfg).max_requests, 100);
    }

    #[actix_web::test]
    async fn test_blocks_after_limit() {
        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(RateLimit::auth(&config(2)))
                    .to(HttpResponse::Ok),
            ),
        )
        .await;

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/login")
                .insert_header(("X-Forwarded-For", "10.0.0.1"))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header(("X-Forwarded-For", "10.0.0.1"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key(RETRY_AFTER));

        // 其他 IP 不受影响
        let req = test::TestRequest::post()
            .uri("/login")
            .insert_header(("X-Forwarded-For", "10.0.0.2"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_disabled_passes_through() {
        let mut cfg = config(1);
        cfg.enabled = false;
        let app = test::init_service(
            App::new().service(
                web::resource("/login")
                    .wrap(RateLimit::auth(&cfg))
                    .to(HttpResponse::Ok),
            ),
        )
        .await;

        for _ in 0..3 {
            let req = test::TestRequest::post().uri("/login").to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }
    }
}
