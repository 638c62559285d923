pub mod rate_limit;
pub mod require_jwt;
pub mod require_role;

use actix_web::{
    ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};

use crate::errors::TrackerError;

pub use rate_limit::{RateLimit, RateLimiters};
pub use require_jwt::RequireJWT;
pub use require_role::RequireRole;

/// 以统一错误信封短路请求
pub(crate) fn reject<B>(req: ServiceRequest, err: TrackerError) -> ServiceResponse<EitherBody<B>> {
    req.into_response(err.error_response().map_into_right_body())
}
