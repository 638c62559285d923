pub mod admin;

pub mod auth;

pub mod faculty;

pub mod files;

pub mod submissions;

pub mod system;

pub use admin::configure_admin_routes;
pub use auth::configure_auth_routes;
pub use faculty::configure_faculty_routes;
pub use files::configure_file_routes;
pub use submissions::configure_submission_routes;
pub use system::configure_system_routes;

use actix_web::web;

use crate::config::AppConfig;
use crate::middlewares::RateLimiters;
use crate::utils::{json_error_handler, path_error_handler, query_error_handler};

/// 挂载全部路由与请求体配置
pub fn configure_app(cfg: &mut web::ServiceConfig, config: &AppConfig, limiters: &RateLimiters) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(config.server.limits.max_json_size)
            .error_handler(json_error_handler),
    )
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    .app_data(web::PathConfig::default().error_handler(path_error_handler))
    .app_data(web::PayloadConfig::new(config.server.limits.max_payload_size));

    configure_auth_routes(cfg, limiters);
    configure_submission_routes(cfg, limiters);
    configure_admin_routes(cfg, limiters);
    configure_faculty_routes(cfg, limiters);
    configure_file_routes(cfg);
    configure_system_routes(cfg);
}

#[cfg(test)]
mod tests;
