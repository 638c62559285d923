pub mod admin;
pub mod auth;
pub mod faculty;
pub mod files;
pub mod lifecycle;
pub mod submissions;
pub mod system;

pub use admin::AdminService;
pub use auth::AuthService;
pub use faculty::FacultyService;
pub use files::FileService;
pub use lifecycle::SubmissionLifecycle;
pub use submissions::SubmissionService;
pub use system::SystemService;

use actix_web::{HttpRequest, web};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{Result, TrackerError};
use crate::storage::Storage;

/// 从 app_data 取出存储
pub(crate) fn storage_from(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| TrackerError::internal("Storage not found in app data"))
}

/// 从 app_data 取出配置
pub(crate) fn config_from(request: &HttpRequest) -> Result<web::Data<AppConfig>> {
    request
        .app_data::<web::Data<AppConfig>>()
        .cloned()
        .ok_or_else(|| TrackerError::internal("Config not found in app data"))
}
