pub mod assign;
pub mod stats;
pub mod submissions;
pub mod users;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::submissions::requests::{AssignFacultyRequest, SubmissionListParams};
use crate::models::users::requests::UserListParams;
use crate::storage::Storage;

use super::SubmissionLifecycle;

pub struct AdminService;

impl AdminService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::storage_from(request)
    }

    // 用户列表
    pub async fn list_users(
        &self,
        request: &HttpRequest,
        params: UserListParams,
    ) -> ActixResult<HttpResponse> {
        users::list_users(self, request, params).await
    }

    // 教师列表（分配下拉框）
    pub async fn list_faculty(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        users::list_faculty(self, request).await
    }

    // 全部提交
    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        params: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, request, params).await
    }

    // 分配教师
    pub async fn assign(
        &self,
        request: &HttpRequest,
        body: AssignFacultyRequest,
    ) -> ActixResult<HttpResponse> {
        let lifecycle = SubmissionLifecycle::new(self.get_storage(request)?);
        assign::assign_faculty(&lifecycle, request, body).await
    }

    // 统计
    pub async fn stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_admin_stats(self, request).await
    }
}
