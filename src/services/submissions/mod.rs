pub mod detail;
pub mod mine;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::{PaginationQuery, SubmissionId};
use crate::storage::Storage;

use super::SubmissionLifecycle;

pub struct SubmissionService;

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::storage_from(request)
    }

    pub(crate) fn get_config(&self, request: &HttpRequest) -> Result<web::Data<AppConfig>> {
        super::config_from(request)
    }

    pub(crate) fn lifecycle(&self, request: &HttpRequest) -> Result<SubmissionLifecycle> {
        Ok(SubmissionLifecycle::new(self.get_storage(request)?))
    }

    /// 学生上传报告
    pub async fn upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    /// 学生本人的提交与评审
    pub async fn list_mine(
        &self,
        request: &HttpRequest,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        mine::list_my_submissions(self, request, query).await
    }

    /// 获取提交详情
    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: SubmissionId,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, submission_id).await
    }
}
