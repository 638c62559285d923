pub mod assigned;
pub mod review;
pub mod reviews;
pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::reviews::requests::{ReviewListParams, ReviewSubmissionRequest};
use crate::models::submissions::requests::AssignedListParams;
use crate::storage::Storage;

use super::SubmissionLifecycle;

pub struct FacultyService;

impl FacultyService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::storage_from(request)
    }

    // 分配给本人的提交
    pub async fn list_assigned(
        &self,
        request: &HttpRequest,
        params: AssignedListParams,
    ) -> ActixResult<HttpResponse> {
        assigned::list_assigned(self, request, params).await
    }

    // 本人写过的评审
    pub async fn list_reviews(
        &self,
        request: &HttpRequest,
        params: ReviewListParams,
    ) -> ActixResult<HttpResponse> {
        reviews::list_reviews(self, request, params).await
    }

    // 评审提交
    pub async fn review(
        &self,
        request: &HttpRequest,
        body: ReviewSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        let lifecycle = SubmissionLifecycle::new(self.get_storage(request)?);
        review::review_submission(&lifecycle, request, body).await
    }

    // 统计
    pub async fn stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::get_faculty_stats(self, request).await
    }
}
