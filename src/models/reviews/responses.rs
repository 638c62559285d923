use serde::Serialize;
use ts_rs::TS;

use super::entities::Review;
use crate::models::common::PaginationInfo;
use crate::models::submissions::entities::{SubmissionStatus, SubmissionSummary};
use crate::models::users::entities::FacultySummary;

/// 带评审教师（及提交摘要）的评审
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "review.ts")]
pub struct ReviewListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub review: Review,
    pub faculty: Option<FacultySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub submission: Option<SubmissionSummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "review.ts")]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewListItem>,
    pub pagination: PaginationInfo,
}

/// 评审结果
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "review.ts")]
pub struct ReviewOutcomeResponse {
    pub review: Review,
    pub new_status: SubmissionStatus,
}
