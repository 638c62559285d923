use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;
use crate::models::common::PaginationInfo;
use crate::models::reviews::responses::ReviewListItem;
use crate::models::users::entities::{FacultySummary, StudentSummary};

/// 带关联用户信息的提交
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListItem {
    #[serde(flatten)]
    #[ts(flatten)]
    pub submission: Submission,
    pub student: Option<StudentSummary>,
    pub assigned_faculty: Option<FacultySummary>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionResponse {
    pub submission: Submission,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListResponse {
    pub submissions: Vec<SubmissionListItem>,
    pub pagination: PaginationInfo,
}

/// 学生本人提交及其评审
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct MySubmissionsResponse {
    pub submissions: Vec<SubmissionListItem>,
    pub reviews: Vec<ReviewListItem>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionDetailResponse {
    pub submission: SubmissionListItem,
    pub reviews: Vec<ReviewListItem>,
}
