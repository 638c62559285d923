use serde::Deserialize;
use ts_rs::TS;

use super::entities::{SubmissionStatus, SubmissionType};
use crate::errors::Result;
use crate::models::UserId;
use crate::models::common::PaginationQuery;
use crate::utils::validate::{FieldErrors, validate_length};

/// 上传表单中的文本字段（multipart 收集后校验）
#[derive(Debug, Clone, Default)]
pub struct UploadSubmissionForm {
    pub title: Option<String>,
    pub submission_type: Option<String>,
    pub domain: Option<String>,
    pub company_or_guide: Option<String>,
}

/// 校验通过的提交元数据
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub title: String,
    pub submission_type: SubmissionType,
    pub domain: String,
    pub company_or_guide: String,
}

impl UploadSubmissionForm {
    pub fn validate(self) -> Result<SubmissionDraft> {
        let title = self.title.unwrap_or_default().trim().to_string();
        let raw_type = self.submission_type.unwrap_or_default().trim().to_string();
        let domain = self.domain.unwrap_or_default().trim().to_string();
        let company_or_guide = self.company_or_guide.unwrap_or_default().trim().to_string();

        let mut errors = FieldErrors::new();
        if title.is_empty() {
            errors.push("title", "Title is required");
        } else {
            errors.check(
                "title",
                validate_length(&title, 3, 200, "Title must be 3-200 characters"),
            );
        }

        let submission_type = match raw_type.parse::<SubmissionType>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.push("type", "Type must be internship, project, or research");
                None
            }
        };

        errors.check(
            "domain",
            validate_length(&domain, 0, 100, "Domain must be at most 100 characters"),
        );
        errors.check(
            "companyOrGuide",
            validate_length(
                &company_or_guide,
                0,
                100,
                "Company/Guide must be at most 100 characters",
            ),
        );
        errors.into_result()?;

        Ok(SubmissionDraft {
            title,
            submission_type: submission_type.unwrap_or(SubmissionType::Project),
            domain,
            company_or_guide,
        })
    }
}

/// 存储层创建参数
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub student_id: UserId,
    pub draft: SubmissionDraft,
    pub file_path: String,
}

// 分配教师请求
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "submission.ts")]
pub struct AssignFacultyRequest {
    pub submission_id: Option<i64>,
    pub faculty_id: Option<i64>,
}

impl AssignFacultyRequest {
    pub fn validate(&self) -> Result<(i64, i64)> {
        let mut errors = FieldErrors::new();
        if self.submission_id.is_none() {
            errors.push("submissionId", "submissionId is required");
        }
        if self.faculty_id.is_none() {
            errors.push("facultyId", "facultyId is required");
        }
        errors.into_result()?;
        Ok((
            self.submission_id.unwrap_or_default(),
            self.faculty_id.unwrap_or_default(),
        ))
    }
}

// 管理员提交列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<SubmissionStatus>,
    #[serde(rename = "type")]
    pub submission_type: Option<SubmissionType>,
    pub search: Option<String>,
}

// 教师待审列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub struct AssignedListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<SubmissionStatus>,
}

/// 存储层查询条件
#[derive(Debug, Clone, Default)]
pub struct SubmissionListQuery {
    pub student_id: Option<UserId>,
    pub assigned_faculty_id: Option<UserId>,
    pub status: Option<SubmissionStatus>,
    pub submission_type: Option<SubmissionType>,
    pub search: Option<String>,
}
