use serde::Deserialize;
use ts_rs::TS;

use super::entities::ReviewDecision;
use crate::errors::Result;
use crate::models::SubmissionId;
use crate::models::common::PaginationQuery;
use crate::utils::validate::{FieldErrors, validate_length};

// 评审请求
#[derive(Debug, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "review.ts")]
pub struct ReviewSubmissionRequest {
    pub submission_id: Option<i64>,
    pub decision: Option<String>,
    /// 整数或数字字符串
    pub marks: Option<serde_json::Value>,
    pub remarks: Option<String>,
}

/// 校验通过的评审内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewInput {
    pub decision: ReviewDecision,
    pub marks: i32,
    pub remarks: String,
}

const MARKS_MESSAGE: &str = "Marks must be an integer between 0 and 100";

fn parse_marks(value: Option<&serde_json::Value>) -> std::result::Result<i32, &'static str> {
    let marks = match value {
        None | Some(serde_json::Value::Null) => return Ok(0),
        Some(serde_json::Value::Number(n)) => n.as_i64().ok_or(MARKS_MESSAGE)?,
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => return Ok(0),
        Some(serde_json::Value::String(s)) => s.trim().parse::<i64>().map_err(|_| MARKS_MESSAGE)?,
        Some(_) => return Err(MARKS_MESSAGE),
    };
    if !(0..=100).contains(&marks) {
        return Err(MARKS_MESSAGE);
    }
    Ok(marks as i32)
}

impl ReviewSubmissionRequest {
    pub fn validate(self) -> Result<(SubmissionId, ReviewInput)> {
        let mut errors = FieldErrors::new();

        if self.submission_id.is_none() {
            errors.push("submissionId", "submissionId is required");
        }

        let decision = match self.decision.as_deref().map(str::trim) {
            Some(raw) => raw.parse::<ReviewDecision>().ok(),
            None => None,
        };
        if decision.is_none() {
            errors.push(
                "decision",
                "Decision must be Approved or Resubmission Required",
            );
        }

        let marks = parse_marks(self.marks.as_ref()).unwrap_or_else(|message| {
            errors.push("marks", message);
            0
        });

        let remarks = self.remarks.unwrap_or_default().trim().to_string();
        errors.check(
            "remarks",
            validate_length(&remarks, 0, 1000, "Remarks must be at most 1000 characters"),
        );
        errors.into_result()?;

        Ok((
            SubmissionId(self.submission_id.unwrap_or_default()),
            ReviewInput {
                decision: decision.unwrap_or(ReviewDecision::Approved),
                marks,
                remarks,
            },
        ))
    }
}

// 教师评审列表查询参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "review.ts")]
pub struct ReviewListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
