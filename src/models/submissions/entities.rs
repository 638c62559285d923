use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::reviews::entities::ReviewDecision;
use crate::models::{SubmissionId, UserId};

// 提交状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionStatus {
    Submitted,
    Assigned,
    Approved,
    #[serde(rename = "Resubmission Required")]
    ResubmissionRequired,
}

/// 驱动状态机的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Assign,
    Review(ReviewDecision),
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "Submitted";
    pub const ASSIGNED: &'static str = "Assigned";
    pub const APPROVED: &'static str = "Approved";
    pub const RESUBMISSION_REQUIRED: &'static str = "Resubmission Required";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::Assigned => Self::ASSIGNED,
            SubmissionStatus::Approved => Self::APPROVED,
            SubmissionStatus::ResubmissionRequired => Self::RESUBMISSION_REQUIRED,
        }
    }

    /// 状态转移表，非法转移返回 None
    ///
    /// Submitted -> Assigned（分配）
    /// Assigned -> Assigned（改派）
    /// Submitted | Assigned | Approved | Resubmission Required -> 评审结论
    pub fn transition(self, action: LifecycleAction) -> Option<SubmissionStatus> {
        use SubmissionStatus::*;

        match (self, action) {
            (Submitted | Assigned, LifecycleAction::Assign) => Some(Assigned),
            (Approved | ResubmissionRequired, LifecycleAction::Assign) => None,
            (_, LifecycleAction::Review(decision)) => Some(decision.into()),
        }
    }
}

impl From<ReviewDecision> for SubmissionStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => SubmissionStatus::Approved,
            ReviewDecision::ResubmissionRequired => SubmissionStatus::ResubmissionRequired,
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            Self::ASSIGNED => Ok(SubmissionStatus::Assigned),
            Self::APPROVED => Ok(SubmissionStatus::Approved),
            Self::RESUBMISSION_REQUIRED => Ok(SubmissionStatus::ResubmissionRequired),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 提交类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "submission.ts")]
pub enum SubmissionType {
    Internship,
    Project,
    Research,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionType::Internship => "internship",
            SubmissionType::Project => "project",
            SubmissionType::Research => "research",
        }
    }
}

impl std::fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internship" => Ok(SubmissionType::Internship),
            "project" => Ok(SubmissionType::Project),
            "research" => Ok(SubmissionType::Research),
            _ => Err(format!("Invalid submission type: {s}")),
        }
    }
}

// 提交实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "submission.ts")]
pub struct Submission {
    pub id: SubmissionId,
    pub student_id: UserId,
    pub title: String,
    #[serde(rename = "type")]
    pub submission_type: SubmissionType,
    pub domain: String,
    pub company_or_guide: String,
    pub file_path: String,
    pub status: SubmissionStatus,
    pub assigned_faculty_id: Option<UserId>,
    pub version: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 列表/详情中嵌入的提交摘要（评审列表使用）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "submission.ts")]
pub struct SubmissionSummary {
    pub id: SubmissionId,
    pub title: String,
    #[serde(rename = "type")]
    pub submission_type: SubmissionType,
    pub student_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionStatus::*;

    #[test]
    fn test_assign_transitions() {
        assert_eq!(Submitted.transition(LifecycleAction::Assign), Some(Assigned));
        assert_eq!(Assigned.transition(LifecycleAction::Assign), Some(Assigned));
        assert_eq!(Approved.transition(LifecycleAction::Assign), None);
        assert_eq!(ResubmissionRequired.transition(LifecycleAction::Assign), None);
    }

    #[test]
    fn test_review_transitions() {
        let approve = LifecycleAction::Review(ReviewDecision::Approved);
        let resubmit = LifecycleAction::Review(ReviewDecision::ResubmissionRequired);
        assert_eq!(Assigned.transition(approve), Some(Approved));
        assert_eq!(Assigned.transition(resubmit), Some(ResubmissionRequired));
        assert_eq!(Approved.transition(resubmit), Some(ResubmissionRequired));
        assert_eq!(ResubmissionRequired.transition(approve), Some(Approved));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(ResubmissionRequired).unwrap(),
            "Resubmission Required"
        );
        assert_eq!(
            "Resubmission Required".parse::<SubmissionStatus>().unwrap(),
            ResubmissionRequired
        );
        for status in [Submitted, Assigned, Approved, ResubmissionRequired] {
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, status.as_str());
        }
    }

    #[test]
    fn test_type_parse() {
        assert_eq!("project".parse::<SubmissionType>().unwrap(), SubmissionType::Project);
        assert!("thesis".parse::<SubmissionType>().is_err());
        assert_eq!(
            serde_json::to_value(SubmissionType::Internship).unwrap(),
            "internship"
        );
    }
}
