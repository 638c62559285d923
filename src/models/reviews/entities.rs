use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::{ReviewId, SubmissionId, UserId};

// 评审结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "review.ts")]
pub enum ReviewDecision {
    Approved,
    #[serde(rename = "Resubmission Required")]
    ResubmissionRequired,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approved => "Approved",
            ReviewDecision::ResubmissionRequired => "Resubmission Required",
        }
    }
}

impl std::fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" => Ok(ReviewDecision::Approved),
            "Resubmission Required" => Ok(ReviewDecision::ResubmissionRequired),
            _ => Err(format!("Invalid review decision: {s}")),
        }
    }
}

// 评审实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "review.ts")]
pub struct Review {
    pub id: ReviewId,
    pub submission_id: SubmissionId,
    pub faculty_id: UserId,
    pub remarks: String,
    pub marks: i32,
    pub decision: ReviewDecision,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
