//! 提交生命周期
//!
//! 上传、分配、评审与单条查看都经过这里：先做角色与归属检查，
//! 再按状态机求出目标状态，最后以比较并交换的方式写入存储。

use std::sync::Arc;

use tracing::info;

use crate::errors::{Result, TrackerError};
use crate::models::auth::AuthClaim;
use crate::models::reviews::{entities::Review, requests::ReviewInput};
use crate::models::submissions::{
    entities::{LifecycleAction, Submission, SubmissionStatus},
    requests::{CreateSubmission, SubmissionDraft},
    responses::SubmissionDetailResponse,
};
use crate::models::users::entities::UserRole;
use crate::models::{SubmissionId, UserId};
use crate::storage::Storage;

const SUBMISSION_NOT_FOUND: &str = "Submission not found";
const CONCURRENT_UPDATE: &str = "Submission was modified by another request, please retry";

pub struct SubmissionLifecycle {
    storage: Arc<dyn Storage>,
}

impl SubmissionLifecycle {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    async fn load(&self, id: SubmissionId) -> Result<Submission> {
        self.storage
            .get_submission_by_id(id)
            .await?
            .ok_or_else(|| TrackerError::not_found(SUBMISSION_NOT_FOUND))
    }

    fn require_role(actor: &AuthClaim, role: UserRole) -> Result<()> {
        if actor.role == role {
            Ok(())
        } else {
            Err(TrackerError::forbidden("Forbidden: Role mismatch"))
        }
    }

    /// 学生上传；studentId 永远取自身份而非请求体
    pub async fn upload(
        &self,
        actor: &AuthClaim,
        draft: SubmissionDraft,
        file_path: String,
    ) -> Result<Submission> {
        Self::require_role(actor, UserRole::Student)?;

        let submission = self
            .storage
            .create_submission(CreateSubmission {
                student_id: actor.user_id,
                draft,
                file_path,
            })
            .await?;

        info!(
            "Submission {} uploaded by student {}",
            submission.id, actor.user_id
        );
        Ok(submission)
    }

    /// 管理员分配教师
    pub async fn assign(
        &self,
        actor: &AuthClaim,
        submission_id: SubmissionId,
        faculty_id: UserId,
    ) -> Result<Submission> {
        Self::require_role(actor, UserRole::Admin)?;

        match self.storage.get_user_by_id(faculty_id).await? {
            Some(user) if user.role == UserRole::Faculty => {}
            _ => return Err(TrackerError::not_found("Faculty not found")),
        }

        let current = self.load(submission_id).await?;
        if current.status.transition(LifecycleAction::Assign).is_none() {
            return Err(TrackerError::conflict(format!(
                "Cannot assign a submission in status {}",
                current.status
            )));
        }

        // 同一教师重复分配不产生写入
        if current.status == SubmissionStatus::Assigned
            && current.assigned_faculty_id == Some(faculty_id)
        {
            return Ok(current);
        }

        let updated = self
            .storage
            .assign_submission(&current, faculty_id)
            .await?
            .ok_or_else(|| TrackerError::conflict(CONCURRENT_UPDATE))?;

        info!(
            "Submission {} assigned to faculty {} by admin {}",
            updated.id, faculty_id, actor.user_id
        );
        Ok(updated)
    }

    /// 已分配教师评审；返回评审与新状态
    pub async fn review(
        &self,
        actor: &AuthClaim,
        submission_id: SubmissionId,
        input: ReviewInput,
    ) -> Result<(Review, SubmissionStatus)> {
        Self::require_role(actor, UserRole::Faculty)?;

        let current = self.load(submission_id).await?;
        if current.assigned_faculty_id != Some(actor.user_id) {
            return Err(TrackerError::forbidden("Not assigned to you"));
        }

        let target = current
            .status
            .transition(LifecycleAction::Review(input.decision))
            .ok_or_else(|| {
                TrackerError::conflict(format!(
                    "Cannot review a submission in status {}",
                    current.status
                ))
            })?;

        let (review, updated) = self
            .storage
            .record_review(&current, actor.user_id, input)
            .await?
            .ok_or_else(|| TrackerError::conflict(CONCURRENT_UPDATE))?;

        debug_assert_eq!(updated.status, target);
        info!(
            "Submission {} reviewed by faculty {}: {} -> {} (version {})",
            updated.id, actor.user_id, current.status, updated.status, updated.version
        );
        Ok((review, updated.status))
    }

    /// 查看单条提交：学生仅本人，教师仅被分配，管理员不限
    pub async fn view(
        &self,
        actor: &AuthClaim,
        submission_id: SubmissionId,
    ) -> Result<SubmissionDetailResponse> {
        let submission = self.load(submission_id).await?;

        let allowed = match actor.role {
            UserRole::Student => submission.student_id == actor.user_id,
            UserRole::Faculty => submission.assigned_faculty_id == Some(actor.user_id),
            UserRole::Admin => true,
        };
        if !allowed {
            return Err(TrackerError::forbidden("Forbidden"));
        }

        let reviews = self
            .storage
            .list_reviews_for_submissions(&[submission.id])
            .await?;
        let submission = self.storage.describe_submission(submission).await?;

        Ok(SubmissionDetailResponse {
            submission,
            reviews,
        })
    }
}
