use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use super::SeaOrmStorage;
use crate::entity::reviews::{Column as ReviewColumn, Entity as Reviews};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, TrackerError};
use crate::models::{
    UserId,
    stats::{AdminStats, FacultyStats, SubmissionStats, UserStats},
    submissions::entities::SubmissionStatus,
    users::entities::UserRole,
};

fn count_error(e: sea_orm::DbErr) -> TrackerError {
    TrackerError::database_operation(format!("统计查询失败: {e}"))
}

impl SeaOrmStorage {
    async fn count_users_with_role(&self, role: UserRole) -> Result<u64> {
        Users::find()
            .filter(UserColumn::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(count_error)
    }

    async fn count_submissions(
        &self,
        status: Option<SubmissionStatus>,
        faculty_id: Option<UserId>,
    ) -> Result<u64> {
        let mut select = Submissions::find();
        if let Some(status) = status {
            select = select.filter(SubmissionColumn::Status.eq(status.to_string()));
        }
        if let Some(faculty_id) = faculty_id {
            select = select.filter(SubmissionColumn::AssignedFacultyId.eq(faculty_id.get()));
        }
        select.count(&self.db).await.map_err(count_error)
    }

    /// 管理员统计
    pub async fn get_admin_stats_impl(&self) -> Result<AdminStats> {
        let users = UserStats {
            total: self.count_users_impl().await?,
            students: self.count_users_with_role(UserRole::Student).await?,
            faculty: self.count_users_with_role(UserRole::Faculty).await?,
            admins: self.count_users_with_role(UserRole::Admin).await?,
        };

        let submissions = SubmissionStats {
            total: self.count_submissions(None, None).await?,
            pending: self
                .count_submissions(Some(SubmissionStatus::Submitted), None)
                .await?,
            assigned: self
                .count_submissions(Some(SubmissionStatus::Assigned), None)
                .await?,
            approved: self
                .count_submissions(Some(SubmissionStatus::Approved), None)
                .await?,
            resubmissions: self
                .count_submissions(Some(SubmissionStatus::ResubmissionRequired), None)
                .await?,
        };

        Ok(AdminStats { users, submissions })
    }

    /// 教师统计
    pub async fn get_faculty_stats_impl(&self, faculty_id: UserId) -> Result<FacultyStats> {
        let me = Some(faculty_id);
        Ok(FacultyStats {
            assigned: self.count_submissions(None, me).await?,
            pending: self
                .count_submissions(Some(SubmissionStatus::Assigned), me)
                .await?,
            approved: self
                .count_submissions(Some(SubmissionStatus::Approved), me)
                .await?,
            resubmissions: self
                .count_submissions(Some(SubmissionStatus::ResubmissionRequired), me)
                .await?,
            reviews: Reviews::find()
                .filter(ReviewColumn::FacultyId.eq(faculty_id.get()))
                .count(&self.db)
                .await
                .map_err(count_error)?,
        })
    }
}
