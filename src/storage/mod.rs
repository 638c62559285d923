use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    PageRequest, SubmissionId, UserId,
    reviews::{entities::Review, requests::ReviewInput, responses::{ReviewListItem, ReviewListResponse}},
    stats::{AdminStats, FacultyStats},
    submissions::{
        entities::Submission,
        requests::{CreateSubmission, SubmissionListQuery},
        responses::{SubmissionListItem, SubmissionListResponse},
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（邮箱重复返回 Conflict）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: UserId) -> Result<Option<User>>;
    // 通过邮箱获取用户信息（不区分大小写）
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
        page: PageRequest,
    ) -> Result<UserListResponse>;
    // 按角色列出全部用户
    async fn list_users_by_role(&self, role: UserRole) -> Result<Vec<User>>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 提交管理方法
    // 创建提交（状态 Submitted，版本 1）
    async fn create_submission(&self, submission: CreateSubmission) -> Result<Submission>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, id: SubmissionId) -> Result<Option<Submission>>;
    // 附加学生与教师信息
    async fn describe_submission(&self, submission: Submission) -> Result<SubmissionListItem>;
    // 分配教师：仅当 (version, status, assignedFacultyId) 与读取时一致才写入，否则返回 None
    async fn assign_submission(
        &self,
        current: &Submission,
        faculty_id: UserId,
    ) -> Result<Option<Submission>>;
    // 列出提交
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
        page: PageRequest,
    ) -> Result<SubmissionListResponse>;

    /// 评审管理方法
    // 在同一事务内写入评审并推进状态（version 不匹配时回滚并返回 None）
    async fn record_review(
        &self,
        current: &Submission,
        faculty_id: UserId,
        input: ReviewInput,
    ) -> Result<Option<(Review, Submission)>>;
    // 获取若干提交的全部评审
    async fn list_reviews_for_submissions(
        &self,
        submission_ids: &[SubmissionId],
    ) -> Result<Vec<ReviewListItem>>;
    // 列出教师本人的评审
    async fn list_reviews_by_faculty(
        &self,
        faculty_id: UserId,
        page: PageRequest,
    ) -> Result<ReviewListResponse>;

    /// 统计
    async fn get_admin_stats(&self) -> Result<AdminStats>;
    async fn get_faculty_stats(&self, faculty_id: UserId) -> Result<FacultyStats>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
