use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

use super::SeaOrmStorage;
use super::users::contains_pattern;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{Result, TrackerError};
use crate::models::{
    PageRequest, SubmissionId, UserId,
    submissions::{
        entities::{Submission, SubmissionStatus},
        requests::{CreateSubmission, SubmissionListQuery},
        responses::{SubmissionListItem, SubmissionListResponse},
    },
    users::entities::{FacultySummary, StudentSummary},
};

impl SeaOrmStorage {
    /// 创建提交
    pub async fn create_submission_impl(&self, req: CreateSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();
        let draft = req.draft;

        let model = ActiveModel {
            student_id: Set(req.student_id.get()),
            title: Set(draft.title),
            submission_type: Set(draft.submission_type.to_string()),
            domain: Set(draft.domain),
            company_or_guide: Set(draft.company_or_guide),
            file_path: Set(req.file_path),
            status: Set(SubmissionStatus::Submitted.to_string()),
            assigned_faculty_id: Set(None),
            version: Set(1),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: SubmissionId) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id.get())
            .one(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 分配教师（比较并交换）
    pub async fn assign_submission_impl(
        &self,
        current: &Submission,
        faculty_id: UserId,
    ) -> Result<Option<Submission>> {
        let now = chrono::Utc::now().timestamp();

        let assignee = match current.assigned_faculty_id {
            Some(id) => Column::AssignedFacultyId.eq(id.get()),
            None => Column::AssignedFacultyId.is_null(),
        };

        let result = Submissions::update_many()
            .col_expr(
                Column::Status,
                Expr::value(SubmissionStatus::Assigned.to_string()),
            )
            .col_expr(Column::AssignedFacultyId, Expr::value(faculty_id.get()))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(current.id.get()))
            .filter(Column::Version.eq(current.version))
            .filter(Column::Status.eq(current.status.to_string()))
            .filter(assignee)
            .exec(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("分配教师失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_submission_by_id_impl(current.id).await
    }

    /// 附加学生与教师信息
    pub async fn describe_submission_impl(
        &self,
        submission: Submission,
    ) -> Result<SubmissionListItem> {
        let mut items = self.attach_users(vec![submission]).await?;
        items
            .pop()
            .ok_or_else(|| TrackerError::internal("附加用户信息失败"))
    }

    /// 批量附加关联用户
    async fn attach_users(&self, submissions: Vec<Submission>) -> Result<Vec<SubmissionListItem>> {
        let mut ids: Vec<UserId> = submissions.iter().map(|s| s.student_id).collect();
        ids.extend(submissions.iter().filter_map(|s| s.assigned_faculty_id));
        let users = self.get_users_by_ids_impl(&ids).await?;

        Ok(submissions
            .into_iter()
            .map(|submission| SubmissionListItem {
                student: users.get(&submission.student_id).map(StudentSummary::from),
                assigned_faculty: submission
                    .assigned_faculty_id
                    .and_then(|id| users.get(&id))
                    .map(FacultySummary::from),
                submission,
            })
            .collect())
    }

    /// 分页列出提交
    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
        page: PageRequest,
    ) -> Result<SubmissionListResponse> {
        let mut select = Submissions::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id.get()));
        }

        if let Some(faculty_id) = query.assigned_faculty_id {
            select = select.filter(Column::AssignedFacultyId.eq(faculty_id.get()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(submission_type) = query.submission_type {
            select = select.filter(Column::SubmissionType.eq(submission_type.to_string()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Title.like(contains_pattern(term)))
                    .add(Column::Domain.like(contains_pattern(term)))
                    .add(Column::CompanyOrGuide.like(contains_pattern(term))),
            );
        }

        // 排序
        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        // 分页查询
        let paginator = select.paginate(&self.db, page.limit);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询提交总数失败: {e}")))?;

        let submissions = match page.page_index() {
            Some(index) => paginator
                .fetch_page(index)
                .await
                .map_err(|e| TrackerError::database_operation(format!("查询提交列表失败: {e}")))?,
            None => Vec::new(),
        };

        let submissions = self
            .attach_users(submissions.into_iter().map(|m| m.into_submission()).collect())
            .await?;

        Ok(SubmissionListResponse {
            submissions,
            pagination: page.info(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::submissions::entities::SubmissionType;
    use crate::models::submissions::requests::SubmissionDraft;
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::Storage;

    async fn user(storage: &SeaOrmStorage, name: &str, role: UserRole) -> UserId {
        storage
            .create_user(CreateUserRequest {
                name: name.to_string(),
                email: format!("{}@uni.edu", name.to_lowercase()),
                password_hash: "hash".to_string(),
                role,
                dept: "CSE".to_string(),
                year: "3".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    fn draft(title: &str) -> SubmissionDraft {
        SubmissionDraft {
            title: title.to_string(),
            submission_type: SubmissionType::Project,
            domain: "Systems".to_string(),
            company_or_guide: "Dr. Rao".to_string(),
        }
    }

    async fn submit(storage: &SeaOrmStorage, student: UserId, title: &str) -> Submission {
        storage
            .create_submission(CreateSubmission {
                student_id: student,
                draft: draft(title),
                file_path: "/uploads/x.pdf".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_submission_defaults() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "Alice", UserRole::Student).await;
        let submission = submit(&storage, student, "Compiler").await;

        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.version, 1);
        assert_eq!(submission.assigned_faculty_id, None);
        assert_eq!(submission.student_id, student);
    }

    #[tokio::test]
    async fn test_assign_is_compare_and_swap() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "Alice", UserRole::Student).await;
        let bob = user(&storage, "Bob", UserRole::Faculty).await;
        let carol = user(&storage, "Carol", UserRole::Faculty).await;
        let submission = submit(&storage, student, "Compiler").await;

        let assigned = storage
            .assign_submission(&submission, bob)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(assigned.status, SubmissionStatus::Assigned);
        assert_eq!(assigned.assigned_faculty_id, Some(bob));
        assert_eq!(assigned.version, 1);

        // 基于过期快照的写入失败
        let stale = storage.assign_submission(&submission, carol).await.unwrap();
        assert!(stale.is_none());

        let reassigned = storage
            .assign_submission(&assigned, carol)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reassigned.assigned_faculty_id, Some(carol));
    }

    #[tokio::test]
    async fn test_pagination_past_end() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let student = user(&storage, "Alice", UserRole::Student).await;
        for i in 0..25 {
            submit(&storage, student, &format!("Report {i:02}")).await;
        }

        let query = SubmissionListQuery {
            student_id: Some(student),
            ..Default::default()
        };
        let first = storage
            .list_submissions_with_pagination(query.clone(), PageRequest { page: 1, limit: 10 })
            .await
            .unwrap();
        assert_eq!(first.submissions.len(), 10);
        assert_eq!(first.pagination.pages, 3);
        assert_eq!(first.pagination.total, 25);
        // 最新的在前
        assert_eq!(first.submissions[0].submission.title, "Report 24");
        assert_eq!(
            first.submissions[0].student.as_ref().map(|s| s.name.as_str()),
            Some("Alice")
        );

        let beyond = storage
            .list_submissions_with_pagination(query, PageRequest { page: 4, limit: 10 })
            .await
            .unwrap();
        assert!(beyond.submissions.is_empty());
        assert_eq!(beyond.pagination.total, 25);
    }

    #[tokio::test]
    async fn test_list_filters() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let alice = user(&storage, "Alice", UserRole::Student).await;
        let dan = user(&storage, "Dan", UserRole::Student).await;
        let bob = user(&storage, "Bob", UserRole::Faculty).await;
        let first = submit(&storage, alice, "Compiler backend").await;
        submit(&storage, dan, "Robot arm").await;
        storage.assign_submission(&first, bob).await.unwrap();

        let assigned = storage
            .list_submissions_with_pagination(
                SubmissionListQuery {
                    assigned_faculty_id: Some(bob),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(assigned.submissions.len(), 1);
        assert_eq!(
            assigned.submissions[0]
                .assigned_faculty
                .as_ref()
                .map(|f| f.name.as_str()),
            Some("Bob")
        );

        let searched = storage
            .list_submissions_with_pagination(
                SubmissionListQuery {
                    search: Some("robot".to_string()),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(searched.pagination.total, 1);

        let pending = storage
            .list_submissions_with_pagination(
                SubmissionListQuery {
                    status: Some(SubmissionStatus::Submitted),
                    ..Default::default()
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(pending.submissions[0].submission.title, "Robot arm");
    }
}
