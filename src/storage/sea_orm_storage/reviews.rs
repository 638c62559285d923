use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::SeaOrmStorage;
use crate::entity::reviews::{ActiveModel, Column, Entity as Reviews};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{Result, TrackerError};
use crate::models::{
    PageRequest, SubmissionId, UserId,
    reviews::{
        entities::Review,
        requests::ReviewInput,
        responses::{ReviewListItem, ReviewListResponse},
    },
    submissions::entities::{Submission, SubmissionStatus, SubmissionSummary},
    users::entities::FacultySummary,
};

impl SeaOrmStorage {
    /// 写入评审并推进提交状态
    ///
    /// 提交更新以读取时的 version 与分配教师为条件；条件不成立时整个事务回滚。
    pub async fn record_review_impl(
        &self,
        current: &Submission,
        faculty_id: UserId,
        input: ReviewInput,
    ) -> Result<Option<(Review, Submission)>> {
        let now = chrono::Utc::now().timestamp();
        let status: SubmissionStatus = input.decision.into();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| TrackerError::database_operation(format!("开启事务失败: {e}")))?;

        let updated = Submissions::update_many()
            .col_expr(SubmissionColumn::Status, Expr::value(status.to_string()))
            .col_expr(SubmissionColumn::Version, Expr::value(current.version + 1))
            .col_expr(SubmissionColumn::UpdatedAt, Expr::value(now))
            .filter(SubmissionColumn::Id.eq(current.id.get()))
            .filter(SubmissionColumn::Version.eq(current.version))
            .filter(SubmissionColumn::AssignedFacultyId.eq(faculty_id.get()))
            .exec(&txn)
            .await
            .map_err(|e| TrackerError::database_operation(format!("更新提交状态失败: {e}")))?;

        if updated.rows_affected == 0 {
            txn.rollback()
                .await
                .map_err(|e| TrackerError::database_operation(format!("回滚事务失败: {e}")))?;
            return Ok(None);
        }

        // 每个 (提交, 教师) 只保留一条评审
        let existing = Reviews::find()
            .filter(Column::SubmissionId.eq(current.id.get()))
            .filter(Column::FacultyId.eq(faculty_id.get()))
            .one(&txn)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询评审失败: {e}")))?;

        let review = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.remarks = Set(input.remarks);
                active.marks = Set(input.marks);
                active.decision = Set(input.decision.to_string());
                active.updated_at = Set(now);
                active.update(&txn).await
            }
            None => {
                ActiveModel {
                    submission_id: Set(current.id.get()),
                    faculty_id: Set(faculty_id.get()),
                    remarks: Set(input.remarks),
                    marks: Set(input.marks),
                    decision: Set(input.decision.to_string()),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(|e| TrackerError::database_operation(format!("保存评审失败: {e}")))?;

        let submission = Submissions::find_by_id(current.id.get())
            .one(&txn)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| TrackerError::internal("评审后提交记录丢失"))?;

        txn.commit()
            .await
            .map_err(|e| TrackerError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some((review.into_review(), submission.into_submission())))
    }

    /// 获取若干提交的全部评审（最新在前）
    pub async fn list_reviews_for_submissions_impl(
        &self,
        submission_ids: &[SubmissionId],
    ) -> Result<Vec<ReviewListItem>> {
        if submission_ids.is_empty() {
            return Ok(Vec::new());
        }

        let reviews = Reviews::find()
            .filter(Column::SubmissionId.is_in(submission_ids.iter().map(|id| id.get())))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询评审列表失败: {e}")))?;

        let reviews: Vec<Review> = reviews.into_iter().map(|m| m.into_review()).collect();
        let faculty_ids: Vec<UserId> = reviews.iter().map(|r| r.faculty_id).collect();
        let users = self.get_users_by_ids_impl(&faculty_ids).await?;

        Ok(reviews
            .into_iter()
            .map(|review| ReviewListItem {
                faculty: users.get(&review.faculty_id).map(FacultySummary::from),
                submission: None,
                review,
            })
            .collect())
    }

    /// 分页列出教师本人的评审，附提交摘要
    pub async fn list_reviews_by_faculty_impl(
        &self,
        faculty_id: UserId,
        page: PageRequest,
    ) -> Result<ReviewListResponse> {
        let paginator = Reviews::find()
            .filter(Column::FacultyId.eq(faculty_id.get()))
            .order_by_desc(Column::UpdatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, page.limit);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询评审总数失败: {e}")))?;

        let models = match page.page_index() {
            Some(index) => paginator
                .fetch_page(index)
                .await
                .map_err(|e| TrackerError::database_operation(format!("查询评审列表失败: {e}")))?,
            None => Vec::new(),
        };
        let reviews: Vec<Review> = models.into_iter().map(|m| m.into_review()).collect();

        // 批量加载提交与学生
        let submission_ids: Vec<i64> = reviews.iter().map(|r| r.submission_id.get()).collect();
        let submissions: HashMap<SubmissionId, Submission> = if submission_ids.is_empty() {
            HashMap::new()
        } else {
            Submissions::find()
                .filter(SubmissionColumn::Id.is_in(submission_ids))
                .all(&self.db)
                .await
                .map_err(|e| TrackerError::database_operation(format!("查询提交失败: {e}")))?
                .into_iter()
                .map(|m| {
                    let submission = m.into_submission();
                    (submission.id, submission)
                })
                .collect()
        };

        let mut user_ids: Vec<UserId> = submissions.values().map(|s| s.student_id).collect();
        user_ids.push(faculty_id);
        let users = self.get_users_by_ids_impl(&user_ids).await?;

        let reviews = reviews
            .into_iter()
            .map(|review| {
                let submission = submissions.get(&review.submission_id).map(|s| SubmissionSummary {
                    id: s.id,
                    title: s.title.clone(),
                    submission_type: s.submission_type,
                    student_name: users
                        .get(&s.student_id)
                        .map(|u| u.name.clone())
                        .unwrap_or_default(),
                });
                ReviewListItem {
                    faculty: users.get(&review.faculty_id).map(FacultySummary::from),
                    submission,
                    review,
                }
            })
            .collect();

        Ok(ReviewListResponse {
            reviews,
            pagination: page.info(total),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reviews::entities::ReviewDecision;
    use crate::models::submissions::entities::SubmissionType;
    use crate::models::submissions::requests::{CreateSubmission, SubmissionDraft};
    use crate::models::users::entities::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::Storage;

    struct Fixture {
        storage: SeaOrmStorage,
        faculty: UserId,
        submission: Submission,
    }

    async fn fixture() -> Fixture {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let mut ids = Vec::new();
        for (name, role) in [("Alice", UserRole::Student), ("Bob", UserRole::Faculty)] {
            let user = storage
                .create_user(CreateUserRequest {
                    name: name.to_string(),
                    email: format!("{}@uni.edu", name.to_lowercase()),
                    password_hash: "hash".to_string(),
                    role,
                    dept: String::new(),
                    year: String::new(),
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        let submission = storage
            .create_submission(CreateSubmission {
                student_id: ids[0],
                draft: SubmissionDraft {
                    title: "Compiler".to_string(),
                    submission_type: SubmissionType::Research,
                    domain: String::new(),
                    company_or_guide: String::new(),
                },
                file_path: "/uploads/a.pdf".to_string(),
            })
            .await
            .unwrap();
        let submission = storage
            .assign_submission(&submission, ids[1])
            .await
            .unwrap()
            .unwrap();
        Fixture {
            storage,
            faculty: ids[1],
            submission,
        }
    }

    fn input(decision: ReviewDecision, marks: i32) -> ReviewInput {
        ReviewInput {
            decision,
            marks,
            remarks: format!("marks {marks}"),
        }
    }

    #[tokio::test]
    async fn test_review_upserts_and_bumps_version() {
        let f = fixture().await;

        let (first, after_first) = f
            .storage
            .record_review(&f.submission, f.faculty, input(ReviewDecision::ResubmissionRequired, 40))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after_first.version, 2);
        assert_eq!(after_first.status, SubmissionStatus::ResubmissionRequired);

        let (second, after_second) = f
            .storage
            .record_review(&after_first, f.faculty, input(ReviewDecision::Approved, 85))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after_second.version, 3);
        assert_eq!(after_second.status, SubmissionStatus::Approved);
        assert_eq!(second.id, first.id);
        assert_eq!(second.marks, 85);

        let reviews = f
            .storage
            .list_reviews_for_submissions(&[f.submission.id])
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].review.decision, ReviewDecision::Approved);
        assert_eq!(
            reviews[0].faculty.as_ref().map(|u| u.name.as_str()),
            Some("Bob")
        );
    }

    #[tokio::test]
    async fn test_stale_version_rolls_back() {
        let f = fixture().await;
        f.storage
            .record_review(&f.submission, f.faculty, input(ReviewDecision::Approved, 90))
            .await
            .unwrap()
            .unwrap();

        // 仍持有 version=1 的快照
        let lost = f
            .storage
            .record_review(&f.submission, f.faculty, input(ReviewDecision::ResubmissionRequired, 10))
            .await
            .unwrap();
        assert!(lost.is_none());

        let stored = f
            .storage
            .get_submission_by_id(f.submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.version, 2);
        assert_eq!(stored.status, SubmissionStatus::Approved);

        let reviews = f
            .storage
            .list_reviews_for_submissions(&[f.submission.id])
            .await
            .unwrap();
        assert_eq!(reviews[0].review.marks, 90);
    }

    #[tokio::test]
    async fn test_faculty_review_listing() {
        let f = fixture().await;
        f.storage
            .record_review(&f.submission, f.faculty, input(ReviewDecision::Approved, 70))
            .await
            .unwrap()
            .unwrap();

        let listed = f
            .storage
            .list_reviews_by_faculty(f.faculty, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(listed.pagination.total, 1);
        let summary = listed.reviews[0].submission.as_ref().unwrap();
        assert_eq!(summary.title, "Compiler");
        assert_eq!(summary.student_name, "Alice");
    }
}
