//! 提交实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub submission_type: String,
    pub domain: String,
    pub company_or_guide: String,
    pub file_path: String,
    pub status: String,
    pub assigned_faculty_id: Option<i64>,
    pub version: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::StudentId",
        to = "super::users::Column::Id"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AssignedFacultyId",
        to = "super::users::Column::Id"
    )]
    AssignedFaculty,
    #[sea_orm(has_many = "super::reviews::Entity")]
    Reviews,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::reviews::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_submission(self) -> crate::models::submissions::entities::Submission {
        use crate::models::submissions::entities::{Submission, SubmissionStatus, SubmissionType};
        use crate::models::{SubmissionId, UserId};
        use chrono::{DateTime, Utc};

        Submission {
            id: SubmissionId(self.id),
            student_id: UserId(self.student_id),
            title: self.title,
            submission_type: self
                .submission_type
                .parse::<SubmissionType>()
                .unwrap_or(SubmissionType::Project),
            domain: self.domain,
            company_or_guide: self.company_or_guide,
            file_path: self.file_path,
            status: self
                .status
                .parse::<SubmissionStatus>()
                .unwrap_or(SubmissionStatus::Submitted),
            assigned_faculty_id: self.assigned_faculty_id.map(UserId),
            version: self.version,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
