//! 评审实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub faculty_id: i64,
    #[sea_orm(column_type = "Text")]
    pub remarks: String,
    pub marks: i32,
    pub decision: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::FacultyId",
        to = "super::users::Column::Id"
    )]
    Faculty,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Faculty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_review(self) -> crate::models::reviews::entities::Review {
        use crate::models::reviews::entities::{Review, ReviewDecision};
        use crate::models::{ReviewId, SubmissionId, UserId};
        use chrono::{DateTime, Utc};

        Review {
            id: ReviewId(self.id),
            submission_id: SubmissionId(self.submission_id),
            faculty_id: UserId(self.faculty_id),
            remarks: self.remarks,
            marks: self.marks,
            decision: self
                .decision
                .parse::<ReviewDecision>()
                .unwrap_or(ReviewDecision::ResubmissionRequired),
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
