pub mod auth;
pub mod common;
pub mod reviews;
pub mod stats;
pub mod submissions;
pub mod users;

pub use common::{
    ApiResponse, FieldError, PageRequest, PaginationInfo, PaginationQuery, ReviewId,
    SubmissionId, UserId,
};
