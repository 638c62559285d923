pub mod ids;
pub mod pagination;
pub mod response;

pub use ids::{ReviewId, SubmissionId, UserId};
pub use pagination::{PageRequest, PaginationInfo, PaginationQuery};
pub use response::{ApiResponse, FieldError};
