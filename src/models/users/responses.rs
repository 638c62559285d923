use serde::Serialize;
use ts_rs::TS;

use super::entities::{FacultySummary, User};
use crate::models::common::PaginationInfo;

// 用户响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserResponse {
    pub user: User,
}

// 用户列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub pagination: PaginationInfo,
}

// 教师列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct FacultyListResponse {
    pub faculty: Vec<FacultySummary>,
}
