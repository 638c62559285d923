use serde::Serialize;
use ts_rs::TS;

use crate::models::UserId;
use crate::models::users::entities::{User, UserRole};

#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "auth.ts")]
pub struct RegisterResponse {
    pub user_id: UserId,
}

// 登录响应
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "auth.ts")]
pub struct LoginResponse {
    pub token: String,
    pub role: UserRole,
    pub name: String,
    pub user_id: UserId,
    /// 有效期（秒）
    pub expires_in: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "auth.ts")]
pub struct UserInfoResponse {
    pub user: User,
}
