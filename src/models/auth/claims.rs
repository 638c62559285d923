use crate::models::UserId;
use crate::models::users::entities::UserRole;
use crate::utils::jwt::Claims;

/// 已验证的请求身份，由 RequireJWT 写入请求扩展
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthClaim {
    pub user_id: UserId,
    pub role: UserRole,
    pub name: String,
}

impl TryFrom<Claims> for AuthClaim {
    type Error = String;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| format!("Invalid subject: {}", claims.sub))?;
        let role = claims.role.parse::<UserRole>()?;
        Ok(Self {
            user_id: UserId(user_id),
            role,
            name: claims.name,
        })
    }
}
