use std::collections::HashMap;

use sea_orm::sea_query::LikeExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};

use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, TrackerError};
use crate::models::{
    PageRequest, UserId,
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;

/// `%term%`，通配符已转义
pub(super) fn contains_pattern(term: &str) -> LikeExpr {
    LikeExpr::new(format!("%{}%", escape_like_pattern(term))).escape('\\')
}

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            email: Set(req.email.to_lowercase()),
            password_hash: Set(req.password_hash),
            role: Set(req.role.to_string()),
            dept: Set(req.dept),
            year: Set(req.year),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                TrackerError::conflict("Email already registered")
            } else {
                TrackerError::database_operation(format!("创建用户失败: {e}"))
            }
        })?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: UserId) -> Result<Option<User>> {
        let result = Users::find_by_id(id.get())
            .one(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 批量获取用户
    pub async fn get_users_by_ids_impl(&self, ids: &[UserId]) -> Result<HashMap<UserId, User>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        raw.sort_unstable();
        raw.dedup();

        let users = Users::find()
            .filter(Column::Id.is_in(raw))
            .all(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|m| {
                let user = m.into_user();
                (user.id, user)
            })
            .collect())
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
        page: PageRequest,
    ) -> Result<UserListResponse> {
        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(contains_pattern(term)))
                    .add(Column::Email.like(contains_pattern(&term.to_lowercase())))
                    .add(Column::Dept.like(contains_pattern(term))),
            );
        }

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
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
            .map_err(|e| TrackerError::database_operation(format!("查询用户总数失败: {e}")))?;

        let users = match page.page_index() {
            Some(index) => paginator
                .fetch_page(index)
                .await
                .map_err(|e| TrackerError::database_operation(format!("查询用户列表失败: {e}")))?,
            None => Vec::new(),
        };

        Ok(UserListResponse {
            users: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: page.info(total),
        })
    }

    /// 按角色列出用户（按姓名排序）
    pub async fn list_users_by_role_impl(&self, role: UserRole) -> Result<Vec<User>> {
        let users = Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .order_by_asc(Column::Name)
            .all(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(users.into_iter().map(|m| m.into_user()).collect())
    }

    /// 用户总数
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| TrackerError::database_operation(format!("查询用户总数失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn new_user(name: &str, email: &str, role: UserRole) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
            dept: "CSE".to_string(),
            year: "2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_user_case_insensitive() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let user = storage
            .create_user(new_user("Alice", "Alice@Uni.edu", UserRole::Student))
            .await
            .unwrap();
        assert_eq!(user.email, "alice@uni.edu");

        let found = storage.get_user_by_email("ALICE@uni.EDU").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_user(new_user("Alice", "alice@uni.edu", UserRole::Student))
            .await
            .unwrap();
        let err = storage
            .create_user(new_user("Alicia", "ALICE@uni.edu", UserRole::Faculty))
            .await
            .unwrap_err();
        assert!(matches!(err, TrackerError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_list_users_filters() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .create_user(new_user("Alice", "alice@uni.edu", UserRole::Student))
            .await
            .unwrap();
        storage
            .create_user(new_user("Bob", "bob@uni.edu", UserRole::Faculty))
            .await
            .unwrap();
        storage
            .create_user(new_user("Carol_x", "carol@uni.edu", UserRole::Faculty))
            .await
            .unwrap();

        let faculty = storage
            .list_users_with_pagination(
                UserListQuery {
                    role: Some(UserRole::Faculty),
                    search: None,
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(faculty.pagination.total, 2);

        // `_` 按字面匹配
        let search = storage
            .list_users_with_pagination(
                UserListQuery {
                    role: None,
                    search: Some("l_x".to_string()),
                },
                PageRequest::default(),
            )
            .await
            .unwrap();
        assert_eq!(search.users.len(), 1);
        assert_eq!(search.users[0].name, "Carol_x");

        let by_role = storage.list_users_by_role(UserRole::Faculty).await.unwrap();
        assert_eq!(
            by_role.iter().map(|u| u.name.as_str()).collect::<Vec<_>>(),
            ["Bob", "Carol_x"]
        );
        assert_eq!(storage.count_users().await.unwrap(), 3);
    }
}
