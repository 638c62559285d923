use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::models::{
    ApiResponse,
    users::{
        entities::{FacultySummary, UserRole},
        requests::{UserListParams, UserListQuery},
        responses::FacultyListResponse,
    },
};

pub async fn list_users(
    service: &AdminService,
    request: &HttpRequest,
    params: UserListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let page = params.pagination.resolve()?;

    let query = UserListQuery {
        role: params.role,
        search: params.search,
    };
    let response = storage.list_users_with_pagination(query, page).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Users fetched")))
}

pub async fn list_faculty(
    service: &AdminService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let faculty = storage
        .list_users_by_role(UserRole::Faculty)
        .await?
        .iter()
        .map(FacultySummary::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FacultyListResponse { faculty },
        "Faculty fetched",
    )))
}
