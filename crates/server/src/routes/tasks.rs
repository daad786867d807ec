use axum::{
    extract::{rejection::{JsonRejection, PathRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    Json,
};
use models::task;
use serde::Deserialize;
use service::pagination::Pagination;
use service::task::{CreateTaskInput, TaskQuery, TaskSort, UpdateTaskInput};

use crate::{errors::ApiError, routes::auth::ServerState};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Only tasks with this `done` value
    pub done: Option<bool>,
    /// Page size, 1..=100 (default 20)
    pub limit: Option<u64>,
    /// Rows to skip (default 0)
    pub offset: Option<u64>,
    /// `newest` (default) or `oldest`
    #[param(value_type = Option<String>)]
    pub sort: Option<TaskSort>,
}

impl ListQuery {
    fn into_task_query(self) -> Result<TaskQuery, ApiError> {
        let page = Pagination::new(self.limit, self.offset).map_err(|e| ApiError::from_service("query", e))?;
        Ok(TaskQuery { done: self.done, sort: self.sort.unwrap_or_default(), page })
    }
}

#[utoipa::path(
    get, path = "/tasks", tag = "tasks",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of tasks", body = [crate::openapi::TaskDoc]),
        (status = 422, description = "Invalid query parameters")
    )
)]
pub async fn list_tasks(
    State(state): State<ServerState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<task::Model>>, ApiError> {
    let Query(q) = query?;
    let rows = state.tasks.list(&q.into_task_query()?).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post, path = "/tasks", tag = "tasks",
    request_body = crate::openapi::CreateTaskDoc,
    security(("bearer" = [])),
    responses(
        (status = 201, description = "Created", body = crate::openapi::TaskDoc),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Duplicate title"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn create_task(
    State(state): State<ServerState>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Result<(StatusCode, Json<task::Model>), ApiError> {
    let Json(input) = payload?;
    let created = state.tasks.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/tasks/{id}", tag = "tasks",
    params(("id" = i32, Path, description = "Task ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::TaskDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_task(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<task::Model>, ApiError> {
    let Path(id) = id?;
    Ok(Json(state.tasks.get(id).await?))
}

#[utoipa::path(
    patch, path = "/tasks/{id}", tag = "tasks",
    params(("id" = i32, Path, description = "Task ID")),
    request_body = crate::openapi::UpdateTaskDoc,
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::TaskDoc),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Duplicate title"),
        (status = 422, description = "Validation Error")
    )
)]
pub async fn update_task(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> Result<Json<task::Model>, ApiError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    Ok(Json(state.tasks.update(id, input).await?))
}

#[utoipa::path(
    delete, path = "/tasks/{id}", tag = "tasks",
    params(("id" = i32, Path, description = "Task ID")),
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_task(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.tasks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
