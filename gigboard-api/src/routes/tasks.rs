/// Task endpoints
///
/// All routes here sit behind the session middleware; the authenticated
/// identity arrives via the `AuthContext` request extension.
///
/// # Endpoints
///
/// - `POST /tasks` - Post a task (caller becomes creator)
/// - `GET /tasks?page&limit` - Paginated list of all tasks
/// - `GET /tasks/my-tasks?page&limit` - Tasks the caller created or claimed
/// - `POST /tasks/:id/claim` - Claim a task
/// - `POST /tasks/:id/unclaim` - Release a claim
/// - `DELETE /tasks/:id` - Delete a task (creator only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use gigboard_shared::{
    auth::middleware::AuthContext,
    models::task::{ClaimOutcome, CreateTask, Task, TaskDetail, UnclaimOutcome},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Default page size when `limit` is not supplied
const DEFAULT_PAGE_SIZE: i64 = 4;

/// Upper bound on `limit` to keep list queries cheap
const MAX_PAGE_SIZE: i64 = 100;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Description
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// Budget, non-negative
    #[validate(range(min = 0.0, message = "Budget must be non-negative"))]
    pub budget: f64,

    /// Deadline
    pub deadline: DateTime<Utc>,
}

/// Pagination query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,

    /// Page size (default 4)
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Resolves the raw query into (page, limit, offset)
    ///
    /// Offset arithmetic saturates so an absurd page number degrades to a
    /// far-past-the-end empty page instead of overflowing.
    fn resolve(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = page.saturating_sub(1).saturating_mul(limit);
        (page, limit, offset)
    }
}

/// Paginated task list response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListResponse {
    /// Tasks on this page, newest first
    pub tasks: Vec<TaskDetail>,

    /// Total number of pages at this page size
    pub total_pages: i64,

    /// The page that was requested
    pub current_page: i64,
}

/// Delete confirmation response
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    /// Confirmation message
    pub message: String,
}

/// ceil(total / limit); zero pages for an empty result set
fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

/// Fetches the joined task shape after a mutation
///
/// The mutation already succeeded; a vanished row here means the task was
/// deleted concurrently, which surfaces as NotFound.
async fn task_detail(state: &AppState, task_id: Uuid) -> ApiResult<TaskDetail> {
    Task::find_detail(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Create a task
///
/// ```text
/// POST /tasks
/// Authorization: Bearer <token>
///
/// {"title": "Fix fence", "description": "...", "budget": 100, "deadline": "2025-01-01T00:00:00Z"}
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Validation failed (e.g., negative budget)
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskDetail>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            created_by: auth.user_id,
            title: req.title,
            description: req.description,
            budget: req.budget,
            deadline: req.deadline,
        },
    )
    .await?;

    let detail = task_detail(&state, task.id).await?;

    Ok((StatusCode::CREATED, Json(detail)))
}

/// List all tasks
///
/// ```text
/// GET /tasks?page=1&limit=4
/// Authorization: Bearer <token>
/// ```
///
/// A page past the end returns an empty list with the same totalPages.
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let (page, limit, offset) = query.resolve();

    let tasks = Task::list(&state.db, limit, offset).await?;
    let total = Task::count(&state.db).await?;

    Ok(Json(TaskListResponse {
        tasks,
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

/// List the caller's tasks (created or claimed)
///
/// ```text
/// GET /tasks/my-tasks?page=1&limit=4
/// Authorization: Bearer <token>
/// ```
pub async fn list_my_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let (page, limit, offset) = query.resolve();

    let tasks = Task::list_mine(&state.db, auth.user_id, limit, offset).await?;
    let total = Task::count_mine(&state.db, auth.user_id).await?;

    Ok(Json(TaskListResponse {
        tasks,
        total_pages: total_pages(total, limit),
        current_page: page,
    }))
}

/// Claim a task
///
/// ```text
/// POST /tasks/:id/claim
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Self-claim or already claimed
/// - `404 Not Found`: No such task
pub async fn claim_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskDetail>> {
    match Task::claim(&state.db, task_id, auth.user_id).await? {
        ClaimOutcome::Claimed(task) => Ok(Json(task_detail(&state, task.id).await?)),
        ClaimOutcome::NotFound => Err(ApiError::NotFound("Task not found".to_string())),
        ClaimOutcome::OwnTask => Err(ApiError::BadRequest(
            "Cannot claim your own task".to_string(),
        )),
        ClaimOutcome::AlreadyClaimed => {
            Err(ApiError::BadRequest("Task already claimed".to_string()))
        }
    }
}

/// Release a claim on a task
///
/// ```text
/// POST /tasks/:id/unclaim
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Task is not claimed
/// - `403 Forbidden`: Claimed by someone else
/// - `404 Not Found`: No such task
pub async fn unclaim_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<TaskDetail>> {
    match Task::unclaim(&state.db, task_id, auth.user_id).await? {
        UnclaimOutcome::Unclaimed(task) => Ok(Json(task_detail(&state, task.id).await?)),
        UnclaimOutcome::NotFound => Err(ApiError::NotFound("Task not found".to_string())),
        UnclaimOutcome::NotClaimed => Err(ApiError::BadRequest("Task is not claimed".to_string())),
        UnclaimOutcome::NotClaimant => Err(ApiError::Forbidden(
            "You did not claim this task".to_string(),
        )),
    }
}

/// Delete a task
///
/// ```text
/// DELETE /tasks/:id
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No such task, or the caller is not the creator. The
///   two cases are indistinguishable by design.
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let deleted = Task::delete_by_creator(&state.db, task_id, auth.user_id).await?;

    if !deleted {
        return Err(ApiError::NotFound(
            "Task not found or you are not the creator".to_string(),
        ));
    }

    Ok(Json(DeleteResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_is_ceiling() {
        assert_eq!(total_pages(0, 4), 0);
        assert_eq!(total_pages(1, 4), 1);
        assert_eq!(total_pages(4, 4), 1);
        assert_eq!(total_pages(5, 4), 2);
        assert_eq!(total_pages(8, 4), 2);
        assert_eq!(total_pages(9, 4), 3);
    }

    #[test]
    fn test_list_query_defaults() {
        let (page, limit, offset) = ListQuery::default().resolve();
        assert_eq!(page, 1);
        assert_eq!(limit, DEFAULT_PAGE_SIZE);
        assert_eq!(offset, 0);
    }

    #[test]
    fn test_list_query_clamps_bad_input() {
        let query = ListQuery {
            page: Some(0),
            limit: Some(-5),
        };
        let (page, limit, offset) = query.resolve();
        assert_eq!(page, 1);
        assert_eq!(limit, 1);
        assert_eq!(offset, 0);

        let query = ListQuery {
            page: Some(3),
            limit: Some(1000),
        };
        let (page, limit, offset) = query.resolve();
        assert_eq!(page, 3);
        assert_eq!(limit, MAX_PAGE_SIZE);
        assert_eq!(offset, 200);
    }

    #[test]
    fn test_list_query_offset_saturates_at_huge_page() {
        let query = ListQuery {
            page: Some(i64::MAX),
            limit: Some(100),
        };
        let (page, limit, offset) = query.resolve();
        assert_eq!(page, i64::MAX);
        assert_eq!(limit, 100);
        // Offset must stay non-negative and must not wrap.
        assert_eq!(offset, i64::MAX);

        let query = ListQuery {
            page: Some(i64::MAX),
            limit: Some(1),
        };
        let (_, _, offset) = query.resolve();
        assert_eq!(offset, i64::MAX - 1);
    }
}
