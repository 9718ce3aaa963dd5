/// Task model and database operations
///
/// Tasks are the unit of work in the marketplace: a creator posts one with
/// a budget and deadline, and another user may claim it. The claim state
/// machine is small:
///
/// ```text
/// open → claimed → open   (claim / unclaim)
/// any  → deleted          (creator only)
/// ```
///
/// Claim, unclaim, and delete are each a single conditional statement
/// against the database. Races between concurrent claimants are resolved
/// by the atomicity of that one UPDATE, never by application-level locks:
/// exactly one of two simultaneous claims can match `is_claimed = FALSE`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL,
///     budget DOUBLE PRECISION NOT NULL,
///     deadline TIMESTAMPTZ NOT NULL,
///     created_by UUID NOT NULL REFERENCES users(id),
///     claimed_by UUID REFERENCES users(id),
///     is_claimed BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task row as stored in the database
///
/// Creator and claimant are bare foreign keys here; reads that cross the
/// API boundary use [`TaskDetail`], which resolves them to [`UserRef`]
/// value objects.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Short human-readable title
    pub title: String,

    /// Full description of the work
    pub description: String,

    /// Offered budget, non-negative
    pub budget: f64,

    /// When the work is due
    pub deadline: DateTime<Utc>,

    /// User who posted the task (immutable)
    pub created_by: Uuid,

    /// User currently claiming the task, if any
    pub claimed_by: Option<Uuid>,

    /// Claim flag, kept consistent with `claimed_by` presence
    pub is_claimed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Minimal public identity of a task party
///
/// A value object resolved by a join at read time, not a live reference to
/// the users table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    /// User ID
    pub id: Uuid,

    /// Unique handle
    pub username: String,

    /// Avatar URL
    pub avatar: String,
}

/// Task with creator and claimant resolved to public identities
///
/// This is the task shape that crosses the API boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDetail {
    /// Unique task ID
    pub id: Uuid,

    /// Short human-readable title
    pub title: String,

    /// Full description of the work
    pub description: String,

    /// Offered budget
    pub budget: f64,

    /// When the work is due
    pub deadline: DateTime<Utc>,

    /// Creator identity
    pub created_by: UserRef,

    /// Claimant identity, if the task is claimed
    pub claimed_by: Option<UserRef>,

    /// Claim flag
    pub is_claimed: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by the detail join, folded into [`TaskDetail`]
#[derive(Debug, sqlx::FromRow)]
struct TaskDetailRow {
    id: Uuid,
    title: String,
    description: String,
    budget: f64,
    deadline: DateTime<Utc>,
    created_by: Uuid,
    creator_username: String,
    creator_avatar: String,
    claimed_by: Option<Uuid>,
    claimant_username: Option<String>,
    claimant_avatar: Option<String>,
    is_claimed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskDetailRow> for TaskDetail {
    fn from(row: TaskDetailRow) -> Self {
        let claimed_by = match (row.claimed_by, row.claimant_username, row.claimant_avatar) {
            (Some(id), Some(username), Some(avatar)) => Some(UserRef {
                id,
                username,
                avatar,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            budget: row.budget,
            deadline: row.deadline,
            created_by: UserRef {
                id: row.created_by,
                username: row.creator_username,
                avatar: row.creator_avatar,
            },
            claimed_by,
            is_claimed: row.is_claimed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// User posting the task
    pub created_by: Uuid,

    /// Title
    pub title: String,

    /// Description
    pub description: String,

    /// Budget, non-negative
    pub budget: f64,

    /// Deadline
    pub deadline: DateTime<Utc>,
}

/// Result of a claim attempt
///
/// A missed conditional update is classified by a follow-up read so the
/// caller can report the right error; the classification read never
/// participates in the mutation itself.
#[derive(Debug)]
pub enum ClaimOutcome {
    /// Claim succeeded; the updated row
    Claimed(Task),

    /// No task with that ID exists
    NotFound,

    /// The caller created this task (self-claim is forbidden regardless of
    /// claim state)
    OwnTask,

    /// Someone already claimed this task
    AlreadyClaimed,
}

/// Result of an unclaim attempt
#[derive(Debug)]
pub enum UnclaimOutcome {
    /// Unclaim succeeded; the updated row
    Unclaimed(Task),

    /// No task with that ID exists
    NotFound,

    /// The task is not currently claimed
    NotClaimed,

    /// The task is claimed, but not by the caller
    NotClaimant,
}

const TASK_COLUMNS: &str = "id, title, description, budget, deadline, created_by, claimed_by, \
                            is_claimed, created_at, updated_at";

/// SELECT list for the detail join; `cu` is the creator, `clu` the claimant
const DETAIL_COLUMNS: &str = "t.id, t.title, t.description, t.budget, t.deadline, \
                              t.created_by, cu.username AS creator_username, cu.avatar AS creator_avatar, \
                              t.claimed_by, clu.username AS claimant_username, clu.avatar AS claimant_avatar, \
                              t.is_claimed, t.created_at, t.updated_at";

impl Task {
    /// Creates a new task, unclaimed, owned by `data.created_by`
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, budget, deadline, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.budget)
        .bind(data.deadline)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task row by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID with creator and claimant resolved
    pub async fn find_detail(pool: &PgPool, id: Uuid) -> Result<Option<TaskDetail>, sqlx::Error> {
        let row = sqlx::query_as::<_, TaskDetailRow>(&format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM tasks t
            JOIN users cu ON cu.id = t.created_by
            LEFT JOIN users clu ON clu.id = t.claimed_by
            WHERE t.id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(TaskDetail::from))
    }

    /// Lists all tasks, newest first, with offset pagination
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskDetailRow>(&format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM tasks t
            JOIN users cu ON cu.id = t.created_by
            LEFT JOIN users clu ON clu.id = t.claimed_by
            ORDER BY t.created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskDetail::from).collect())
    }

    /// Lists tasks where the user is creator or claimant, newest first
    pub async fn list_mine(
        pool: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TaskDetail>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TaskDetailRow>(&format!(
            r#"
            SELECT {DETAIL_COLUMNS}
            FROM tasks t
            JOIN users cu ON cu.id = t.created_by
            LEFT JOIN users clu ON clu.id = t.claimed_by
            WHERE t.created_by = $1 OR t.claimed_by = $1
            ORDER BY t.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        ))
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(TaskDetail::from).collect())
    }

    /// Counts all tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts tasks where the user is creator or claimant
    pub async fn count_mine(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE created_by = $1 OR claimed_by = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }

    /// Claims a task for `user_id`
    ///
    /// The claim itself is one conditional UPDATE: it only matches when the
    /// task is unclaimed and not the caller's own. Two concurrent claims on
    /// the same task cannot both match, so exactly one wins. When the update
    /// matches nothing, the row is read back to classify the failure.
    pub async fn claim(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<ClaimOutcome, sqlx::Error> {
        let updated = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET claimed_by = $2,
                is_claimed = TRUE,
                updated_at = NOW()
            WHERE id = $1 AND is_claimed = FALSE AND created_by <> $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if let Some(task) = updated {
            return Ok(ClaimOutcome::Claimed(task));
        }

        // Self-claim is reported before claim state, matching the rule that
        // a creator can never claim their own task in any state.
        match Self::find_by_id(pool, task_id).await? {
            None => Ok(ClaimOutcome::NotFound),
            Some(task) if task.created_by == user_id => Ok(ClaimOutcome::OwnTask),
            Some(_) => Ok(ClaimOutcome::AlreadyClaimed),
        }
    }

    /// Releases the claim on a task held by `user_id`
    ///
    /// Same pattern as [`Task::claim`]: a single conditional UPDATE that
    /// only matches when the caller is the current claimant, with a
    /// follow-up read to classify a miss.
    pub async fn unclaim(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<UnclaimOutcome, sqlx::Error> {
        let updated = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET claimed_by = NULL,
                is_claimed = FALSE,
                updated_at = NOW()
            WHERE id = $1 AND is_claimed = TRUE AND claimed_by = $2
            RETURNING {TASK_COLUMNS}
            "#,
        ))
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        if let Some(task) = updated {
            return Ok(UnclaimOutcome::Unclaimed(task));
        }

        match Self::find_by_id(pool, task_id).await? {
            None => Ok(UnclaimOutcome::NotFound),
            Some(task) if !task.is_claimed => Ok(UnclaimOutcome::NotClaimed),
            Some(_) => Ok(UnclaimOutcome::NotClaimant),
        }
    }

    /// Deletes a task if and only if `user_id` is its creator
    ///
    /// One atomic check-and-delete. Returns false both when the task does
    /// not exist and when the caller is not the creator; the two cases are
    /// deliberately indistinguishable.
    pub async fn delete_by_creator(
        pool: &PgPool,
        task_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND created_by = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail_row(claimed: bool) -> TaskDetailRow {
        TaskDetailRow {
            id: Uuid::new_v4(),
            title: "Fix the fence".to_string(),
            description: "Back garden, two broken panels".to_string(),
            budget: 100.0,
            deadline: Utc::now(),
            created_by: Uuid::new_v4(),
            creator_username: "alice".to_string(),
            creator_avatar: "https://example.com/a.svg".to_string(),
            claimed_by: claimed.then(Uuid::new_v4),
            claimant_username: claimed.then(|| "bob".to_string()),
            claimant_avatar: claimed.then(|| "https://example.com/b.svg".to_string()),
            is_claimed: claimed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_detail_from_unclaimed_row() {
        let detail = TaskDetail::from(detail_row(false));

        assert_eq!(detail.created_by.username, "alice");
        assert!(detail.claimed_by.is_none());
        assert!(!detail.is_claimed);
    }

    #[test]
    fn test_detail_from_claimed_row() {
        let detail = TaskDetail::from(detail_row(true));

        let claimant = detail.claimed_by.expect("claimant should be resolved");
        assert_eq!(claimant.username, "bob");
        assert!(detail.is_claimed);
    }

    #[test]
    fn test_detail_serializes_camel_case() {
        let detail = TaskDetail::from(detail_row(false));
        let json = serde_json::to_value(&detail).unwrap();

        assert!(json.get("createdBy").is_some());
        assert!(json.get("isClaimed").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json["claimedBy"].is_null());
    }

    // Claim/unclaim/delete semantics are covered by the integration tests
    // in gigboard-api/tests/, which need a live database.
}
