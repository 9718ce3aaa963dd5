/// Database models for gigboard
///
/// # Models
///
/// - `user`: Accounts, credentials, and public identity
/// - `task`: Marketplace tasks and their claim lifecycle
///
/// # Example
///
/// ```no_run
/// use gigboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use gigboard_shared::models::user::{CreateUser, User};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         email: "alice@example.com".to_string(),
///         password_hash: "$argon2id$...".to_string(),
///         avatar: User::default_avatar("alice"),
///     },
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
