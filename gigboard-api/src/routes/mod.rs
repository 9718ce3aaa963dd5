/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, and current-identity endpoints
/// - `tasks`: Task lifecycle endpoints (create, list, claim, unclaim, delete)

pub mod auth;
pub mod health;
pub mod tasks;
