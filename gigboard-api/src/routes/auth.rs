/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account, returns identity + session token
/// - `POST /auth/login` - Authenticate, returns identity + session token
/// - `GET /auth/me` - Resolve the current session to an identity

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use gigboard_shared::{
    auth::{jwt, middleware::AuthContext, password},
    models::user::{CreateUser, PublicUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique handle
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Unique handle
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password
    pub password: String,
}

/// Identity plus a fresh session token
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Public identity of the account
    pub user: PublicUser,

    /// Signed session token, valid for 30 days
    pub token: String,
}

/// Current-identity response
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Public identity of the account
    pub user: PublicUser,
}

fn issue_token(state: &AppState, user: &User) -> ApiResult<String> {
    let claims = jwt::Claims::new(user.id, user.username.clone());
    Ok(jwt::create_token(&claims, state.jwt_secret())?)
}

/// Register a new user
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {"username": "alice", "email": "alice@example.com", "password": "hunter22!"}
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Username or email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Explicit existence checks; the unique constraints are the backstop
    // for a race between two identical registrations.
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }
    if User::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            avatar: User::default_avatar(&req.username),
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let token = issue_token(&state, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: PublicUser::from(&user),
            token,
        }),
    ))
}

/// Login
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {"username": "alice", "password": "hunter22!"}
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown username or wrong password. The message is
///   identical in both cases so callers cannot probe for account existence.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(&state, &user)?;

    Ok(Json(AuthResponse {
        user: PublicUser::from(&user),
        token,
    }))
}

/// Get the current user
///
/// ```text
/// GET /auth/me
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `404 Not Found`: The account behind the token no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<MeResponse>> {
    let user = User::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(MeResponse {
        user: PublicUser::from(&user),
    }))
}
