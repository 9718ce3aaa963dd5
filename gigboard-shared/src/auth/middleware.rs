/// Bearer-token authentication middleware for Axum
///
/// Extracts the session token from the `Authorization: Bearer <token>`
/// header, validates it, and inserts an [`AuthContext`] into the request
/// extensions. If the header is missing or the token is invalid in any way
/// the request is rejected with 401 before the handler runs.
///
/// The middleware is stateless: no session storage exists beyond the token
/// itself.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use gigboard_shared::auth::middleware::{create_session_middleware, AuthContext};
///
/// async fn protected_handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("Hello, {}!", auth.username)
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler))
///     .layer(middleware::from_fn(create_session_middleware("your-jwt-secret")));
/// ```

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::jwt::{validate_token, JwtError};

/// Authenticated identity attached to the request
///
/// Handlers extract it with Axum's `Extension` extractor after the session
/// middleware has run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user ID
    pub user_id: Uuid,

    /// Unique handle of the authenticated user
    pub username: String,
}

/// Error type for the session middleware
///
/// Every variant maps to 401: a missing credential and an invalid one are
/// both "not authenticated" as far as the caller is concerned.
#[derive(Debug)]
pub enum AuthError {
    /// Missing or malformed authorization header
    MissingToken,

    /// Token validation failed
    InvalidToken(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingToken => "Not authorized".to_string(),
            AuthError::InvalidToken(msg) => msg,
        };

        let body = Json(json!({
            "error": "unauthorized",
            "message": message,
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Session authentication middleware
///
/// # Errors
///
/// Returns 401 Unauthorized if:
/// - The Authorization header is missing
/// - The header is not a Bearer token
/// - Token validation fails (bad signature, expired, wrong issuer)
pub async fn session_auth_middleware(
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)?;

    let claims = validate_token(token, &secret).map_err(|e| match e {
        JwtError::Expired => AuthError::InvalidToken("Token expired".to_string()),
        _ => AuthError::InvalidToken("Invalid token".to_string()),
    })?;

    let auth_context = AuthContext {
        user_id: claims.sub,
        username: claims.username,
    };
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}

/// Creates a session middleware closure capturing the signing secret
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use gigboard_shared::auth::middleware::create_session_middleware;
///
/// let app: Router = Router::new()
///     .route("/protected", get(|| async { "OK" }))
///     .layer(middleware::from_fn(create_session_middleware("secret")));
/// ```
pub fn create_session_middleware(
    secret: impl Into<String>,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<
    Box<dyn std::future::Future<Output = Result<Response, AuthError>> + Send>,
> + Clone {
    let secret = secret.into();
    move |req, next| {
        let secret = secret.clone();
        Box::pin(session_auth_middleware(secret, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_are_unauthorized() {
        let response = AuthError::MissingToken.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = AuthError::InvalidToken("Token expired".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
