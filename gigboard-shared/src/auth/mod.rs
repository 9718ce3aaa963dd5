/// Authentication utilities
///
/// This module provides the authentication primitives for gigboard:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token generation and validation
/// - [`middleware`]: Axum middleware enforcing bearer-token auth
///
/// Hashing and token signing are deliberately exposed as pure module-level
/// functions so they can be exercised in tests without a datastore.
///
/// # Example
///
/// ```
/// use gigboard_shared::auth::jwt::{create_token, validate_token, Claims};
/// use gigboard_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "alice".to_string());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(validated.username, "alice");
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
