/// Authentication primitives
///
/// - [`password`]: Argon2id hashing and strength rules
/// - [`jwt`]: HS256 access/refresh tokens carrying the user ID
/// - [`middleware`]: the per-request [`middleware::AuthContext`]
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{issue_token_pair, validate_access_token};
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("kanban2024")?;
/// assert!(verify_password("kanban2024", &hash)?);
///
/// let secret = "a-secret-of-at-least-thirty-two-bytes";
/// let (access, _refresh) = issue_token_pair(Uuid::new_v4(), secret)?;
/// validate_access_token(&access, secret)?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
