//! Session handling for the admin portal.
//!
//! One session provider, one backing store: [`AuthService`] issues HS256
//! tokens, validates them against an in-process revocation set, and loads
//! the current user from the users table. Signing out revokes the token's
//! id; there is no secondary session state anywhere else in the process.

pub mod user;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier};
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::db::DbPool;
pub use user::Role;

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// User's role
    pub role: Role,
    /// Token id, revoked on sign-out
    pub jti: String,
    /// Issued at (seconds since epoch)
    pub iat: i64,
    /// Expiration (seconds since epoch)
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed credentials")]
    MissingAuth,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token has been revoked")]
    RevokedToken,

    #[error("account is disabled")]
    AccountDisabled,

    #[error("insufficient role")]
    InsufficientRole,

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("internal auth error: {0}")]
    Internal(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingAuth
            | AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::RevokedToken => StatusCode::UNAUTHORIZED,
            AuthError::AccountDisabled | AuthError::InsufficientRole => StatusCode::FORBIDDEN,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(serde_json::json!({
            "error": {
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

/// The authenticated caller, inserted into request extensions by
/// [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub role: Role,
    pub token_id: String,
}

impl AuthSession {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT-backed session provider.
pub struct AuthService {
    db: Arc<DbPool>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
    revoked: Mutex<HashSet<String>>,
}

impl AuthService {
    pub fn new(db: Arc<DbPool>, jwt_secret: &str, token_ttl_secs: usize) -> Self {
        Self {
            db,
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl_secs: token_ttl_secs as i64,
            revoked: Mutex::new(HashSet::new()),
        }
    }

    /// Hashes a password for storage.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Internal(e.to_string()))?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| AuthError::InvalidCredentials)
    }

    /// Verifies credentials and issues a token.
    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<(String, user::Model), AuthError> {
        let account = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&*self.db)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !account.is_active {
            return Err(AuthError::AccountDisabled);
        }
        Self::verify_password(password, &account.password_hash)?;

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: account.id.to_string(),
            role: account.role,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + self.token_ttl_secs,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        Ok((token, account))
    }

    /// Validates a bearer token and returns the session it represents.
    pub fn validate_token(&self, token: &str) -> Result<AuthSession, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| AuthError::InvalidToken)?;
        let claims = data.claims;

        let revoked = self
            .revoked
            .lock()
            .map_err(|_| AuthError::Internal("revocation set poisoned".to_string()))?;
        if revoked.contains(&claims.jti) {
            return Err(AuthError::RevokedToken);
        }

        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AuthError::InvalidToken)?;
        Ok(AuthSession {
            user_id,
            role: claims.role,
            token_id: claims.jti,
        })
    }

    /// Loads the account behind a session, `None` when it no longer
    /// exists or was deactivated.
    pub async fn current_user(
        &self,
        session: &AuthSession,
    ) -> Result<Option<user::Model>, AuthError> {
        let account = user::Entity::find_by_id(session.user_id)
            .one(&*self.db)
            .await?;
        Ok(account.filter(|account| account.is_active))
    }

    /// Revokes the session's token. Idempotent.
    pub fn sign_out(&self, session: &AuthSession) -> Result<(), AuthError> {
        self.revoked
            .lock()
            .map_err(|_| AuthError::Internal("revocation set poisoned".to_string()))?
            .insert(session.token_id.clone());
        Ok(())
    }
}

/// Authenticates the request and stores the [`AuthSession`] in its
/// extensions. The [`AuthService`] itself travels in extensions, injected
/// by an `Extension` layer at router construction.
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "authentication service not available",
            )
                .into_response();
        }
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    let token = match token {
        Some(token) if !token.is_empty() => token,
        _ => return AuthError::MissingAuth.into_response(),
    };

    match auth_service.validate_token(token) {
        Ok(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}

/// Rejects sessions whose role is not in the allowed set. Must run after
/// [`auth_middleware`].
pub async fn role_middleware(
    axum::extract::State(allowed): axum::extract::State<&'static [Role]>,
    request: Request,
    next: Next,
) -> Response {
    match request.extensions().get::<AuthSession>() {
        Some(session) if allowed.contains(&session.role) => next.run(request).await,
        Some(_) => AuthError::InsufficientRole.into_response(),
        None => AuthError::MissingAuth.into_response(),
    }
}

/// Extension methods for Router to add auth middleware
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn require_role(self, allowed: &'static [Role]) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn require_role(self, allowed: &'static [Role]) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            allowed,
            role_middleware,
        ))
        .with_auth()
    }
}

/// Roles allowed on staff surfaces.
pub const BACK_OFFICE: &[Role] = &[Role::Admin, Role::Staff];
/// Roles allowed on admin-only surfaces.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_round_trip() {
        let hash = AuthService::hash_password("hunter2-but-longer").unwrap();
        assert!(AuthService::verify_password("hunter2-but-longer", &hash).is_ok());
        assert!(AuthService::verify_password("wrong", &hash).is_err());
    }

    #[test]
    fn back_office_roles() {
        assert!(Role::Admin.is_back_office());
        assert!(Role::Staff.is_back_office());
        assert!(!Role::Driver.is_back_office());
        assert!(!Role::Customer.is_back_office());
    }
}
