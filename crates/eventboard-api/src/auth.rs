use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::State, http::{HeaderMap, StatusCode}, response::IntoResponse};
use tracing::{info, warn};
use uuid::Uuid;

use eventboard_db::Database;
use eventboard_db::models::{Inserted, NewUser};
use eventboard_types::api::{
    CurrentUserResponse, Envelope, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};
use eventboard_types::models::User;

use crate::error::{AppError, AuthRejection};
use crate::extract::ApiJson;
use crate::middleware::authenticate;
use crate::run_blocking;
use crate::token::TokenService;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenService,
}

/// Treat absent and blank the same way.
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// -- Credential store --

pub fn register_user(db: &Database, req: RegisterRequest) -> Result<User, AppError> {
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        present(req.first_name),
        present(req.last_name),
        present(req.email).map(|e| e.trim().to_string()),
        present(req.password),
    ) else {
        return Err(AppError::validation("All fields are required."));
    };

    if db.get_user_by_email(&email)?.is_some() {
        return Err(AppError::conflict("User with this email already exists."));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {}", e))?
        .to_string();

    let user_id = Uuid::new_v4();
    let id = user_id.to_string();

    let outcome = db.create_user(&NewUser {
        id: &id,
        first_name: &first_name,
        last_name: &last_name,
        email: &email,
        password_hash: &password_hash,
        salt: salt.as_str(),
    })?;
    if outcome == Inserted::Duplicate {
        return Err(AppError::conflict("User with this email already exists."));
    }

    Ok(User {
        user_id,
        first_name,
        last_name,
        email,
    })
}

/// Checks the password, issues a token and records it as the user's
/// session token.
pub fn login_user(
    db: &Database,
    tokens: &TokenService,
    req: LoginRequest,
) -> Result<(String, User), AppError> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::validation("Email and password are required."));
    };

    let row = db
        .get_user_by_email(email.trim())?
        .ok_or(AuthRejection::BadCredentials)?;

    let parsed_hash = PasswordHash::new(&row.password)
        .map_err(|e| anyhow::anyhow!("stored hash for {} is unreadable: {}", row.id, e))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthRejection::BadCredentials)?;

    let row_id = row.id.clone();
    let user = row.into_user()?;
    let token = tokens.issue(user.user_id)?;
    db.set_session_token(&row_id, &token)?;

    Ok((token, user))
}

pub fn current_user(db: &Database, user_id: Uuid) -> Result<User, AppError> {
    let row = db
        .get_user_by_id(&user_id.to_string())?
        .ok_or_else(|| AppError::not_found("User not found."))?;
    Ok(row.into_user()?)
}

// -- Handlers --

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let user = run_blocking(move || register_user(&db.db, req)).await?;

    info!("Registered user {}", user.user_id);
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(RegisterResponse {
            user,
            message: "User registered successfully.".to_string(),
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let db = state.clone();
    let (token, user) = run_blocking(move || login_user(&db.db, &db.tokens, req))
        .await
        .inspect_err(|e| {
            if matches!(e, AppError::Unauthorized(_)) {
                warn!("Failed login attempt");
            }
        })?;

    Ok(Json(Envelope::ok(LoginResponse { token, user })))
}

/// Reads the Authorization header itself rather than sitting behind
/// `require_auth`.
pub async fn me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let claims = authenticate(&headers, &state.tokens)?;

    let db = state.clone();
    let user = run_blocking(move || current_user(&db.db, claims.id)).await?;

    Ok(Json(Envelope::ok(CurrentUserResponse { user })))
}
