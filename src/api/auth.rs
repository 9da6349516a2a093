use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use super::required;
use crate::{
    auth::{hash_password, verify_password},
    db::{is_constraint_violation, Database},
    error::AppError,
    messages,
    models::user::{Registration, User},
    state::AppState,
};

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: Option<String>, // username or email
    pub password: Option<String>,
}

// Validate a registration payload and store the account.
// Shared by self-registration and admin creation.
pub(crate) async fn create_account(
    db: &Database,
    bcrypt_cost: u32,
    registration: &Registration,
    is_admin: bool,
) -> Result<User, AppError> {
    let (Some(username), Some(email), Some(password), Some(name)) = (
        required(&registration.username),
        required(&registration.email),
        registration.password.as_deref().filter(|p| !p.is_empty()),
        required(&registration.name),
    ) else {
        return Err(AppError::bad_request(messages::MISSING_FIELDS));
    };

    if password.chars().count() < messages::MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(messages::PASSWORD_TOO_SHORT));
    }

    let email = email.to_lowercase();
    if let Some(existing) = db.find_user_conflict(username, &email).await? {
        let msg = if existing.username == username {
            messages::USERNAME_EXISTS
        } else {
            messages::EMAIL_EXISTS
        };
        return Err(AppError::bad_request(msg));
    }

    let password_hash = hash_password(password, bcrypt_cost)?;
    db.insert_user(username, &email, &password_hash, name, is_admin)
        .await
        .map_err(|e| {
            if is_constraint_violation(&e) {
                AppError::bad_request(messages::USERNAME_OR_EMAIL_TAKEN)
            } else {
                AppError::from(e)
            }
        })
}

pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<Registration>,
) -> Result<HttpResponse, AppError> {
    let user = create_account(&state.db, state.config.bcrypt_cost, &body, false).await?;
    info!("[API] User registered: {} - {}", user.id, user.username);
    Ok(HttpResponse::Created().json(json!({
        "message": messages::USER_CREATED,
        "user": user.public(),
    })))
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let (Some(identifier), Some(password)) = (
        required(&body.username),
        body.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::bad_request(messages::MISSING_FIELDS));
    };

    let user = match state.db.find_user_by_login(identifier).await? {
        Some(user) if verify_password(password, &user.password_hash) => user,
        _ => {
            warn!("[API] Failed login attempt for '{}'", identifier);
            return Err(AppError::unauthorized(messages::UNAUTHORIZED));
        }
    };

    if !user.is_active {
        info!("[API] Login refused for inactive user {}", user.id);
        return Err(AppError::forbidden(messages::ACCOUNT_INACTIVE));
    }

    let token = state.tokens.issue(user.id)?;
    info!("[API] User logged in: {} - {}", user.id, user.username);
    Ok(HttpResponse::Ok().json(json!({
        "message": messages::LOGIN_SUCCESS,
        "token": token,
        "user": user.profile(),
    })))
}
