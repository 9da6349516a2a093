use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{
    auth::{hash_password, verify_password, AuthUser},
    db::is_constraint_violation,
    error::AppError,
    messages,
    models::user::UserPatch,
    state::AppState,
};

#[derive(Deserialize, Debug)]
pub struct PasswordChange {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn me(state: web::Data<AppState>, caller: AuthUser) -> Result<HttpResponse, AppError> {
    let user = state
        .db
        .find_user(caller.id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::USER_NOT_FOUND))?;
    Ok(HttpResponse::Ok().json(user.profile()))
}

pub async fn update(
    state: web::Data<AppState>,
    caller: AuthUser,
    body: web::Json<UserPatch>,
) -> Result<HttpResponse, AppError> {
    // Blank values leave the field untouched
    let patch = UserPatch {
        name: super::required(&body.name).map(str::to_string),
        username: super::required(&body.username).map(str::to_string),
        email: super::required(&body.email).map(str::to_string),
    };

    let user = state
        .db
        .update_user(caller.id, &patch)
        .await
        .map_err(|e| {
            if is_constraint_violation(&e) {
                AppError::bad_request(messages::USERNAME_OR_EMAIL_TAKEN)
            } else {
                AppError::from(e)
            }
        })?
        .ok_or_else(|| AppError::not_found(messages::USER_NOT_FOUND))?;

    info!("[API] User {} updated their profile", user.id);
    Ok(HttpResponse::Ok().json(json!({
        "message": messages::USER_UPDATED,
        "user": user.profile(),
    })))
}

pub async fn change_password(
    state: web::Data<AppState>,
    caller: AuthUser,
    body: web::Json<PasswordChange>,
) -> Result<HttpResponse, AppError> {
    let (Some(current), Some(new)) = (
        body.current_password.as_deref().filter(|p| !p.is_empty()),
        body.new_password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::bad_request(messages::MISSING_FIELDS));
    };

    let user = state
        .db
        .find_user(caller.id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::USER_NOT_FOUND))?;

    if !verify_password(current, &user.password_hash) {
        return Err(AppError::bad_request(messages::INVALID_PASSWORD));
    }
    if new.chars().count() < messages::MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(messages::PASSWORD_TOO_SHORT));
    }

    let password_hash = hash_password(new, state.config.bcrypt_cost)?;
    state.db.set_password_hash(user.id, &password_hash).await?;
    info!("[API] User {} changed their password", user.id);
    Ok(HttpResponse::Ok().json(json!({ "message": messages::PASSWORD_CHANGED })))
}

pub async fn delete_account(
    state: web::Data<AppState>,
    caller: AuthUser,
) -> Result<HttpResponse, AppError> {
    let user = state
        .db
        .find_user(caller.id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::USER_NOT_FOUND))?;

    if user.is_admin {
        return Err(AppError::bad_request(messages::ADMIN_CANNOT_DELETE));
    }

    state.db.delete_user(user.id).await?;
    info!("[API] User {} deleted their own account", user.id);
    Ok(HttpResponse::Ok().json(json!({ "message": messages::USER_DELETED })))
}
