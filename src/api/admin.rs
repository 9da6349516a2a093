//! Admin dashboard routes. Statistics, users and social links need an admin;
//! tips and FAQs are reserved for the master admin.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::{auth::create_account, required};
use crate::{
    auth::{AdminUser, MasterAdmin},
    error::AppError,
    messages,
    models::{
        content::{FaqPatch, SocialMediaPatch, TipPatch},
        user::{Registration, UserProfile},
    },
    state::AppState,
};

#[derive(Deserialize, Debug, Default)]
pub struct UserSearch {
    pub search: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct StatusChange {
    pub is_active: Option<bool>,
}

// Dashboard

pub async fn stats(state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
    let stats = state.db.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

pub async fn user_growth(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let growth = state.db.user_growth().await?;
    Ok(HttpResponse::Ok().json(json!({ "growth": growth })))
}

pub async fn product_ratings(
    state: web::Data<AppState>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let ratings = state.db.rating_distribution().await?;
    Ok(HttpResponse::Ok().json(json!({ "ratings": ratings })))
}

// Users

pub async fn list_users(
    state: web::Data<AppState>,
    _admin: AdminUser,
    query: web::Query<UserSearch>,
) -> Result<HttpResponse, AppError> {
    let users: Vec<UserProfile> = state
        .db
        .list_users(query.search.as_deref().map(str::trim))
        .await?
        .iter()
        .map(|user| user.profile())
        .collect();
    Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

pub async fn create_admin(
    state: web::Data<AppState>,
    admin: AdminUser,
    body: web::Json<Registration>,
) -> Result<HttpResponse, AppError> {
    let user = create_account(&state.db, state.config.bcrypt_cost, &body, true).await?;
    info!("[API] Admin {} created admin account {}", admin.0.id, user.id);
    Ok(HttpResponse::Created().json(json!({
        "message": messages::ADMIN_CREATED,
        "user": user.profile(),
    })))
}

pub async fn delete_user(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if user_id == admin.0.id {
        return Err(AppError::forbidden(messages::CANNOT_DELETE_SELF));
    }
    if !state.db.delete_user(user_id).await? {
        return Err(AppError::not_found(messages::USER_NOT_FOUND));
    }
    info!("[API] Admin {} deleted user {}", admin.0.id, user_id);
    Ok(HttpResponse::Ok().json(json!({ "message": messages::USER_DELETED })))
}

pub async fn set_user_status(
    state: web::Data<AppState>,
    admin: AdminUser,
    path: web::Path<i64>,
    body: web::Json<StatusChange>,
) -> Result<HttpResponse, AppError> {
    let user_id = path.into_inner();
    if user_id == admin.0.id {
        return Err(AppError::forbidden(messages::CANNOT_MODIFY_SELF_STATUS));
    }
    let is_active = body
        .is_active
        .ok_or_else(|| AppError::bad_request(messages::MISSING_FIELDS))?;

    let user = state
        .db
        .set_user_active(user_id, is_active)
        .await?
        .ok_or_else(|| AppError::not_found(messages::USER_NOT_FOUND))?;

    info!(
        "[API] Admin {} set user {} active={}",
        admin.0.id, user.id, user.is_active
    );
    Ok(HttpResponse::Ok().json(json!({
        "message": messages::USER_UPDATED,
        "user": user.profile(),
    })))
}

// Tips

pub async fn create_tip(
    state: web::Data<AppState>,
    _master: MasterAdmin,
    body: web::Json<TipPatch>,
) -> Result<HttpResponse, AppError> {
    let title =
        required(&body.title).ok_or_else(|| AppError::bad_request(messages::MISSING_FIELDS))?;
    let tip = state
        .db
        .insert_tip(title, body.content.as_deref(), body.category.as_deref())
        .await?;
    Ok(HttpResponse::Created().json(json!({ "message": "Dica criada com sucesso", "tip": tip })))
}

pub async fn update_tip(
    state: web::Data<AppState>,
    _master: MasterAdmin,
    path: web::Path<i64>,
    body: web::Json<TipPatch>,
) -> Result<HttpResponse, AppError> {
    let tip = state
        .db
        .update_tip(path.into_inner(), &body)
        .await?
        .ok_or_else(|| AppError::not_found(messages::TIP_NOT_FOUND))?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Dica atualizada com sucesso", "tip": tip })))
}

pub async fn delete_tip(
    state: web::Data<AppState>,
    _master: MasterAdmin,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    if !state.db.delete_tip(path.into_inner()).await? {
        return Err(AppError::not_found(messages::TIP_NOT_FOUND));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Dica excluída com sucesso" })))
}

// FAQs

pub async fn create_faq(
    state: web::Data<AppState>,
    _master: MasterAdmin,
    body: web::Json<FaqPatch>,
) -> Result<HttpResponse, AppError> {
    let question =
        required(&body.question).ok_or_else(|| AppError::bad_request(messages::MISSING_FIELDS))?;
    let faq = state.db.insert_faq(question, body.answer.as_deref()).await?;
    Ok(HttpResponse::Created().json(json!({ "message": "FAQ criada com sucesso", "faq": faq })))
}

pub async fn update_faq(
    state: web::Data<AppState>,
    _master: MasterAdmin,
    path: web::Path<i64>,
    body: web::Json<FaqPatch>,
) -> Result<HttpResponse, AppError> {
    let faq = state
        .db
        .update_faq(path.into_inner(), &body)
        .await?
        .ok_or_else(|| AppError::not_found(messages::FAQ_NOT_FOUND))?;
    Ok(HttpResponse::Ok().json(json!({ "message": "FAQ atualizada com sucesso", "faq": faq })))
}

pub async fn delete_faq(
    state: web::Data<AppState>,
    _master: MasterAdmin,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    if !state.db.delete_faq(path.into_inner()).await? {
        return Err(AppError::not_found(messages::FAQ_NOT_FOUND));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "FAQ excluída com sucesso" })))
}

// Social media

pub async fn create_social_media(
    state: web::Data<AppState>,
    _admin: AdminUser,
    body: web::Json<SocialMediaPatch>,
) -> Result<HttpResponse, AppError> {
    let (Some(platform), Some(url)) = (required(&body.platform), required(&body.url)) else {
        return Err(AppError::bad_request(messages::MISSING_FIELDS));
    };
    let link = state.db.insert_social_media(platform, url).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Rede social criada com sucesso",
        "social_media": link,
    })))
}

pub async fn update_social_media(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i64>,
    body: web::Json<SocialMediaPatch>,
) -> Result<HttpResponse, AppError> {
    let link = state
        .db
        .update_social_media(path.into_inner(), &body)
        .await?
        .ok_or_else(|| AppError::not_found(messages::SOCIAL_NOT_FOUND))?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Rede social atualizada com sucesso",
        "social_media": link,
    })))
}

pub async fn delete_social_media(
    state: web::Data<AppState>,
    _admin: AdminUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    if !state.db.delete_social_media(path.into_inner()).await? {
        return Err(AppError::not_found(messages::SOCIAL_NOT_FOUND));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Rede social excluída com sucesso" })))
}
