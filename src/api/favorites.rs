use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{auth::AuthUser, error::AppError, messages, state::AppState};

#[derive(Deserialize, Debug)]
pub struct FavoriteRequest {
    pub product_id: Option<i64>,
}

pub async fn list(state: web::Data<AppState>, caller: AuthUser) -> Result<HttpResponse, AppError> {
    let products = state.db.favorite_products(caller.id).await?;
    Ok(HttpResponse::Ok().json(json!({ "favorites": products })))
}

pub async fn add(
    state: web::Data<AppState>,
    caller: AuthUser,
    body: web::Json<FavoriteRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = body
        .product_id
        .ok_or_else(|| AppError::bad_request(messages::PRODUCT_ID_REQUIRED))?;

    if state.db.find_product(product_id).await?.is_none() {
        return Err(AppError::not_found(messages::PRODUCT_NOT_FOUND));
    }

    if state.db.add_favorite(caller.id, product_id).await? {
        info!("[API] User {} favorited product {}", caller.id, product_id);
        Ok(HttpResponse::Created().json(json!({ "message": messages::FAVORITE_ADDED })))
    } else {
        Ok(HttpResponse::Ok().json(json!({ "message": messages::FAVORITE_EXISTS })))
    }
}

pub async fn remove(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    if !state.db.remove_favorite(caller.id, product_id).await? {
        return Err(AppError::not_found(messages::FAVORITE_NOT_FOUND));
    }
    info!("[API] User {} unfavorited product {}", caller.id, product_id);
    Ok(HttpResponse::Ok().json(json!({ "message": messages::FAVORITE_REMOVED })))
}
