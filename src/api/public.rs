use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{error::AppError, state::AppState};

pub async fn tips(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let tips = state.db.list_tips().await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "Dicas encontradas", "tips": tips })))
}

pub async fn faqs(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let faqs = state.db.list_faqs().await?;
    Ok(HttpResponse::Ok().json(json!({ "message": "FAQs encontradas", "faqs": faqs })))
}

pub async fn social_media(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let links = state.db.list_social_media().await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Redes sociais encontradas",
        "social_media": links,
    })))
}
