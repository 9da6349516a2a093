use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    auth::AuthUser,
    error::AppError,
    messages,
    moderation::{censor_text, contains_banned_word},
    state::AppState,
};

#[derive(Deserialize, Debug)]
pub struct CommentRequest {
    pub comment: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RatingRequest {
    pub rating: Option<Value>,
}

// Whole numbers from 1 to 5; floats and strings are refused
fn parse_rating(value: Option<&Value>) -> Option<u8> {
    value
        .and_then(Value::as_i64)
        .filter(|r| (1..=5).contains(r))
        .map(|r| r as u8)
}

async fn ensure_product(state: &AppState, product_id: i64) -> Result<(), AppError> {
    match state.db.find_product(product_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found(messages::PRODUCT_NOT_FOUND)),
    }
}

pub async fn list(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let mut entries = state.db.list_comments(path.into_inner()).await?;
    // Comments stored before a word joined the block-list are masked on the way out
    for entry in &mut entries {
        if let Some(comment) = entry.comment.as_mut() {
            *comment = censor_text(comment);
        }
    }
    Ok(HttpResponse::Ok().json(entries))
}

pub async fn create(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<i64>,
    body: web::Json<CommentRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let comment = super::required(&body.comment)
        .ok_or_else(|| AppError::bad_request(messages::COMMENT_REQUIRED))?;

    if contains_banned_word(comment) {
        warn!("[API] Comment from user {} refused by the word filter", caller.id);
        return Err(AppError::bad_request(messages::COMMENT_BANNED));
    }

    ensure_product(&state, product_id).await?;
    let review = state.db.insert_comment(product_id, caller.id, comment).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": messages::REVIEW_SUBMITTED,
        "review": review,
    })))
}

pub async fn delete(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, AppError> {
    let (product_id, review_id) = path.into_inner();
    let review = state
        .db
        .find_review(product_id, review_id)
        .await?
        .ok_or_else(|| AppError::not_found(messages::COMMENT_NOT_FOUND))?;

    if review.user_id != caller.id {
        let is_admin = state
            .db
            .find_user(caller.id)
            .await?
            .is_some_and(|user| user.is_admin);
        if !is_admin {
            return Err(AppError::forbidden(messages::COMMENT_FORBIDDEN));
        }
    }

    state.db.delete_review(review.id).await?;
    info!("[API] User {} deleted review {}", caller.id, review.id);
    Ok(HttpResponse::Ok().json(json!({ "message": messages::REVIEW_DELETED })))
}

pub async fn rate(
    state: web::Data<AppState>,
    caller: AuthUser,
    path: web::Path<i64>,
    body: web::Json<RatingRequest>,
) -> Result<HttpResponse, AppError> {
    let product_id = path.into_inner();
    let rating = parse_rating(body.rating.as_ref())
        .ok_or_else(|| AppError::bad_request(messages::INVALID_RATING))?;

    ensure_product(&state, product_id).await?;
    let created = state.db.upsert_rating(product_id, caller.id, rating).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok(HttpResponse::build(status)
        .json(json!({ "message": messages::RATING_SUBMITTED, "rating": rating })))
}

pub async fn summary(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let summary = state.db.rating_summary(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating(Some(&json!(4))), Some(4));
        assert_eq!(parse_rating(Some(&json!(0))), None);
        assert_eq!(parse_rating(Some(&json!(6))), None);
        assert_eq!(parse_rating(Some(&json!(3.5))), None);
        assert_eq!(parse_rating(Some(&json!("5"))), None);
        assert_eq!(parse_rating(None), None);
    }
}
