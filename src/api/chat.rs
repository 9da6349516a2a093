use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::{auth::MaybeUser, error::AppError, messages, state::AppState};

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    pub message: Option<String>,
}

// Token is optional, only used to tag the log line
pub async fn chat(
    state: web::Data<AppState>,
    caller: MaybeUser,
    body: web::Json<ChatRequest>,
) -> Result<HttpResponse, AppError> {
    let message = super::required(&body.message)
        .ok_or_else(|| AppError::bad_request(messages::MESSAGE_REQUIRED))?;

    match caller.0 {
        Some(user_id) => info!("[API] Chat message from user {}", user_id),
        None => info!("[API] Chat message from anonymous visitor"),
    }

    let reply = state.chatbot.reply(&state.db, message).await;
    Ok(HttpResponse::Ok().json(json!({ "reply": reply })))
}
