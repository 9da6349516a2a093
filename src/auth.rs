//! Password hashing, bearer tokens and the request guards built on them.
//!
//! Handlers opt into a tier by taking one of the extractors as an argument:
//! [`AuthUser`] for any logged-in user, [`AdminUser`] for admins and
//! [`MasterAdmin`] for the single configured master admin. [`MaybeUser`]
//! accepts anonymous callers.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, LocalBoxFuture, Ready};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{error::AppError, messages, models::user::User, state::AppState};

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, cost)?)
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    bcrypt::verify(password, password_hash).unwrap_or_else(|e| {
        warn!("[AUTH] Stored password hash could not be checked: {}", e);
        false
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub iat: i64,
    pub exp: i64,
}

/// Signs and verifies HS256 access tokens.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn issue(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing failed: {e}")))
    }

    // Returns the user id carried in the subject
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(|e| {
                debug!("[AUTH] Rejected token: {}", e);
                AppError::unauthorized(messages::NOT_AUTHENTICATED)
            })?;
        data.claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized(messages::NOT_AUTHENTICATED))
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
    req.app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("application state not registered".into()))
}

fn authenticate(req: &HttpRequest) -> Result<i64, AppError> {
    let state = app_state(req)?;
    let token =
        bearer_token(req).ok_or_else(|| AppError::unauthorized(messages::NOT_AUTHENTICATED))?;
    state.tokens.verify(token)
}

/// Any caller holding a valid token.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req).map(|id| AuthUser { id }))
    }
}

/// Optional authentication: a missing or invalid token yields `None`.
#[derive(Debug, Clone, Copy)]
pub struct MaybeUser(pub Option<i64>);

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(MaybeUser(authenticate(req).ok())))
    }
}

/// A caller whose account exists and carries the admin flag.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl FromRequest for AdminUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let identity = authenticate(req).and_then(|id| Ok((id, app_state(req)?)));
        Box::pin(async move {
            let (user_id, state) = identity?;
            match state.db.find_user(user_id).await? {
                Some(user) if user.is_admin => Ok(AdminUser(user)),
                _ => Err(AppError::forbidden(messages::ACCESS_DENIED_ADMIN)),
            }
        })
    }
}

/// The one user allowed to manage tips and FAQs.
#[derive(Debug, Clone, Copy)]
pub struct MasterAdmin {
    pub id: i64,
}

impl FromRequest for MasterAdmin {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = authenticate(req).and_then(|id| {
            let state = app_state(req)?;
            if id == state.config.master_admin_id {
                Ok(MasterAdmin { id })
            } else {
                Err(AppError::forbidden(messages::ACCESS_DENIED_MASTER))
            }
        });
        ready(result)
    }
}
