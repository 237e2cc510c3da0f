//! Identity resolution and authorization middleware
//!
//! The surrounding platform owns login; this core only verifies the bearer
//! token it issued and resolves it to a user row. Room-scoped routes stack
//! a second middleware that checks membership.

use crate::core::{AppError, AppState};
use crate::entities::User;
use crate::repositories::Read;
use axum::extract::State;
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Contents of the session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize, // Expiry time of the token
    pub iat: usize, // Issued at time of the token
    /// The authenticated user's id.
    pub sub: String,
}

#[instrument(skip(secret), fields(user_id = %user_id))]
pub fn encode_token(user_id: &str, secret: &str) -> Result<String, Error> {
    debug!("Encoding session token");
    let now = Utc::now();
    let expire = Duration::hours(24);
    let claims = Claims {
        iat: now.timestamp() as usize,
        exp: (now + expire).timestamp() as usize,
        sub: user_id.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| {
        warn!("Failed to encode session token: {:?}", e);
        Error::new("Error in encoding session token")
    })
}

#[instrument(skip(token, secret))]
pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    decode(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Failed to decode session token: {:?}", e);
        Error::new("Error in decoding session token")
    })
}

/// Resolves the `Authorization: Bearer` header to a `User` and inserts it
/// as a request extension for the handlers downstream.
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            warn!("Missing authorization header");
            AppError::unauthorized("Please add the session token to the header")
        })?
        .to_str()
        .map_err(|_| {
            warn!("Invalid authorization header format");
            AppError::unauthorized("Invalid authorization header")
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| {
            warn!("Authorization header is not a bearer token");
            AppError::unauthorized("Expected a bearer token")
        })?;

    let token_data = decode_token(token, &state.jwt_secret)
        .map_err(|_| AppError::unauthorized("Unable to decode token"))?;

    // The token carries only the user id; the row is the source of truth
    // for name, role and tenant.
    let current_user = state
        .user
        .read(&token_data.claims.sub)
        .await?
        .ok_or_else(|| {
            warn!("Token subject not found in database: {}", token_data.claims.sub);
            AppError::unauthorized("You are not an authorized user")
        })?;

    debug!("User authenticated: {}", current_user.user_id);
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Verifies that the current user participates in the room named in the
/// path and inserts the membership record as an extension.
#[instrument(skip(state, req, next))]
pub async fn room_membership_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    // Must run after authentication_middleware.
    let current_user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| {
            warn!("User not found in request extensions");
            AppError::unauthorized("User not authenticated")
        })?
        .clone();

    // The routes under this middleware are all {room_id}/... — nested
    // under /rooms, which axum strips from the inner URI, so the room id
    // is the first path segment (skipping the prefix if it is present).
    let mut segments = req.uri().path().split('/').filter(|s| !s.is_empty());
    let room_id = match segments.next() {
        Some("rooms") => segments.next(),
        first => first,
    }
    .map(str::to_string)
    .ok_or_else(|| {
        warn!("Room id not found in path: {}", req.uri().path());
        AppError::bad_request("Room id not found in path")
    })?;

    let membership = state
        .participant
        .read(&(current_user.user_id.clone(), room_id.clone()))
        .await?
        .ok_or_else(|| {
            warn!(
                "User {} is not a member of room {}",
                current_user.user_id, room_id
            );
            AppError::forbidden("You are not a member of this room")
        })?;

    debug!(
        "User {} verified as member of room {}",
        current_user.user_id, room_id
    );
    req.extensions_mut().insert(membership);

    Ok(next.run(req).await)
}
