//! Bearer token authentication extractor.
//!
//! トークンは `Authorization: Bearer <token>` ヘッダー、または `?token=` クエリから読みます
//! （ブラウザの WebSocket はヘッダーを付けられないため）。

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;

use crate::domain::{AuthError, UserId};

use super::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// 認証済みのユーザー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthError::MissingCredential)?;
        let user_id = state.authenticate_usecase.execute(&token).await.map_err(|e| {
            tracing::warn!("Authentication failed for {}: {}", parts.uri.path(), e);
            e
        })?;
        Ok(Self(user_id))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string());
    if from_header.is_some() {
        return from_header;
    }

    Query::<TokenQuery>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(query)| query.token)
}
