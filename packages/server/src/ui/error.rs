//! HTTP error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    domain::{AuthError, ValueObjectError},
    infrastructure::dto::http::ErrorResponse,
    usecase::{ChannelError, NotificationError, OpenSessionError, SendMessageError, UserError},
};

/// HTTP API のエラー
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "authentication_failure"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "authorization_failure"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "capacity_exhausted"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        let body = ErrorResponse {
            error: code.to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        Self::Unauthorized(error.to_string())
    }
}

impl From<ValueObjectError> for ApiError {
    fn from(error: ValueObjectError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl From<OpenSessionError> for ApiError {
    fn from(error: OpenSessionError) -> Self {
        match error {
            OpenSessionError::CapacityExhausted { .. } => Self::ServiceUnavailable(error.to_string()),
            OpenSessionError::Registry(_) => Self::Internal(error.to_string()),
        }
    }
}

impl From<SendMessageError> for ApiError {
    fn from(error: SendMessageError) -> Self {
        match error {
            SendMessageError::AuthorizationFailure { .. } => Self::Forbidden(error.to_string()),
            SendMessageError::ChannelNotFound(_) | SendMessageError::ReceiverNotFound(_) => {
                Self::NotFound(error.to_string())
            }
            SendMessageError::Encode(_) | SendMessageError::Repository(_) => {
                Self::Internal(error.to_string())
            }
        }
    }
}

impl From<ChannelError> for ApiError {
    fn from(error: ChannelError) -> Self {
        match error {
            ChannelError::AuthorizationFailure { .. } => Self::Forbidden(error.to_string()),
            ChannelError::ChannelNotFound(_)
            | ChannelError::UserNotFound(_)
            | ChannelError::NotMember { .. } => Self::NotFound(error.to_string()),
            ChannelError::AlreadyMember { .. } | ChannelError::LastAdmin(_) => {
                Self::Conflict(error.to_string())
            }
            ChannelError::Repository(_) => Self::Internal(error.to_string()),
        }
    }
}

impl From<NotificationError> for ApiError {
    fn from(error: NotificationError) -> Self {
        match error {
            NotificationError::AuthorizationFailure { .. } => Self::Forbidden(error.to_string()),
            NotificationError::ChannelNotFound(_)
            | NotificationError::UserNotFound(_)
            | NotificationError::NotFound(_) => Self::NotFound(error.to_string()),
            NotificationError::Encode(_) | NotificationError::Repository(_) => {
                Self::Internal(error.to_string())
            }
        }
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        match error {
            UserError::NotFound(_) => Self::NotFound(error.to_string()),
            UserError::AuthorizationFailure { .. } => Self::Forbidden(error.to_string()),
            UserError::Repository(_) => Self::Internal(error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChannelId, UserId};

    #[test]
    fn test_error_status_mapping() {
        // テスト項目: ユースケースのエラーが対応する HTTP ステータスになる
        // given (前提条件):
        let channel_id = ChannelId::new(1).unwrap();
        let user_id = UserId::new(5).unwrap();
        let cases = vec![
            (ApiError::from(AuthError::InvalidCredential), StatusCode::UNAUTHORIZED),
            (
                ApiError::from(SendMessageError::AuthorizationFailure {
                    channel_id,
                    user_id,
                }),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::from(ChannelError::ChannelNotFound(channel_id)),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(ChannelError::LastAdmin(channel_id)),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(NotificationError::NotFound(3)),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(ValueObjectError::EmptyMessageContent),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::from(OpenSessionError::CapacityExhausted { max: 1 }),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (error, expected) in cases {
            // when (操作):
            let response = error.into_response();

            // then (期待する結果):
            assert_eq!(response.status(), expected);
        }
    }
}
