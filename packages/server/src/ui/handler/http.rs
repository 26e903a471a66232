//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{ChannelId, DisplayName, MessageContent, UserId},
    infrastructure::dto::http::{
        AddMemberRequest, ChannelDto, ChannelMemberDto, ChannelMembersDto, CreateChannelRequest,
        CreateNotificationRequest, CreateUserRequest, CreatedUserDto, MessageDto, NotificationDto,
        PresenceDto, SearchChannelsQuery, SendChannelMessageRequest, SendDirectMessageRequest,
        SentMessageDto, SentNotificationDto, UpdateMemberRoleRequest, UpdateUserRequest, UserDto,
    },
    ui::{auth::AuthenticatedUser, error::ApiError, state::AppState},
    usecase::SentMessage,
};

type ApiResult<T> = Result<T, ApiError>;

impl From<SentMessage> for SentMessageDto {
    fn from(sent: SentMessage) -> Self {
        Self {
            message: sent.message.into(),
            delivered: sent.report.delivered,
            unreachable: sent.report.unreachable.iter().map(|id| id.value()).collect(),
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

// ========================================
// Users
// ========================================

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<CreatedUserDto>)> {
    let name = DisplayName::new(request.name)?;
    let created = state
        .register_user_usecase
        .execute(name, request.avatar_url)
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<u64>,
) -> ApiResult<Json<UserDto>> {
    let (user, online) = state
        .get_user_usecase
        .execute(UserId::new(user_id)?)
        .await?;
    Ok(Json(UserDto::new(user, online)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(user_id): Path<u64>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserDto>> {
    let target = UserId::new(user_id)?;
    let name = DisplayName::new(request.name)?;
    let user = state
        .update_user_usecase
        .execute(actor, target, name, request.avatar_url)
        .await?;
    let (_, online) = state.get_user_usecase.execute(target).await?;
    Ok(Json(UserDto::new(user, online)))
}

pub async fn get_presence(State(state): State<Arc<AppState>>) -> Json<PresenceDto> {
    Json(state.get_presence_usecase.execute().into())
}

// ========================================
// Channels
// ========================================

pub async fn create_channel(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(creator): AuthenticatedUser,
    Json(request): Json<CreateChannelRequest>,
) -> ApiResult<(StatusCode, Json<ChannelDto>)> {
    let name = DisplayName::new(request.name)?;
    let channel = state
        .create_channel_usecase
        .execute(creator, name, request.avatar_url)
        .await?;
    Ok((StatusCode::CREATED, Json(channel.into())))
}

pub async fn list_channels(State(state): State<Arc<AppState>>) -> Json<Vec<ChannelDto>> {
    let channels = state.list_channels_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(channels.into_iter().map(ChannelDto::from).collect())
}

pub async fn search_channels(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchChannelsQuery>,
) -> Json<Vec<ChannelDto>> {
    let channels = state.search_channels_usecase.execute(&params.query).await;
    Json(channels.into_iter().map(ChannelDto::from).collect())
}

pub async fn get_channel_members(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<u64>,
) -> ApiResult<Json<ChannelMembersDto>> {
    let channel_id = ChannelId::new(channel_id)?;
    members_response(&state, channel_id).await
}

pub async fn add_channel_member(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path(channel_id): Path<u64>,
    Json(request): Json<AddMemberRequest>,
) -> ApiResult<Json<ChannelMembersDto>> {
    let channel_id = ChannelId::new(channel_id)?;
    let user_id = UserId::new(request.user_id)?;
    state
        .channel_member_usecase
        .add(actor, channel_id, user_id)
        .await?;
    members_response(&state, channel_id).await
}

pub async fn remove_channel_member(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path((channel_id, user_id)): Path<(u64, u64)>,
) -> ApiResult<StatusCode> {
    let channel_id = ChannelId::new(channel_id)?;
    let user_id = UserId::new(user_id)?;
    state
        .channel_member_usecase
        .remove(actor, channel_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_member_role(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Path((channel_id, user_id)): Path<(u64, u64)>,
    Json(request): Json<UpdateMemberRoleRequest>,
) -> ApiResult<Json<ChannelMemberDto>> {
    let channel_id = ChannelId::new(channel_id)?;
    let user_id = UserId::new(user_id)?;
    let member = state
        .channel_member_usecase
        .set_role(actor, channel_id, user_id, request.role)
        .await?;
    Ok(Json(member.into()))
}

async fn members_response(
    state: &AppState,
    channel_id: ChannelId,
) -> ApiResult<Json<ChannelMembersDto>> {
    let members = state.channel_member_usecase.members(channel_id).await?;
    Ok(Json(ChannelMembersDto {
        channel_id: channel_id.value(),
        members: members.into_iter().map(ChannelMemberDto::from).collect(),
    }))
}

// ========================================
// Messages
// ========================================

pub async fn send_channel_message(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(sender): AuthenticatedUser,
    Path(channel_id): Path<u64>,
    Json(request): Json<SendChannelMessageRequest>,
) -> ApiResult<(StatusCode, Json<SentMessageDto>)> {
    let channel_id = ChannelId::new(channel_id)?;
    let content = MessageContent::new(request.content)?;
    let sent = state
        .send_channel_message_usecase
        .execute(sender, channel_id, content, None)
        .await?;
    Ok((StatusCode::CREATED, Json(sent.into())))
}

pub async fn get_channel_messages(
    State(state): State<Arc<AppState>>,
    Path(channel_id): Path<u64>,
) -> ApiResult<Json<Vec<MessageDto>>> {
    let channel_id = ChannelId::new(channel_id)?;
    let history = state.get_channel_history_usecase.execute(channel_id).await?;
    Ok(Json(history.into_iter().map(MessageDto::from).collect()))
}

pub async fn send_direct_message(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(sender): AuthenticatedUser,
    Json(request): Json<SendDirectMessageRequest>,
) -> ApiResult<(StatusCode, Json<SentMessageDto>)> {
    let receiver = UserId::new(request.receiver_id)?;
    let content = MessageContent::new(request.content)?;
    let sent = state
        .send_direct_message_usecase
        .execute(sender, receiver, content, None)
        .await?;
    Ok((StatusCode::CREATED, Json(sent.into())))
}

pub async fn get_direct_messages(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Json<Vec<MessageDto>> {
    let history = state.get_direct_history_usecase.execute(user_id).await;
    Json(history.into_iter().map(MessageDto::from).collect())
}

// ========================================
// Notifications
// ========================================

pub async fn create_notification(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(actor): AuthenticatedUser,
    Json(request): Json<CreateNotificationRequest>,
) -> ApiResult<(StatusCode, Json<SentNotificationDto>)> {
    let user_id = UserId::new(request.user_id)?;
    let channel_id = ChannelId::new(request.channel_id)?;
    let message = MessageContent::new(request.message)?;
    let (notification, report) = state
        .notify_usecase
        .execute(actor, user_id, channel_id, message)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SentNotificationDto {
            notification: notification.into(),
            delivered: report.delivered,
        }),
    ))
}

/// 自分宛ての通知（作成順）
pub async fn list_notifications(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Json<Vec<NotificationDto>> {
    let notifications = state.list_notifications_usecase.execute(user_id).await;
    Json(notifications.into_iter().map(NotificationDto::from).collect())
}

pub async fn mark_notification_read(
    State(state): State<Arc<AppState>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(notification_id): Path<u64>,
) -> ApiResult<Json<NotificationDto>> {
    let notification = state
        .mark_notification_read_usecase
        .execute(user_id, notification_id)
        .await?;
    Ok(Json(notification.into()))
}
