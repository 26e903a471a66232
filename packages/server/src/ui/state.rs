//! Shared application state.

use std::{sync::Arc, time::Duration};

use kairo_shared::time::{Clock, SystemClock};

use crate::{
    domain::{
        ChannelRepository, IdentityProvider, MessagePusher, MessageRepository,
        NotificationRepository, PayloadEncoder, UserRepository,
    },
    infrastructure::{
        encoder::JsonPayloadEncoder,
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryChannelRepository, InMemoryMessageRepository, InMemoryNotificationRepository,
            InMemoryUserRepository,
        },
    },
    usecase::{
        AuthenticateUseCase, ChannelMemberUseCase, CloseSessionUseCase, CreateChannelUseCase,
        GetChannelHistoryUseCase, GetDirectHistoryUseCase, GetPresenceUseCase, GetUserUseCase,
        ListChannelsUseCase, ListNotificationsUseCase, MarkNotificationReadUseCase, NotifyUseCase,
        OpenSessionUseCase, RegisterUserUseCase, SearchChannelsUseCase, SendChannelMessageUseCase,
        SendDirectMessageUseCase, UpdateUserUseCase,
    },
};

use super::config::ServerConfig;

/// Shared application state
pub struct AppState {
    pub authenticate_usecase: Arc<AuthenticateUseCase>,
    pub open_session_usecase: Arc<OpenSessionUseCase>,
    pub close_session_usecase: Arc<CloseSessionUseCase>,
    pub send_direct_message_usecase: Arc<SendDirectMessageUseCase>,
    pub send_channel_message_usecase: Arc<SendChannelMessageUseCase>,
    pub register_user_usecase: Arc<RegisterUserUseCase>,
    pub get_user_usecase: Arc<GetUserUseCase>,
    pub update_user_usecase: Arc<UpdateUserUseCase>,
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
    pub create_channel_usecase: Arc<CreateChannelUseCase>,
    pub list_channels_usecase: Arc<ListChannelsUseCase>,
    pub search_channels_usecase: Arc<SearchChannelsUseCase>,
    pub channel_member_usecase: Arc<ChannelMemberUseCase>,
    pub get_channel_history_usecase: Arc<GetChannelHistoryUseCase>,
    pub get_direct_history_usecase: Arc<GetDirectHistoryUseCase>,
    pub notify_usecase: Arc<NotifyUseCase>,
    pub list_notifications_usecase: Arc<ListNotificationsUseCase>,
    pub mark_notification_read_usecase: Arc<MarkNotificationReadUseCase>,
    /// WebSocket への 1 回の書き込みを待つ上限
    pub socket_write_timeout: Duration,
}

/// UseCase が依存する外部協調者
#[derive(Clone)]
pub struct Collaborators {
    pub identity_provider: Arc<dyn IdentityProvider>,
    pub users: Arc<dyn UserRepository>,
    pub channels: Arc<dyn ChannelRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub encoder: Arc<dyn PayloadEncoder>,
    pub message_pusher: Arc<dyn MessagePusher>,
}

impl Collaborators {
    /// インメモリ実装と WebSocket 配送で組み立てる
    pub fn in_memory(config: &ServerConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let users = Arc::new(InMemoryUserRepository::new(clock.clone()));
        let channels = Arc::new(InMemoryChannelRepository::new(clock.clone()));
        let messages = Arc::new(InMemoryMessageRepository::new(channels.clone(), clock.clone()));
        let notifications = Arc::new(InMemoryNotificationRepository::new(clock));

        Self {
            identity_provider: users.clone(),
            users,
            channels,
            messages,
            notifications,
            encoder: Arc::new(JsonPayloadEncoder),
            message_pusher: Arc::new(WebSocketMessagePusher::new(config.dispatch())),
        }
    }
}

impl AppState {
    /// 外部協調者から全 UseCase を組み立てる
    pub fn new(config: &ServerConfig, c: Collaborators) -> Self {
        let echo = config.echo_to_sender;
        Self {
            authenticate_usecase: Arc::new(AuthenticateUseCase::new(c.identity_provider)),
            open_session_usecase: Arc::new(OpenSessionUseCase::new(
                c.message_pusher.clone(),
                config.outbound_buffer,
            )),
            close_session_usecase: Arc::new(CloseSessionUseCase::new(c.message_pusher.clone())),
            send_direct_message_usecase: Arc::new(SendDirectMessageUseCase::new(
                c.users.clone(),
                c.messages.clone(),
                c.encoder.clone(),
                c.message_pusher.clone(),
                echo,
            )),
            send_channel_message_usecase: Arc::new(SendChannelMessageUseCase::new(
                c.channels.clone(),
                c.messages.clone(),
                c.encoder.clone(),
                c.message_pusher.clone(),
                echo,
            )),
            register_user_usecase: Arc::new(RegisterUserUseCase::new(c.users.clone())),
            get_user_usecase: Arc::new(GetUserUseCase::new(
                c.users.clone(),
                c.message_pusher.clone(),
            )),
            update_user_usecase: Arc::new(UpdateUserUseCase::new(c.users.clone())),
            get_presence_usecase: Arc::new(GetPresenceUseCase::new(c.message_pusher.clone())),
            create_channel_usecase: Arc::new(CreateChannelUseCase::new(c.channels.clone())),
            list_channels_usecase: Arc::new(ListChannelsUseCase::new(c.channels.clone())),
            search_channels_usecase: Arc::new(SearchChannelsUseCase::new(c.channels.clone())),
            channel_member_usecase: Arc::new(ChannelMemberUseCase::new(
                c.channels.clone(),
                c.users.clone(),
            )),
            get_channel_history_usecase: Arc::new(GetChannelHistoryUseCase::new(
                c.messages.clone(),
            )),
            get_direct_history_usecase: Arc::new(GetDirectHistoryUseCase::new(c.messages)),
            notify_usecase: Arc::new(NotifyUseCase::new(
                c.channels,
                c.users,
                c.notifications.clone(),
                c.encoder,
                c.message_pusher,
            )),
            list_notifications_usecase: Arc::new(ListNotificationsUseCase::new(
                c.notifications.clone(),
            )),
            mark_notification_read_usecase: Arc::new(MarkNotificationReadUseCase::new(
                c.notifications,
            )),
            socket_write_timeout: config.send_timeout,
        }
    }

    /// インメモリ構成の AppState
    pub fn in_memory(config: &ServerConfig) -> Self {
        Self::new(config, Collaborators::in_memory(config))
    }
}
