//! WebSocket session handlers.
//!
//! 1 接続につきタスクを 2 つ動かします。
//!
//! - 受信ループ: クライアントのフレームをパースして送信ユースケースへ渡す
//! - `pusher_loop`: 送信キューとエラー返信を WebSocket に書き込む（唯一の書き手）
//!
//! どちらかが終わるともう一方を止め、セッションを閉じます。
//! セッションは `SessionGuard` の drop で閉じるので、どの経路で抜けても登録解除は 1 回だけです。

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ChannelId, Connection, ConnectionId, ConnectionInbox, MessageContent, UserId,
        ValueObjectError,
    },
    infrastructure::dto::websocket::{ClientFrame, ErrorKind, ServerFrame},
    ui::{auth::AuthenticatedUser, error::ApiError, state::AppState},
    usecase::{CloseSessionUseCase, SendMessageError},
};

/// エラー返信用キューの容量
const REPLY_BUFFER: usize = 16;

/// 開いているセッション。drop 時に必ず閉じる
struct SessionGuard {
    connection: Connection,
    close_session: Arc<CloseSessionUseCase>,
}

impl SessionGuard {
    fn id(&self) -> ConnectionId {
        self.connection.id()
    }

    fn user_id(&self) -> UserId {
        self.connection.user_id()
    }

    fn take_inbox(&mut self) -> Option<ConnectionInbox> {
        self.connection.take_inbox()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.close_session.execute(&mut self.connection);
    }
}

pub async fn websocket_handler(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    // アップグレード前に登録し、上限超過は 503 で返す
    let connection = state.open_session_usecase.execute(user_id).map_err(|e| {
        tracing::warn!("Rejecting connection for user {}: {}", user_id, e);
        e
    })?;
    let session = SessionGuard {
        connection,
        close_session: state.close_session_usecase.clone(),
    };

    // アップグレードに失敗した場合はクロージャごと session が drop されて閉じる
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, session)))
}

/// Spawns the single writer task of this connection.
///
/// Drains the connection's outbound queue (messages from other senders) and the
/// reply queue (errors for this connection only) into the WebSocket sink. Ends
/// when the connection is evicted, its queue closes, or the socket fails.
///
/// 1 回の書き込みは `write_timeout` までしか待たず、書き込み中でも切断通知で抜けます。
fn pusher_loop(
    mut inbox: ConnectionInbox,
    mut replies: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
    write_timeout: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let payload = tokio::select! {
                payload = inbox.next() => payload,
                Some(reply) = replies.recv() => Some(reply),
            };
            let Some(payload) = payload else {
                break;
            };

            let write =
                tokio::time::timeout(write_timeout, sender.send(Message::Text(payload.into())));
            let written = tokio::select! {
                biased;
                _ = inbox.evicted() => false,
                result = write => match result {
                    Ok(Ok(())) => true,
                    Ok(Err(e)) => {
                        tracing::debug!("WebSocket write failed: {}", e);
                        false
                    }
                    Err(_) => {
                        tracing::warn!("WebSocket write timed out after {:?}", write_timeout);
                        false
                    }
                },
            };
            if !written {
                break;
            }
        }
        // 相手が読んでいない場合 close も詰まるので同じ上限で諦める
        let _ = tokio::time::timeout(write_timeout, sender.close()).await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, mut session: SessionGuard) {
    let user_id = session.user_id();
    let connection_id = session.id();
    let write_timeout = state.socket_write_timeout;
    let (mut sender, mut receiver) = socket.split();

    // Notify the client of its connection identity
    let opened = ServerFrame::SessionOpened {
        user_id: user_id.value(),
        connection_id: connection_id.to_string(),
    };
    match serde_json::to_string(&opened) {
        Ok(json) => {
            if let Err(e) = sender.send(Message::Text(json.into())).await {
                tracing::error!("Failed to send session_opened to {}: {}", connection_id, e);
                return;
            }
        }
        Err(e) => {
            tracing::error!("Failed to encode session_opened: {}", e);
            return;
        }
    }

    let Some(inbox) = session.take_inbox() else {
        tracing::error!("Session {} has no inbox", connection_id);
        return;
    };
    let (reply_tx, reply_rx) = mpsc::channel(REPLY_BUFFER);

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on {}: {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if let Err(frame) =
                        route_frame(&state, user_id, connection_id, text.as_str()).await
                    {
                        let Ok(json) = serde_json::to_string(&frame) else {
                            continue;
                        };
                        if reply_tx.send(json).await.is_err() {
                            break;
                        }
                    }
                }
                Message::Close(_) => {
                    tracing::info!("Connection {} requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to push queued messages to this client
    let mut send_task = pusher_loop(inbox, reply_rx, sender, write_timeout);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    drop(session);
}

/// クライアントのフレームを送信ユースケースへ渡す
///
/// 失敗は送信元の接続にだけ返すエラーフレームとして返す。
async fn route_frame(
    state: &AppState,
    sender: UserId,
    origin: ConnectionId,
    text: &str,
) -> Result<(), ServerFrame> {
    let frame = serde_json::from_str::<ClientFrame>(text).map_err(|e| {
        tracing::debug!("Malformed frame from {}: {}", origin, e);
        ServerFrame::error(ErrorKind::InvalidMessage, format!("malformed frame: {}", e))
    })?;

    let result = match frame {
        ClientFrame::Direct {
            receiver_id,
            content,
        } => {
            let receiver = UserId::new(receiver_id).map_err(invalid)?;
            let content = MessageContent::new(content).map_err(invalid)?;
            state
                .send_direct_message_usecase
                .execute(sender, receiver, content, Some(origin))
                .await
        }
        ClientFrame::Channel {
            channel_id,
            content,
        } => {
            let channel_id = ChannelId::new(channel_id).map_err(invalid)?;
            let content = MessageContent::new(content).map_err(invalid)?;
            state
                .send_channel_message_usecase
                .execute(sender, channel_id, content, Some(origin))
                .await
        }
    };

    result.map(|_| ()).map_err(|e| error_frame(&e))
}

fn invalid(error: ValueObjectError) -> ServerFrame {
    ServerFrame::error(ErrorKind::InvalidMessage, error.to_string())
}

fn error_frame(error: &SendMessageError) -> ServerFrame {
    let kind = match error {
        SendMessageError::AuthorizationFailure { .. } => ErrorKind::AuthorizationFailure,
        SendMessageError::ChannelNotFound(_) | SendMessageError::ReceiverNotFound(_) => {
            ErrorKind::NotFound
        }
        SendMessageError::Encode(_) | SendMessageError::Repository(_) => ErrorKind::Internal,
    };
    ServerFrame::error(kind, error.to_string())
}
