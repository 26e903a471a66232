//! Integration tests for the messaging server.
//!
//! The server runs in-process on an ephemeral port; clients are driven with
//! `reqwest` (REST) and `tokio-tungstenite` (WebSocket).

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use kairo_server::ui::{AppState, Server, ServerConfig};
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Error as WsError, Message, client::IntoClientRequest},
};

const FRAME_TIMEOUT: Duration = Duration::from_secs(2);
const SILENCE_WINDOW: Duration = Duration::from_millis(200);

/// Helper struct to manage the in-process server lifecycle
struct TestServer {
    handle: JoinHandle<()>,
    port: u16,
    http: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with(ServerConfig::default()).await
    }

    async fn start_with(config: ServerConfig) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let port = listener.local_addr().unwrap().port();
        let server = Server::new(Arc::new(AppState::in_memory(&config)));
        let handle = tokio::spawn(async move {
            let _ = server.serve(listener, std::future::pending()).await;
        });

        TestServer {
            handle,
            port,
            http: reqwest::Client::new(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }

    /// Get the WebSocket URL for this server
    fn ws_url(&self, token: &str) -> String {
        format!("ws://127.0.0.1:{}/ws?token={}", self.port, token)
    }

    /// Create a user and return `(user_id, token)`
    async fn register(&self, name: &str) -> (u64, String) {
        let body: Value = self
            .http
            .post(self.api("/api/users"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        (
            body["id"].as_u64().unwrap(),
            body["token"].as_str().unwrap().to_string(),
        )
    }

    /// Create a channel owned by `token`'s user and add `members`
    async fn create_channel(&self, token: &str, members: &[u64]) -> u64 {
        let body: Value = self
            .http
            .post(self.api("/api/channels"))
            .bearer_auth(token)
            .json(&json!({ "name": "general" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let channel_id = body["id"].as_u64().unwrap();
        for member in members {
            let response = self
                .http
                .post(self.api(&format!("/api/channels/{}/members", channel_id)))
                .bearer_auth(token)
                .json(&json!({ "user_id": member }))
                .send()
                .await
                .unwrap();
            assert!(response.status().is_success());
        }
        channel_id
    }

    async fn connect(&self, token: &str) -> TestClient {
        let (stream, _) = connect_async(self.ws_url(token))
            .await
            .expect("Failed to connect");
        let mut client = TestClient { stream };
        let opened = client.next_frame().await.expect("no session_opened frame");
        assert_eq!(opened["type"], "session_opened");
        client
    }

    async fn presence(&self) -> Value {
        self.http
            .get(self.api("/api/presence"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Helper struct wrapping one WebSocket connection
struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn send(&mut self, frame: Value) {
        self.stream
            .send(Message::Text(frame.to_string().into()))
            .await
            .unwrap();
    }

    /// Next JSON frame, or `None` when nothing arrives within `FRAME_TIMEOUT`
    async fn next_frame(&mut self) -> Option<Value> {
        self.next_frame_within(FRAME_TIMEOUT).await
    }

    async fn next_frame_within(&mut self, window: Duration) -> Option<Value> {
        loop {
            let msg = tokio::time::timeout(window, self.stream.next())
                .await
                .ok()??
                .ok()?;
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).ok();
            }
        }
    }

    async fn assert_silent(&mut self) {
        assert_eq!(self.next_frame_within(SILENCE_WINDOW).await, None);
    }

    async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}

#[tokio::test]
async fn test_health_check() {
    // テスト項目: ヘルスチェックが ok を返す
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let body: Value = server
        .http
        .get(server.api("/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_websocket_requires_valid_token() {
    // テスト項目: 不正なトークンでの接続は 401 で拒否され、登録されない
    // given (前提条件):
    let server = TestServer::start().await;

    // when (操作):
    let result = connect_async(server.ws_url("bogus")).await;

    // then (期待する結果):
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 401),
        other => panic!("expected 401, got {:?}", other.map(|_| ())),
    }
    assert_eq!(server.presence().await["connection_count"], 0);
}

#[tokio::test]
async fn test_websocket_accepts_bearer_header() {
    // テスト項目: Authorization ヘッダーでも接続できる
    // given (前提条件):
    let server = TestServer::start().await;
    let (_, token) = server.register("alice").await;
    let mut request = format!("ws://127.0.0.1:{}/ws", server.port)
        .into_client_request()
        .unwrap();
    request.headers_mut().insert(
        "Authorization",
        format!("Bearer {}", token).parse().unwrap(),
    );

    // when (操作):
    let (stream, _) = connect_async(request).await.unwrap();
    let mut client = TestClient { stream };

    // then (期待する結果):
    let opened = client.next_frame().await.unwrap();
    assert_eq!(opened["type"], "session_opened");
}

#[tokio::test]
async fn test_direct_message_reaches_each_device_once() {
    // テスト項目: 2 台の端末を持つユーザーに、ダイレクトメッセージがそれぞれちょうど 1 回届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (alice_id, alice_token) = server.register("alice").await;
    let (bob_id, bob_token) = server.register("bob").await;
    let mut alice_phone = server.connect(&alice_token).await;
    let mut alice_laptop = server.connect(&alice_token).await;
    let mut bob = server.connect(&bob_token).await;

    // when (操作):
    bob.send(json!({ "type": "direct", "receiver_id": alice_id, "content": "hi alice" }))
        .await;

    // then (期待する結果):
    for device in [&mut alice_phone, &mut alice_laptop] {
        let frame = device.next_frame().await.unwrap();
        assert_eq!(frame["type"], "direct_message");
        assert_eq!(frame["sender_id"], bob_id);
        assert_eq!(frame["content"], "hi alice");
        device.assert_silent().await;
    }
    // 送信元の接続自身にはエコーされない
    bob.assert_silent().await;
}

#[tokio::test]
async fn test_non_member_gets_authorization_error_only() {
    // テスト項目: 非メンバーのチャンネル送信はエラーが送信元にだけ返り、誰にも配送されない
    // given (前提条件):
    let server = TestServer::start().await;
    let (_, owner_token) = server.register("owner").await;
    let (_, outsider_token) = server.register("outsider").await;
    let channel_id = server.create_channel(&owner_token, &[]).await;
    let mut owner = server.connect(&owner_token).await;
    let mut outsider = server.connect(&outsider_token).await;

    // when (操作):
    outsider
        .send(json!({ "type": "channel", "channel_id": channel_id, "content": "spam" }))
        .await;

    // then (期待する結果):
    let error = outsider.next_frame().await.unwrap();
    assert_eq!(error["type"], "error");
    assert_eq!(error["kind"], "authorization_failure");
    owner.assert_silent().await;

    let history: Value = server
        .http
        .get(server.api(&format!("/api/channels/{}/messages", channel_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history, json!([]));

    let response = server
        .http
        .post(server.api(&format!("/api/channels/{}/messages", channel_id)))
        .bearer_auth(&outsider_token)
        .json(&json!({ "content": "spam" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn test_channel_messages_keep_send_order() {
    // テスト項目: 同じ送信者の A → B → C が全メンバーの接続に同じ順で届く
    // given (前提条件):
    let server = TestServer::start().await;
    let (_, owner_token) = server.register("owner").await;
    let (member_id, member_token) = server.register("member").await;
    let channel_id = server.create_channel(&owner_token, &[member_id]).await;
    let mut owner = server.connect(&owner_token).await;
    let mut member_a = server.connect(&member_token).await;
    let mut member_b = server.connect(&member_token).await;

    // when (操作):
    for content in ["A", "B", "C"] {
        owner
            .send(json!({ "type": "channel", "channel_id": channel_id, "content": content }))
            .await;
    }

    // then (期待する結果):
    for device in [&mut member_a, &mut member_b] {
        let mut received = Vec::new();
        for _ in 0..3 {
            let frame = device.next_frame().await.unwrap();
            assert_eq!(frame["type"], "channel_message");
            received.push(frame["content"].as_str().unwrap().to_string());
        }
        assert_eq!(received, vec!["A", "B", "C"]);
    }
    owner.assert_silent().await;
}

#[tokio::test]
async fn test_removed_member_stops_receiving() {
    // テスト項目: メンバーから外れたユーザーには以降のメッセージが届かない
    // given (前提条件):
    let server = TestServer::start().await;
    let (_, owner_token) = server.register("owner").await;
    let (member_id, member_token) = server.register("member").await;
    let channel_id = server.create_channel(&owner_token, &[member_id]).await;
    let mut owner = server.connect(&owner_token).await;
    let mut member = server.connect(&member_token).await;

    // when (操作):
    let response = server
        .http
        .delete(server.api(&format!(
            "/api/channels/{}/members/{}",
            channel_id, member_id
        )))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);
    owner
        .send(json!({ "type": "channel", "channel_id": channel_id, "content": "after" }))
        .await;

    // then (期待する結果):
    member.assert_silent().await;
}

#[tokio::test]
async fn test_presence_follows_connections() {
    // テスト項目: 接続・切断が接続状況に反映される
    // given (前提条件):
    let server = TestServer::start().await;
    let (alice_id, alice_token) = server.register("alice").await;
    let first = server.connect(&alice_token).await;
    let _second = server.connect(&alice_token).await;
    let presence = server.presence().await;
    assert_eq!(presence["connection_count"], 2);
    assert_eq!(presence["online_users"], json!([alice_id]));

    // when (操作):
    first.close().await;

    // then (期待する結果):
    let mut count = 2;
    for _ in 0..40 {
        count = server.presence().await["connection_count"].as_u64().unwrap();
        if count == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(count, 1);
    let user: Value = server
        .http
        .get(server.api(&format!("/api/users/{}", alice_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(user["online"], true);
}

#[tokio::test]
async fn test_capacity_exhausted_returns_503() {
    // テスト項目: 同時接続数の上限を超える接続は 503 で拒否される
    // given (前提条件):
    let server = TestServer::start_with(ServerConfig {
        max_connections: 1,
        ..ServerConfig::default()
    })
    .await;
    let (_, token) = server.register("alice").await;
    let _first = server.connect(&token).await;

    // when (操作):
    let result = connect_async(server.ws_url(&token)).await;

    // then (期待する結果):
    match result {
        Err(WsError::Http(response)) => assert_eq!(response.status().as_u16(), 503),
        other => panic!("expected 503, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_direct_message_over_rest_is_delivered_and_stored() {
    // テスト項目: REST で送ったダイレクトメッセージが受信者に届き、履歴に残る
    // given (前提条件):
    let server = TestServer::start().await;
    let (alice_id, alice_token) = server.register("alice").await;
    let (_, bob_token) = server.register("bob").await;
    let mut alice = server.connect(&alice_token).await;

    // when (操作):
    let response = server
        .http
        .post(server.api("/api/messages/direct"))
        .bearer_auth(&bob_token)
        .json(&json!({ "receiver_id": alice_id, "content": "over rest" }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(response.status().as_u16(), 201);
    let sent: Value = response.json().await.unwrap();
    assert_eq!(sent["delivered"], 1);
    let frame = alice.next_frame().await.unwrap();
    assert_eq!(frame["content"], "over rest");

    let history: Value = server
        .http
        .get(server.api("/api/messages/direct"))
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["receiver_id"], alice_id);
}

#[tokio::test]
async fn test_stalled_reader_is_closed_after_eviction() {
    // テスト項目: 読み取りを止めたクライアントは切り離され、以後そのユーザーとして送信できない
    // given (前提条件):
    let server = TestServer::start_with(ServerConfig {
        outbound_buffer: 1,
        send_timeout: Duration::from_millis(50),
        ..ServerConfig::default()
    })
    .await;
    let (alice_id, alice_token) = server.register("alice").await;
    let (_, bob_token) = server.register("bob").await;
    let (carol_id, carol_token) = server.register("carol").await;
    let mut stalled = server.connect(&alice_token).await;
    let mut carol = server.connect(&carol_token).await;
    let bulky = "x".repeat(4000);

    // when (操作):
    // alice は一切読まないので、いずれ配送できなくなる
    let mut sent_before_eviction = None;
    for attempt in 0..10_000 {
        let sent: Value = server
            .http
            .post(server.api("/api/messages/direct"))
            .bearer_auth(&bob_token)
            .json(&json!({ "receiver_id": alice_id, "content": bulky }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        if sent["delivered"] == 0 {
            sent_before_eviction = Some(attempt);
            break;
        }
    }
    tokio::time::sleep(SILENCE_WINDOW).await;
    let _ = stalled
        .stream
        .send(Message::Text(
            json!({ "type": "direct", "receiver_id": carol_id, "content": "after eviction" })
                .to_string()
                .into(),
        ))
        .await;

    // then (期待する結果):
    assert!(sent_before_eviction.is_some());
    let presence = server.presence().await;
    assert!(
        !presence["online_users"]
            .as_array()
            .unwrap()
            .contains(&json!(alice_id))
    );
    carol.assert_silent().await;
}

#[tokio::test]
async fn test_member_roles_govern_add_and_remove() {
    // テスト項目: 追加は管理者・モデレーターだけ、ロール変更は管理者だけが行える
    // given (前提条件):
    let server = TestServer::start().await;
    let (admin_id, admin_token) = server.register("admin").await;
    let (moderator_id, moderator_token) = server.register("moderator").await;
    let (member_id, member_token) = server.register("member").await;
    let (newcomer_id, _) = server.register("newcomer").await;
    let channel_id = server
        .create_channel(&admin_token, &[moderator_id, member_id])
        .await;
    let role_url = |user_id: u64| {
        server.api(&format!(
            "/api/channels/{}/members/{}/role",
            channel_id, user_id
        ))
    };
    let members_url = server.api(&format!("/api/channels/{}/members", channel_id));

    // when (操作):
    let promoted = server
        .http
        .put(role_url(moderator_id))
        .bearer_auth(&admin_token)
        .json(&json!({ "role": "moderator" }))
        .send()
        .await
        .unwrap();
    let promote_by_member = server
        .http
        .put(role_url(member_id))
        .bearer_auth(&member_token)
        .json(&json!({ "role": "admin" }))
        .send()
        .await
        .unwrap();
    let add_by_member = server
        .http
        .post(&members_url)
        .bearer_auth(&member_token)
        .json(&json!({ "user_id": newcomer_id }))
        .send()
        .await
        .unwrap();
    let add_by_moderator = server
        .http
        .post(&members_url)
        .bearer_auth(&moderator_token)
        .json(&json!({ "user_id": newcomer_id }))
        .send()
        .await
        .unwrap();
    let remove_admin_by_moderator = server
        .http
        .delete(server.api(&format!(
            "/api/channels/{}/members/{}",
            channel_id, admin_id
        )))
        .bearer_auth(&moderator_token)
        .send()
        .await
        .unwrap();
    let admin_leaves = server
        .http
        .delete(server.api(&format!(
            "/api/channels/{}/members/{}",
            channel_id, admin_id
        )))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(promoted.status().as_u16(), 200);
    let promoted: Value = promoted.json().await.unwrap();
    assert_eq!(promoted, json!({ "user_id": moderator_id, "role": "moderator" }));
    assert_eq!(promote_by_member.status().as_u16(), 403);
    assert_eq!(add_by_member.status().as_u16(), 403);
    assert_eq!(add_by_moderator.status().as_u16(), 200);
    assert_eq!(remove_admin_by_moderator.status().as_u16(), 403);
    assert_eq!(admin_leaves.status().as_u16(), 409);

    let members: Value = server
        .http
        .get(&members_url)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        members["members"],
        json!([
            { "user_id": admin_id, "role": "admin" },
            { "user_id": moderator_id, "role": "moderator" },
            { "user_id": member_id, "role": "member" },
            { "user_id": newcomer_id, "role": "member" },
        ])
    );
}

#[tokio::test]
async fn test_search_channels_by_name() {
    // テスト項目: チャンネル名の部分一致で検索でき、大文字小文字は区別されない
    // given (前提条件):
    let server = TestServer::start().await;
    let (_, token) = server.register("owner").await;
    for name in ["Rust-Lang", "golang", "rustaceans"] {
        let response = server
            .http
            .post(server.api("/api/channels"))
            .bearer_auth(&token)
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
    }

    // when (操作):
    let found: Value = server
        .http
        .get(server.api("/api/channels/search?query=RUST"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果):
    let names: Vec<&str> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|channel| channel["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Rust-Lang", "rustaceans"]);
}

#[tokio::test]
async fn test_notification_is_pushed_and_marked_read() {
    // テスト項目: 通知は宛先の接続に届き、一覧に残り、宛先本人だけが既読にできる
    // given (前提条件):
    let server = TestServer::start().await;
    let (_, alice_token) = server.register("alice").await;
    let (bob_id, bob_token) = server.register("bob").await;
    let channel_id = server.create_channel(&alice_token, &[bob_id]).await;
    let mut alice = server.connect(&alice_token).await;
    let mut bob = server.connect(&bob_token).await;

    // when (操作):
    let created = server
        .http
        .post(server.api("/api/notifications"))
        .bearer_auth(&alice_token)
        .json(&json!({ "user_id": bob_id, "channel_id": channel_id, "message": "review please" }))
        .send()
        .await
        .unwrap();

    // then (期待する結果):
    assert_eq!(created.status().as_u16(), 201);
    let created: Value = created.json().await.unwrap();
    assert_eq!(created["delivered"], 1);
    assert_eq!(created["notification"]["read"], false);
    let notification_id = created["notification"]["id"].as_u64().unwrap();

    let pushed = bob.next_frame().await.unwrap();
    assert_eq!(pushed["type"], "notification");
    assert_eq!(pushed["id"], notification_id);
    assert_eq!(pushed["channel_id"], channel_id);
    assert_eq!(pushed["message"], "review please");
    alice.assert_silent().await;

    let read_url = server.api(&format!("/api/notifications/{}/read", notification_id));
    let by_sender = server
        .http
        .put(&read_url)
        .bearer_auth(&alice_token)
        .send()
        .await
        .unwrap();
    assert_eq!(by_sender.status().as_u16(), 404);
    let by_recipient = server
        .http
        .put(&read_url)
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap();
    assert_eq!(by_recipient.status().as_u16(), 200);

    let listed: Value = server
        .http
        .get(server.api("/api/notifications"))
        .bearer_auth(&bob_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["read"], true);
}
