//! Repository trait 定義
//!
//! ドメイン層が必要とする外部協調者（認証、ユーザー、チャンネル、メッセージストア）の
//! インターフェースを定義します。具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::{
    AuthError, Channel, ChannelId, ChannelMember, DisplayName, MemberRole, MessageContent,
    MessageTarget, Notification, RepositoryError, StoredMessage, User, UserId,
};

/// 認証サービス
///
/// Bearer トークンから UserId を解決します。コアはこの結果を信頼します。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<UserId, AuthError>;
}

/// ユーザーディレクトリ
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザーを作成し、認証トークンと一緒に返す
    async fn create_user(
        &self,
        name: DisplayName,
        avatar_url: Option<String>,
    ) -> Result<(User, String), RepositoryError>;

    async fn get_user(&self, user_id: UserId) -> Result<User, RepositoryError>;

    async fn update_user(
        &self,
        user_id: UserId,
        name: DisplayName,
        avatar_url: Option<String>,
    ) -> Result<User, RepositoryError>;
}

/// チャンネルディレクトリ（メンバーシップの正本）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelRepository: Send + Sync {
    /// チャンネルを作成する。作成者は最初のメンバー（管理者）になる
    async fn create_channel(
        &self,
        name: DisplayName,
        creator: UserId,
        avatar_url: Option<String>,
    ) -> Result<Channel, RepositoryError>;

    async fn list_channels(&self) -> Vec<Channel>;
    /// 名前に `query` を含むチャンネル（大文字小文字を区別しない）
    async fn search_channels(&self, query: &str) -> Vec<Channel>;

    async fn get_channel(&self, channel_id: ChannelId) -> Result<Channel, RepositoryError>;

    async fn channel_exists(&self, channel_id: ChannelId) -> bool;

    /// 呼び出し時点のメンバーのスナップショット
    async fn members_of(&self, channel_id: ChannelId)
    -> Result<BTreeSet<UserId>, RepositoryError>;

    async fn is_member(&self, channel_id: ChannelId, user_id: UserId)
    -> Result<bool, RepositoryError>;

    /// ロール付きのメンバー一覧（UserId 順）
    async fn list_members(
        &self,
        channel_id: ChannelId,
    ) -> Result<Vec<ChannelMember>, RepositoryError>;

    /// メンバーでなければ `None`
    async fn role_of(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<Option<MemberRole>, RepositoryError>;

    /// 一般メンバーとして追加する
    async fn add_member(&self, channel_id: ChannelId, user_id: UserId)
    -> Result<(), RepositoryError>;

    /// 他のメンバーが残る間は、最後の管理者を外せない
    async fn remove_member(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Result<(), RepositoryError>;

    /// ロールを変更する。最後の管理者は降格できない
    async fn set_role(
        &self,
        channel_id: ChannelId,
        user_id: UserId,
        role: MemberRole,
    ) -> Result<ChannelMember, RepositoryError>;
}

/// メッセージストア
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存し、採番した ID と送信時刻を付けて返す
    ///
    /// 存在しないチャンネル宛てのメッセージは拒否する。
    async fn store(
        &self,
        sender: UserId,
        target: MessageTarget,
        content: MessageContent,
    ) -> Result<StoredMessage, RepositoryError>;

    /// チャンネルの履歴（送信順）
    async fn channel_history(
        &self,
        channel_id: ChannelId,
    ) -> Result<Vec<StoredMessage>, RepositoryError>;

    /// ユーザーが送受信したダイレクトメッセージ（送信順）
    async fn direct_history(&self, user_id: UserId) -> Vec<StoredMessage>;
}

/// 通知ストア
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// 未読の通知を保存し、採番した ID と作成時刻を付けて返す
    async fn create(
        &self,
        user_id: UserId,
        channel_id: ChannelId,
        message: MessageContent,
    ) -> Result<Notification, RepositoryError>;
    /// ユーザー宛ての通知（作成順）
    async fn list_for(&self, user_id: UserId) -> Vec<Notification>;
    /// 既読にする。他人宛ての通知は存在しないものとして扱う
    async fn mark_read(&self, user_id: UserId, id: u64) -> Result<Notification, RepositoryError>;
}
