//! 配送対象のメッセージと配送結果

use std::collections::BTreeSet;

use super::value_object::{ChannelId, ConnectionId, UserId};

/// メッセージの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Direct { receiver: UserId },
    Channel { channel: ChannelId },
    Notification { recipient: UserId },
}

/// 順序保証の単位
///
/// 同じレーンに受理されたメッセージは、受理した順に各接続のキューへ積まれます。
/// レーンをまたぐ順序は保証しません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderingLane {
    Channel(ChannelId),
    /// 2 ユーザー間の会話（小さい ID が先）
    Conversation(UserId, UserId),
    /// ユーザー宛ての通知
    Inbox(UserId),
}

/// 配送するメッセージ
///
/// 受信者は生成時に一度だけ確定し、配送中に再計算されることはありません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    pub sender: UserId,
    pub recipients: BTreeSet<UserId>,
    pub payload: String,
    /// 送信元の接続（その接続自身にはエコーしない）
    pub origin: Option<ConnectionId>,
}

impl OutboundMessage {
    /// ダイレクトメッセージを作成
    ///
    /// `echo_to_sender` が有効な場合、送信者の他の端末にも配送します。
    pub fn direct(
        sender: UserId,
        receiver: UserId,
        payload: String,
        echo_to_sender: bool,
        origin: Option<ConnectionId>,
    ) -> Self {
        let mut recipients = BTreeSet::from([receiver]);
        if echo_to_sender {
            recipients.insert(sender);
        }
        Self {
            kind: MessageKind::Direct { receiver },
            sender,
            recipients,
            payload,
            origin,
        }
    }

    /// チャンネルメッセージを作成
    ///
    /// `members` は解決時点のメンバーシップのスナップショットです。
    /// `echo_to_sender` が無効な場合は送信者を受信者から除外します。
    pub fn channel(
        sender: UserId,
        channel: ChannelId,
        members: BTreeSet<UserId>,
        payload: String,
        echo_to_sender: bool,
        origin: Option<ConnectionId>,
    ) -> Self {
        let mut recipients = members;
        if !echo_to_sender {
            recipients.remove(&sender);
        }
        Self {
            kind: MessageKind::Channel { channel },
            sender,
            recipients,
            payload,
            origin,
        }
    }

    /// 通知を作成
    ///
    /// 受信者本人の接続だけに配送し、送信者へのエコーはしません。
    pub fn notification(sender: UserId, recipient: UserId, payload: String) -> Self {
        Self {
            kind: MessageKind::Notification { recipient },
            sender,
            recipients: BTreeSet::from([recipient]),
            payload,
            origin: None,
        }
    }

    pub fn lane(&self) -> OrderingLane {
        match self.kind {
            MessageKind::Channel { channel } => OrderingLane::Channel(channel),
            MessageKind::Notification { recipient } => OrderingLane::Inbox(recipient),
            MessageKind::Direct { receiver } => {
                let (a, b) = if self.sender <= receiver {
                    (self.sender, receiver)
                } else {
                    (receiver, self.sender)
                };
                OrderingLane::Conversation(a, b)
            }
        }
    }
}

/// 配送結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// キューに積めた接続の数
    pub delivered: usize,
    /// 送信に失敗して登録解除した接続の数
    pub evicted: usize,
    /// 生きている接続を 1 つも持たなかった受信者
    pub unreachable: Vec<UserId>,
}
