//! User-facing trade notifications

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use vertex_core::TxHash;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
    pub tx_hash: Option<TxHash>,
    /// Block explorer page for `tx_hash`
    pub explorer_url: Option<String>,
    pub timestamp: u64,
}

impl TradeNotification {
    pub fn success(hash: &TxHash, explorer_base: &str) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: "Transaction Successful".to_string(),
            description: "Your trade has been confirmed on the blockchain.".to_string(),
            tx_hash: Some(hash.clone()),
            explorer_url: Some(hash.explorer_url(explorer_base)),
            timestamp: now_secs(),
        }
    }

    pub fn failure(hash: Option<&TxHash>, reason: &str, explorer_base: &str) -> Self {
        Self {
            kind: NotificationKind::Failure,
            title: "Transaction Failed".to_string(),
            description: reason.to_string(),
            tx_hash: hash.cloned(),
            explorer_url: hash.map(|h| h.explorer_url(explorer_base)),
            timestamp: now_secs(),
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// Notifier
// =============================================================================

/// Sink for trade outcome notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &TradeNotification);
}

/// Writes notifications to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &TradeNotification) {
        let link = notification.explorer_url.as_deref().unwrap_or("-");
        match notification.kind {
            NotificationKind::Success => tracing::info!(
                "{}: {} ({})",
                notification.title,
                notification.description,
                link
            ),
            NotificationKind::Failure => tracing::warn!(
                "{}: {} ({})",
                notification.title,
                notification.description,
                link
            ),
        }
    }
}
