use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::utils::ChangeSignal;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Transient operator messages. Every item removes itself after `timeout`,
/// regardless of how many others are showing.
#[derive(Clone)]
pub struct NotificationQueue {
    items: Arc<Mutex<Vec<Notification>>>,
    timeout: Duration,
    signal: ChangeSignal,
}

impl NotificationQueue {
    pub fn new(timeout: Duration, signal: ChangeSignal) -> Self {
        Self {
            items: Arc::new(Mutex::new(Vec::new())),
            timeout,
            signal,
        }
    }

    pub async fn enqueue(&self, message: impl Into<String>, severity: Severity) -> Uuid {
        let notification = Notification {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            created_at: Utc::now(),
        };
        let id = notification.id;

        self.items.lock().await.push(notification);
        self.signal.bump();

        let queue = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(queue.timeout).await;
            queue.dismiss(id).await;
        });

        id
    }

    pub async fn success(&self, message: impl Into<String>) -> Uuid {
        self.enqueue(message, Severity::Success).await
    }

    pub async fn danger(&self, message: impl Into<String>) -> Uuid {
        self.enqueue(message, Severity::Danger).await
    }

    /// Remove one notification early. Returns false when it already expired.
    pub async fn dismiss(&self, id: Uuid) -> bool {
        let removed = {
            let mut items = self.items.lock().await;
            let before = items.len();
            items.retain(|item| item.id != id);
            items.len() != before
        };

        if removed {
            self.signal.bump();
        }
        removed
    }

    /// Currently showing, oldest first.
    pub async fn visible(&self) -> Vec<Notification> {
        self.items.lock().await.clone()
    }
}
