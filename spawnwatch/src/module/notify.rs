///! Transient user-facing notices
///!
///! The tracker only raises notices; whoever renders the spawn list decides
///! how to show them and honours `dismiss_after`.

use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub body: String,
    pub dismiss_after: Duration,
}

impl Notice {
    pub fn warning(title: impl Into<String>, body: impl Into<String>, dismiss_after: Duration) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            body: body.into(),
            dismiss_after,
        }
    }
}

pub trait Notifier: Send + Sync {
    /// Fire-and-forget; must never block the caller.
    fn notify(&self, notice: Notice);
}

/// Fans notices out to every subscribed display.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: broadcast::Sender<Notice>,
}

impl ChannelNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        // No subscriber means nobody is looking; the notice is simply lost.
        if self.sender.send(notice).is_err() {
            tracing::debug!("Notice dropped, no display subscribed");
        }
    }
}
