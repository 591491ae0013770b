use serde::Serialize;
use tokio::time::{Duration, Instant};

/// How long a toast stays up unless dismissed.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Ticket,
    Message,
}

impl AlertKind {
    pub fn title(self) -> &'static str {
        match self {
            AlertKind::Ticket => "Novo Ticket!",
            AlertKind::Message => "Nova Mensagem!",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub kind: AlertKind,
    pub title: &'static str,
    pub message: String,
    #[serde(skip)]
    pub expires_at: Instant,
}

/// Transient notifications in arrival order.
///
/// Unbounded: a burst of events produces a toast each.
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    next_id: u64,
    items: Vec<Toast>,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(TOAST_TTL)
    }
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            next_id: 0,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, kind: AlertKind, message: String, now: Instant) -> Toast {
        self.next_id += 1;
        let toast = Toast {
            id: self.next_id,
            kind,
            title: kind.title(),
            message,
            expires_at: now + self.ttl,
        };
        self.items.push(toast.clone());
        toast
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|t| t.id != id);
        self.items.len() != before
    }

    /// Drops every toast whose window has elapsed at `now`; returns their ids.
    pub fn sweep(&mut self, now: Instant) -> Vec<u64> {
        let mut expired = Vec::new();
        self.items.retain(|t| {
            if t.expires_at <= now {
                expired.push(t.id);
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn next_expiry(&self) -> Option<Instant> {
        self.items.iter().map(|t| t.expires_at).min()
    }

    pub fn active(&self) -> &[Toast] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
