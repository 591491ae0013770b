//! Presence tracking for live session sockets.
//!
//! Each open socket registers its user under a topic; a user with several tabs
//! open is refcounted, so closing one tab keeps them present.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Topic = String;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    /// topic -> (user_id -> open sockets)
    presence: Arc<RwLock<HashMap<Topic, HashMap<i64, usize>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, topic: &str, user_id: i64) {
        let mut p = self.presence.write().await;
        let entry = p.entry(topic.to_string()).or_default();
        *entry.entry(user_id).or_insert(0) += 1;
    }

    pub async fn unregister(&self, topic: &str, user_id: i64) {
        let mut p = self.presence.write().await;
        if let Some(users) = p.get_mut(topic) {
            if let Some(cnt) = users.get_mut(&user_id) {
                if *cnt > 1 {
                    *cnt -= 1;
                } else {
                    users.remove(&user_id);
                }
            }
            if users.is_empty() {
                p.remove(topic);
            }
        }
    }

    /// Total open sockets across every topic.
    pub async fn open_sockets(&self) -> usize {
        let p = self.presence.read().await;
        p.values().flat_map(HashMap::values).sum()
    }
}
