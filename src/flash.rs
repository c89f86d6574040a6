//! One-shot flash state, carried server-side instead of inside a session
//! cookie. Entries live in a TTL cache keyed by the `sid` cookie value and
//! are consumed whole by the next listing render; whatever the client never
//! comes back for expires on its own.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::contact::Contact;

pub const SESSION_COOKIE: &str = "sid";

#[derive(Debug, Default, Clone)]
pub struct Flash {
    pub messages: Vec<String>,
    pub search_results: Option<Vec<Contact>>,
}

pub struct FlashStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Flash)>>,
}

impl FlashStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn push_message(&self, token: &str, message: impl Into<String>) {
        let message = message.into();
        self.with_entry(token, |flash| flash.messages.push(message))
            .await;
    }

    pub async fn set_search_results(&self, token: &str, contacts: Vec<Contact>) {
        self.with_entry(token, |flash| flash.search_results = Some(contacts))
            .await;
    }

    async fn with_entry(&self, token: &str, apply: impl FnOnce(&mut Flash)) {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, (created_at, _)| created_at.elapsed() <= self.ttl);
        let (created_at, flash) = entries
            .entry(token.to_string())
            .or_insert_with(|| (Instant::now(), Flash::default()));
        *created_at = Instant::now();
        apply(flash);
    }

    /// Removes and returns the pending flash state; a second take comes back
    /// empty. Expired entries read as empty too.
    pub async fn take(&self, token: &str) -> Flash {
        let mut entries = self.entries.lock().await;
        entries.retain(|_, (created_at, _)| created_at.elapsed() <= self.ttl);
        entries
            .remove(token)
            .map(|(_, flash)| flash)
            .unwrap_or_default()
    }
}

pub fn mint_token() -> String {
    Uuid::new_v4().to_string()
}
