//! # Presence
//!
//! Ephemeral map of client identifier to last-seen time (epoch millis).
//!
//! ## Eviction
//!
//! - Sweep on write: every heartbeat drops entries older than [`ACTIVE_WINDOW`]
//! - Filter on read: listing hides stale entries but never removes them
//! - Stale entries may linger until the next heartbeat from any client
//!
//! ## Caveats
//!
//! Client identifiers come from forwarded-address headers, which any client can
//! spoof. The count is best-effort telemetry and must never gate access.
//!
//! State is local to one process. Several instances behind a load balancer each
//! see only their own traffic, and a restart forgets everyone.
use std::collections::HashMap;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

/// How long a client counts as active after its last heartbeat, in millis.
pub const ACTIVE_WINDOW: i64 = 120_000;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEntry {
    #[serde(rename = "ip")]
    pub client_id: String,
    pub last_seen: i64,
}

#[derive(Default)]
pub struct PresenceStore {
    last_seen: RwLock<HashMap<String, i64>>,
}

impl PresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins, even if `now` is older than the stored value.
    pub async fn record_heartbeat(&self, client_id: &str, now: i64) {
        let mut last_seen = self.last_seen.write().await;

        last_seen.insert(client_id.to_string(), now);

        let before = last_seen.len();
        last_seen.retain(|_, seen| is_fresh(*seen, now));

        debug!(
            client_id,
            evicted = before - last_seen.len(),
            tracked = last_seen.len(),
            "Heartbeat recorded"
        );
    }

    pub async fn list_active(&self, now: i64) -> Vec<PresenceEntry> {
        self.last_seen
            .read()
            .await
            .iter()
            .filter(|(_, seen)| is_fresh(**seen, now))
            .map(|(client_id, seen)| PresenceEntry {
                client_id: client_id.clone(),
                last_seen: *seen,
            })
            .collect()
    }

    /// Physically stored entries, including stale ones not yet swept.
    pub async fn tracked(&self) -> usize {
        self.last_seen.read().await.len()
    }
}

fn is_fresh(last_seen: i64, now: i64) -> bool {
    now.saturating_sub(last_seen) <= ACTIVE_WINDOW
}
