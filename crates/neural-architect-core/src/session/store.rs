use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{SessionRecord, SessionTag};
use crate::error::StorageError;
use crate::storage::{KeyValueStore, SnapshotSlot};

pub const SESSION_STORAGE_KEY: &str = "neural-architect-session";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SessionSnapshot {
    tags: BTreeMap<String, SessionTag>,
    sessions: HashMap<String, SessionRecord>,
    session_order: Vec<String>,
}

/// Tag registry plus the append-only history of completed focus sessions.
pub struct SessionStore {
    data: SessionSnapshot,
    slot: Option<SnapshotSlot>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            data: SessionSnapshot::default(),
            slot: None,
        }
    }

    /// # Errors
    /// Returns the store's error when the snapshot cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let slot = SnapshotSlot::new(store, SESSION_STORAGE_KEY);
        let mut data: SessionSnapshot = slot.load()?.unwrap_or_default();

        let before = data.session_order.len();
        let sessions = &data.sessions;
        data.session_order.retain(|id| sessions.contains_key(id));
        if data.session_order.len() != before {
            tracing::warn!(
                dropped = before - data.session_order.len(),
                "dropped session order entries without a record"
            );
        }

        Ok(Self {
            data,
            slot: Some(slot),
        })
    }

    /// Insert or replace a tag by id.
    pub fn add_tag(&mut self, tag: SessionTag) {
        let mut next = self.data.clone();
        next.tags.insert(tag.id.clone(), tag);
        self.commit(next);
    }

    /// Remove a tag and sever it from every recorded session.
    ///
    /// Returns the removed tag, or `None` if the id was unknown.
    pub fn remove_tag(&mut self, id: &str) -> Option<SessionTag> {
        let mut next = self.data.clone();
        let removed = next.tags.remove(id)?;
        for record in next.sessions.values_mut() {
            record.tag_ids.retain(|tag_id| tag_id != id);
        }
        self.commit(next);
        Some(removed)
    }

    /// Append a completed session. Returns `false` for a duplicate id.
    pub fn record_session(&mut self, record: SessionRecord) -> bool {
        if self.data.sessions.contains_key(&record.id) {
            tracing::warn!(id = %record.id, "ignoring duplicate session record");
            return false;
        }
        let mut next = self.data.clone();
        next.session_order.push(record.id.clone());
        next.sessions.insert(record.id.clone(), record);
        self.commit(next);
        true
    }

    pub fn tag(&self, id: &str) -> Option<&SessionTag> {
        self.data.tags.get(id)
    }

    pub fn tags(&self) -> impl Iterator<Item = &SessionTag> {
        self.data.tags.values()
    }

    pub fn session(&self, id: &str) -> Option<&SessionRecord> {
        self.data.sessions.get(id)
    }

    /// Sessions in completion order.
    pub fn history(&self) -> impl Iterator<Item = &SessionRecord> {
        self.data
            .session_order
            .iter()
            .filter_map(|id| self.data.sessions.get(id))
    }

    pub fn session_count(&self) -> usize {
        self.data.session_order.len()
    }

    pub fn total_xp(&self) -> u64 {
        self.history().map(|r| r.xp_earned).sum()
    }

    fn commit(&mut self, next: SessionSnapshot) {
        self.data = next;
        if let Some(slot) = &self.slot {
            slot.save(&self.data);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionCategory;
    use crate::storage::MemoryStore;
    use crate::timer::TimerPhase;
    use chrono::Utc;

    fn record(id: &str, tags: &[&str]) -> SessionRecord {
        SessionRecord {
            id: id.into(),
            category: SessionCategory::Work,
            tag_ids: tags.iter().map(|t| t.to_string()).collect(),
            phase: TimerPhase::Focus,
            duration_seconds: 1500,
            completed_at: Utc::now(),
            xp_earned: 50,
        }
    }

    #[test]
    fn history_keeps_order() {
        let mut store = SessionStore::new();
        store.record_session(record("b", &[]));
        store.record_session(record("a", &[]));
        store.record_session(record("c", &[]));
        let ids: Vec<_> = store.history().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(store.total_xp(), 150);
    }

    #[test]
    fn duplicate_record_ignored() {
        let mut store = SessionStore::new();
        assert!(store.record_session(record("a", &[])));
        assert!(!store.record_session(record("a", &["x"])));
        assert_eq!(store.session_count(), 1);
        assert!(store.session("a").unwrap().tag_ids.is_empty());
    }

    #[test]
    fn removing_tag_severs_but_keeps_sessions() {
        let mut store = SessionStore::new();
        let tag = SessionTag::with_id("t1", "reading", SessionCategory::Study).unwrap();
        store.add_tag(tag);
        store.add_tag(SessionTag::with_id("t2", "math", SessionCategory::Study).unwrap());
        store.record_session(record("s1", &["t1", "t2"]));

        let removed = store.remove_tag("t1").unwrap();
        assert_eq!(removed.label, "reading");
        assert!(store.tag("t1").is_none());
        assert_eq!(store.session_count(), 1);
        assert_eq!(store.session("s1").unwrap().tag_ids, vec!["t2".to_string()]);
        assert!(store.remove_tag("t1").is_none());
    }

    #[test]
    fn add_tag_replaces_by_id() {
        let mut store = SessionStore::new();
        store.add_tag(SessionTag::with_id("t1", "old", SessionCategory::Work).unwrap());
        store.add_tag(SessionTag::with_id("t1", "new", SessionCategory::Custom).unwrap());
        assert_eq!(store.tags().count(), 1);
        assert_eq!(store.tag("t1").unwrap().label, "new");
    }

    #[test]
    fn persists_and_repairs_order() {
        let kv = Arc::new(MemoryStore::new());
        {
            let mut store = SessionStore::load(kv.clone()).unwrap();
            store.record_session(record("s1", &[]));
        }
        let mut raw: serde_json::Value =
            serde_json::from_str(&kv.get(SESSION_STORAGE_KEY).unwrap().unwrap()).unwrap();
        raw["sessionOrder"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::Value::String("ghost".into()));
        kv.set(SESSION_STORAGE_KEY, &raw.to_string()).unwrap();

        let store = SessionStore::load(kv).unwrap();
        let ids: Vec<_> = store.history().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec!["s1".to_string()]);
        assert_eq!(store.session_count(), 1);
    }
}
