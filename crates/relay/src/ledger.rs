//! Durable record of message IDs already delivered, per source channel.

use std::collections::{BTreeMap, HashMap, HashSet};

use mimic_store::MapStore;

use crate::{
    error::Result,
    platform::{ChannelId, MessageId},
};

/// Working copy of the sync ledger for one run.
///
/// Append-only: an ID is recorded only after its delivery call returned
/// success, and the full document is persisted before `append` returns.
/// A crash at any point can at worst re-inspect a message, never
/// re-deliver it.
pub struct SyncLedger<'a> {
    store: &'a MapStore,
    delivered: BTreeMap<String, Vec<MessageId>>,
    seen: HashMap<String, HashSet<MessageId>>,
}

impl<'a> SyncLedger<'a> {
    pub async fn load(store: &'a MapStore) -> Result<Self> {
        let delivered: BTreeMap<String, Vec<MessageId>> = store.load().await?;
        let seen = delivered
            .iter()
            .map(|(k, ids)| (k.clone(), ids.iter().copied().collect()))
            .collect();
        Ok(Self {
            store,
            delivered,
            seen,
        })
    }

    /// Whether `id` has already been delivered for `source`.
    pub fn contains(&self, source: ChannelId, id: MessageId) -> bool {
        self.seen
            .get(&source.to_string())
            .is_some_and(|ids| ids.contains(&id))
    }

    /// Delivered IDs for `source`, in delivery order.
    pub fn delivered(&self, source: ChannelId) -> &[MessageId] {
        self.delivered
            .get(&source.to_string())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Record a confirmed delivery and persist the whole ledger document.
    pub async fn append(&mut self, source: ChannelId, id: MessageId) -> Result<()> {
        let key = source.to_string();
        self.delivered.entry(key.clone()).or_default().push(id);
        self.seen.entry(key).or_default().insert(id);
        self.store.save(&self.delivered).await?;
        Ok(())
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, tempfile::TempDir};

    #[tokio::test]
    async fn append_persists_immediately() {
        let tmp = TempDir::new().unwrap();
        let store = MapStore::new(tmp.path().join("ledger.json"));

        let mut ledger = SyncLedger::load(&store).await.unwrap();
        ledger.append(100, 1).await.unwrap();
        ledger.append(100, 2).await.unwrap();

        // A fresh load observes every append.
        let reloaded = SyncLedger::load(&store).await.unwrap();
        assert_eq!(reloaded.delivered(100), &[1, 2]);
        assert!(reloaded.contains(100, 1));
        assert!(!reloaded.contains(100, 3));
    }

    #[tokio::test]
    async fn sources_are_independent() {
        let tmp = TempDir::new().unwrap();
        let store = MapStore::new(tmp.path().join("ledger.json"));

        let mut ledger = SyncLedger::load(&store).await.unwrap();
        ledger.append(100, 1).await.unwrap();
        ledger.append(200, 1).await.unwrap();

        assert!(ledger.contains(100, 1));
        assert!(ledger.contains(200, 1));
        assert_eq!(ledger.delivered(100), &[1]);
        assert_eq!(ledger.delivered(200), &[1]);
    }

    #[tokio::test]
    async fn order_is_preserved() {
        let tmp = TempDir::new().unwrap();
        let store = MapStore::new(tmp.path().join("ledger.json"));

        let mut ledger = SyncLedger::load(&store).await.unwrap();
        for id in [5, 3, 9, 1] {
            ledger.append(7, id).await.unwrap();
        }
        assert_eq!(ledger.delivered(7), &[5, 3, 9, 1]);
    }
}
