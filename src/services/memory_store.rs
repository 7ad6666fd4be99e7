use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    docs: HashMap<String, String>,
    sets: HashMap<String, BTreeSet<String>>,
}

/// In-process stand-in for Redis with the same key layout. Used for local runs and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_doc(&self, key: &str) -> Option<String> {
        self.inner.read().await.docs.get(key).cloned()
    }

    pub async fn put_doc(&self, key: &str, index: &str, member: &str, doc: String) {
        let mut inner = self.inner.write().await;
        inner.docs.insert(key.to_string(), doc);
        inner
            .sets
            .entry(index.to_string())
            .or_default()
            .insert(member.to_string());
    }

    pub async fn members(&self, index: &str) -> Vec<String> {
        self.inner
            .read()
            .await
            .sets
            .get(index)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub async fn get_docs(&self, keys: &[String]) -> Vec<Option<String>> {
        let inner = self.inner.read().await;
        keys.iter().map(|k| inner.docs.get(k).cloned()).collect()
    }
}
