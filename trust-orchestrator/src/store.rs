use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::Document;
use crate::trust::TrustTier;

/// Persistence for verification records, keyed by URL.
///
/// `put` is an upsert. Listings are ordered by id.
#[async_trait]
pub trait VerificationStore: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError>;

    async fn put(&self, document: &Document) -> Result<(), StoreError>;

    async fn list_by_min_tier(&self, tier: TrustTier) -> Result<Vec<(String, TrustTier)>, StoreError>;

    async fn list_all(&self) -> Result<Vec<Document>, StoreError>;
}

/// In-process store for development runs without a database, and for tests.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let records = documents.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self {
            records: RwLock::new(records),
        }
    }
}

#[async_trait]
impl VerificationStore for MemoryStore {
    async fn get(&self, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn put(&self, document: &Document) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn list_by_min_tier(&self, tier: TrustTier) -> Result<Vec<(String, TrustTier)>, StoreError> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|d| d.trust_tier >= tier)
            .map(|d| (d.id.clone(), d.trust_tier))
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<Document>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, tier: TrustTier) -> Document {
        Document::new(id, tier)
    }

    #[tokio::test]
    async fn put_then_get_returns_the_record() {
        let store = MemoryStore::new();
        let mut d = doc("https://a.example", TrustTier::MachineChecked);
        d.content = Some("Alpha".to_string());
        store.put(&d).await.unwrap();

        assert_eq!(store.get("https://a.example").await.unwrap(), Some(d));
        assert_eq!(store.get("https://missing.example").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_replaces_existing_record() {
        let store = MemoryStore::with_documents([doc("u", TrustTier::Untrusted)]);
        store.put(&doc("u", TrustTier::AiAssisted)).await.unwrap();

        let all = store.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].trust_tier, TrustTier::AiAssisted);
    }

    #[tokio::test]
    async fn list_by_min_tier_filters_and_orders_by_id() {
        let store = MemoryStore::with_documents([
            doc("c", TrustTier::HumanVerified),
            doc("a", TrustTier::MachineChecked),
            doc("b", TrustTier::Untrusted),
        ]);

        let listed = store.list_by_min_tier(TrustTier::MachineChecked).await.unwrap();
        assert_eq!(
            listed,
            vec![
                ("a".to_string(), TrustTier::MachineChecked),
                ("c".to_string(), TrustTier::HumanVerified),
            ]
        );
        assert_eq!(store.list_by_min_tier(TrustTier::Untrusted).await.unwrap().len(), 3);
    }
}
