//! Process-local cosine index for development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::SemanticRecord;

use super::{IndexError, IndexMatch, IndexMode, MetadataFilter, SemanticIndex};

pub struct InMemoryIndex {
    dimension: usize,
    records: RwLock<HashMap<String, SemanticRecord>>,
}

impl InMemoryIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

/// Cosine similarity clamped to [0, 1]
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[async_trait]
impl SemanticIndex for InMemoryIndex {
    fn mode(&self) -> IndexMode {
        IndexMode::Live
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn upsert(&self, record: SemanticRecord) -> Result<(), IndexError> {
        self.check_dimension(&record.vector)?;
        self.records
            .write()
            .await
            .insert(record.record_id.clone(), record);
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<IndexMatch>, IndexError> {
        self.check_dimension(vector)?;

        let records = self.records.read().await;
        let mut matches: Vec<IndexMatch> = records
            .values()
            .filter(|record| filter.matches(&record.metadata))
            .map(|record| IndexMatch {
                record_id: record.record_id.clone(),
                score: cosine_similarity(vector, &record.vector),
                metadata: record.metadata.clone(),
            })
            .collect();
        drop(records);

        matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        matches.truncate(top_k);
        Ok(matches)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, IndexError> {
        let mut records = self.records.write().await;
        for id in ids {
            records.remove(id);
        }
        Ok(ids.len())
    }

    async fn list_ids(&self, filter: &MetadataFilter) -> Result<Vec<String>, IndexError> {
        let records = self.records.read().await;
        let mut ids: Vec<String> = records
            .values()
            .filter(|record| filter.matches(&record.metadata))
            .map(|record| record.record_id.clone())
            .collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TranscriptChunk;

    fn record(session: &str, chunk: &str, text: &str, vector: Vec<f32>) -> SemanticRecord {
        let chunk = TranscriptChunk::new(session, "p", text).with_id(chunk);
        SemanticRecord::from_chunk(session, &chunk, vector)
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn test_query_orders_and_filters() {
        let index = InMemoryIndex::new(2);
        index.upsert(record("s1", "a", "exact", vec![1.0, 0.0])).await.unwrap();
        index.upsert(record("s1", "b", "close", vec![0.9, 0.1])).await.unwrap();
        index.upsert(record("s2", "c", "other session", vec![1.0, 0.0])).await.unwrap();

        let matches = index
            .query(&[1.0, 0.0], &MetadataFilter::session("s1"), 10)
            .await
            .unwrap();
        let texts: Vec<&str> = matches.iter().map(|m| m.metadata.text.as_str()).collect();
        assert_eq!(texts, vec!["exact", "close"]);

        let top_one = index
            .query(&[1.0, 0.0], &MetadataFilter::session("s1"), 1)
            .await
            .unwrap();
        assert_eq!(top_one.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_overwrites() {
        let index = InMemoryIndex::new(2);
        index.upsert(record("s1", "a", "first", vec![1.0, 0.0])).await.unwrap();
        index.upsert(record("s1", "a", "second", vec![1.0, 0.0])).await.unwrap();

        assert_eq!(index.len().await, 1);
        let matches = index
            .query(&[1.0, 0.0], &MetadataFilter::session("s1"), 5)
            .await
            .unwrap();
        assert_eq!(matches[0].metadata.text, "second");
    }

    #[tokio::test]
    async fn test_dimension_checked() {
        let index = InMemoryIndex::new(3);
        let err = index
            .upsert(record("s1", "a", "t", vec![1.0]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let index = InMemoryIndex::new(2);
        index.upsert(record("s1", "a", "t", vec![1.0, 0.0])).await.unwrap();
        index.upsert(record("s1", "b", "t", vec![1.0, 0.0])).await.unwrap();
        index.upsert(record("s2", "a", "t", vec![1.0, 0.0])).await.unwrap();

        let ids = index.list_ids(&MetadataFilter::session("s1")).await.unwrap();
        assert_eq!(ids, vec!["s1_a".to_string(), "s1_b".to_string()]);

        index.delete_by_ids(&ids).await.unwrap();
        assert_eq!(index.len().await, 1);
        assert_eq!(
            index.list_ids(&MetadataFilter::session("s2")).await.unwrap(),
            vec!["s2_a".to_string()]
        );
    }
}
