//! Pinecone serverless index over its REST API.
//!
//! The control plane (`api.pinecone.io`) describes and creates the index; the
//! data plane lives on a per-index host that is looked up on first use.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::models::{RecordMetadata, SemanticRecord};
use crate::services::embedding::EMBEDDING_DIM;

use super::{IndexError, IndexMatch, IndexMode, MetadataFilter, SemanticIndex};

pub const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
pub const API_VERSION: &str = "2024-07";
const LIST_PAGE_LIMIT: &str = "100";
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    pub dimension: usize,
    pub cloud: String,
    pub region: String,
    pub control_plane_url: String,
    pub timeout: Duration,
    /// How long to wait for a freshly created index to become ready
    pub ready_timeout: Duration,
}

impl PineconeConfig {
    pub fn new(api_key: String, index_name: String) -> Self {
        Self {
            api_key,
            index_name,
            dimension: EMBEDDING_DIM,
            cloud: "aws".to_string(),
            region: "us-east-1".to_string(),
            control_plane_url: CONTROL_PLANE_URL.to_string(),
            timeout: Duration::from_secs(60),
            ready_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_serverless(mut self, cloud: String, region: String) -> Self {
        self.cloud = cloud;
        self.region = region;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_control_plane_url(mut self, url: String) -> Self {
        self.control_plane_url = url;
        self
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.api_key.is_empty() {
            return Err(IndexError::Configuration {
                message: "Pinecone API key is required".to_string(),
            });
        }
        if self.index_name.is_empty() {
            return Err(IndexError::Configuration {
                message: "Index name cannot be empty".to_string(),
            });
        }
        if self.dimension == 0 {
            return Err(IndexError::Configuration {
                message: "Index dimension must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    #[serde(default)]
    host: String,
    dimension: Option<usize>,
    status: Option<IndexStatus>,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
    state: Option<String>,
}

impl IndexDescription {
    fn is_ready(&self) -> bool {
        !self.host.is_empty() && self.status.as_ref().map_or(true, |s| s.ready)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    vectors: Vec<ListedVector>,
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct ListedVector {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    next: Option<String>,
}

pub struct PineconeIndex {
    config: PineconeConfig,
    client: Client,
    host: OnceCell<String>,
}

impl PineconeIndex {
    pub fn new(config: PineconeConfig) -> Result<Self, IndexError> {
        Self::build(config, OnceCell::new())
    }

    /// Use a known data-plane host and skip the control plane entirely
    pub fn with_host(config: PineconeConfig, host: &str) -> Result<Self, IndexError> {
        Self::build(config, OnceCell::new_with(Some(normalize_host(host))))
    }

    fn build(config: PineconeConfig, host: OnceCell<String>) -> Result<Self, IndexError> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| IndexError::Configuration {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            config,
            client,
            host,
        })
    }

    pub fn config(&self) -> &PineconeConfig {
        &self.config
    }

    /// Data-plane base URL. Concurrent first callers share one lookup; a failed
    /// lookup is retried on the next call.
    async fn host(&self) -> Result<&str, IndexError> {
        self.host
            .get_or_try_init(|| self.resolve_host())
            .await
            .map(String::as_str)
    }

    async fn resolve_host(&self) -> Result<String, IndexError> {
        let description = match self.describe_index().await {
            Ok(description) => description,
            Err(e) if e.is_not_found() => {
                info!(
                    index = %self.config.index_name,
                    dimension = self.config.dimension,
                    "Index not found; creating it"
                );
                match self.create_index().await {
                    Ok(description) => description,
                    // Someone else created it first
                    Err(IndexError::Http { status: 409, .. }) => self.describe_index().await?,
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        let description = self.wait_until_ready(description).await?;

        if let Some(dimension) = description.dimension {
            if dimension != self.config.dimension {
                warn!(
                    index = %self.config.index_name,
                    index_dimension = dimension,
                    expected = self.config.dimension,
                    "Index dimension does not match embedding dimension"
                );
            }
        }

        let host = normalize_host(&description.host);
        debug!(index = %self.config.index_name, host = %host, "Resolved index host");
        Ok(host)
    }

    async fn wait_until_ready(
        &self,
        mut description: IndexDescription,
    ) -> Result<IndexDescription, IndexError> {
        let deadline = tokio::time::Instant::now() + self.config.ready_timeout;

        while !description.is_ready() {
            if tokio::time::Instant::now() >= deadline {
                let state = description
                    .status
                    .and_then(|s| s.state)
                    .unwrap_or_else(|| "unknown".to_string());
                return Err(IndexError::NotReady {
                    message: format!("index '{}' is in state {state}", self.config.index_name),
                });
            }
            tokio::time::sleep(READY_POLL_INTERVAL).await;
            description = self.describe_index().await?;
        }

        Ok(description)
    }

    async fn describe_index(&self) -> Result<IndexDescription, IndexError> {
        let url = format!(
            "{}/indexes/{}",
            self.config.control_plane_url.trim_end_matches('/'),
            self.config.index_name
        );
        let body = self.execute(self.client.get(&url)).await?;
        parse_body(&body)
    }

    async fn create_index(&self) -> Result<IndexDescription, IndexError> {
        let url = format!(
            "{}/indexes",
            self.config.control_plane_url.trim_end_matches('/')
        );
        let request = json!({
            "name": self.config.index_name,
            "dimension": self.config.dimension,
            "metric": "cosine",
            "spec": {
                "serverless": {
                    "cloud": self.config.cloud,
                    "region": self.config.region,
                }
            }
        });
        let body = self.execute(self.client.post(&url).json(&request)).await?;
        parse_body(&body)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<String, IndexError> {
        let timeout_ms = self.config.timeout.as_millis() as u64;

        let response = builder
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| IndexError::from_reqwest_error(e, timeout_ms))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IndexError::from_reqwest_error(e, timeout_ms))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(IndexError::from_status_and_body(status, &body))
        }
    }

    fn check_dimension(&self, vector: &[f32]) -> Result<(), IndexError> {
        if vector.len() != self.config.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, IndexError> {
    serde_json::from_str(body).map_err(|e| IndexError::Parse {
        message: e.to_string(),
    })
}

fn query_body(vector: &[f32], filter: &MetadataFilter, top_k: usize) -> Value {
    json!({
        "vector": vector,
        "topK": top_k,
        "filter": filter.to_json(),
        "includeMetadata": true,
        "includeValues": false,
    })
}

fn parse_matches(body: &str) -> Result<Vec<IndexMatch>, IndexError> {
    let response: QueryResponse = parse_body(body)?;

    Ok(response
        .matches
        .into_iter()
        .filter_map(|m| {
            let metadata = m
                .metadata
                .and_then(|value| serde_json::from_value::<RecordMetadata>(value).ok());
            match metadata {
                Some(metadata) => Some(IndexMatch {
                    record_id: m.id,
                    score: m.score,
                    metadata,
                }),
                None => {
                    warn!(record_id = %m.id, "Skipping match with missing metadata");
                    None
                }
            }
        })
        .collect())
}

#[async_trait]
impl SemanticIndex for PineconeIndex {
    fn mode(&self) -> IndexMode {
        IndexMode::Live
    }

    fn backend_name(&self) -> &'static str {
        "pinecone"
    }

    async fn upsert(&self, record: SemanticRecord) -> Result<(), IndexError> {
        self.check_dimension(&record.vector)?;
        let url = format!("{}/vectors/upsert", self.host().await?);

        let request = json!({
            "vectors": [{
                "id": record.record_id,
                "values": record.vector,
                "metadata": record.metadata,
            }]
        });
        self.execute(self.client.post(&url).json(&request)).await?;
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        filter: &MetadataFilter,
        top_k: usize,
    ) -> Result<Vec<IndexMatch>, IndexError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }
        self.check_dimension(vector)?;
        let url = format!("{}/query", self.host().await?);

        let body = self
            .execute(self.client.post(&url).json(&query_body(vector, filter, top_k)))
            .await?;
        parse_matches(&body)
    }

    async fn delete_by_ids(&self, ids: &[String]) -> Result<usize, IndexError> {
        if ids.is_empty() {
            return Ok(0);
        }
        let url = format!("{}/vectors/delete", self.host().await?);

        self.execute(self.client.post(&url).json(&json!({ "ids": ids })))
            .await?;
        Ok(ids.len())
    }

    async fn list_ids(&self, filter: &MetadataFilter) -> Result<Vec<String>, IndexError> {
        let url = format!("{}/vectors/list", self.host().await?);
        let prefix = filter.id_prefix();

        let mut ids = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let mut params = vec![("prefix", prefix.clone()), ("limit", LIST_PAGE_LIMIT.to_string())];
            if let Some(next) = token.take() {
                params.push(("paginationToken", next));
            }

            let body = self.execute(self.client.get(&url).query(&params)).await?;
            let page: ListResponse = parse_body(&body)?;
            ids.extend(
                page.vectors
                    .into_iter()
                    .map(|v| v.id)
                    .filter(|id| filter.owns_record_id(id)),
            );

            match page.pagination.and_then(|p| p.next) {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => break,
            }
        }

        Ok(ids)
    }
}
