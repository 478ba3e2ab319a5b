//! Stratos client implementation.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use stratos_core::brief::BriefComponent;
use stratos_core::error::{Result, StratosError};
use stratos_core::types::StrategyStatus;
use tracing::debug;
use uuid::Uuid;

use crate::stream::StrategyEventStream;

/// Client for interacting with a Stratos node.
#[derive(Clone)]
pub struct StratosClient {
    /// Base URL of the Stratos node.
    base_url: String,

    /// HTTP client.
    http_client: reqwest::Client,
}

/// Brief summary returned by the node.
#[derive(Debug, Clone, Deserialize)]
pub struct BriefView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Intake steps already submitted.
    pub submitted: Vec<String>,
    /// Intake steps still required before generation.
    pub missing: Vec<String>,
    pub complete: bool,
}

/// One section of a strategy block.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionView {
    pub id: Uuid,
    pub order: u32,
    pub content: String,
    pub editable: bool,
}

/// One titled block of a strategy.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockView {
    pub id: Uuid,
    pub order: u32,
    pub title: String,
    pub sections: Vec<SectionView>,
}

/// Strategy with its full block/section tree.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyView {
    pub id: Uuid,
    pub brief_id: Uuid,
    pub status: StrategyStatus,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 digest of the archived raw model output.
    pub raw_digest: String,
    /// Archived raw output; populated by [`StratosClient::get_strategy`] only.
    #[serde(default)]
    pub raw_text: Option<String>,
    pub blocks: Vec<BlockView>,
}

/// Receipt returned after a successful delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryReceiptView {
    pub id: Uuid,
    pub strategy_id: Uuid,
    pub recipient: String,
    pub transport: String,
    pub message_id: String,
    pub delivered_at: DateTime<Utc>,
}

async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    resource: &str,
    id: &str,
) -> Result<T> {
    if response.status().as_u16() == 404 {
        return Err(StratosError::not_found(resource, id));
    }
    if !response.status().is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(StratosError::Internal(format!(
            "{} request failed: {}",
            resource, error_text
        )));
    }
    response
        .json()
        .await
        .map_err(|e| StratosError::SerializationError(e.to_string()))
}

impl StratosClient {
    /// Connect to a Stratos node.
    pub async fn connect(url: &str) -> Result<Self> {
        let base_url = url.trim_end_matches('/').to_string();
        let http_client = reqwest::Client::new();

        // Verify connection with health check
        let health_url = format!("{}/health", base_url);
        http_client
            .get(&health_url)
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?
            .error_for_status()
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        Ok(Self {
            base_url,
            http_client,
        })
    }

    /// Create a new, empty brief for a user.
    pub async fn create_brief(&self, user_id: Uuid) -> Result<BriefView> {
        let url = format!("{}/api/v1/briefs", self.base_url);
        debug!("Creating brief for user {}", user_id);

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "user_id": user_id }))
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Brief", &user_id.to_string()).await
    }

    /// Submit one intake step; resubmitting a step overwrites it.
    pub async fn submit_component(
        &self,
        brief_id: Uuid,
        component: &BriefComponent,
    ) -> Result<BriefView> {
        let url = format!("{}/api/v1/briefs/{}/components", self.base_url, brief_id);
        debug!("Submitting {} for brief {}", component.kind(), brief_id);

        let response = self
            .http_client
            .put(&url)
            .json(component)
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Brief", &brief_id.to_string()).await
    }

    /// Get a brief's summary.
    pub async fn get_brief(&self, brief_id: Uuid) -> Result<BriefView> {
        let url = format!("{}/api/v1/briefs/{}", self.base_url, brief_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Brief", &brief_id.to_string()).await
    }

    /// Run the generation pipeline for a complete brief.
    ///
    /// `regenerate` permits replacing an already-approved strategy.
    pub async fn generate(&self, brief_id: Uuid, regenerate: bool) -> Result<StrategyView> {
        let url = format!("{}/api/v1/briefs/{}/strategy", self.base_url, brief_id);
        debug!("Requesting generation for brief {}", brief_id);

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "regenerate": regenerate }))
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Strategy", &brief_id.to_string()).await
    }

    /// Get the strategy currently attached to a brief.
    pub async fn strategy_for_brief(&self, brief_id: Uuid) -> Result<StrategyView> {
        let url = format!("{}/api/v1/briefs/{}/strategy", self.base_url, brief_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Strategy", &brief_id.to_string()).await
    }

    /// Get a strategy by ID, including the archived raw output.
    pub async fn get_strategy(&self, strategy_id: Uuid) -> Result<StrategyView> {
        let url = format!("{}/api/v1/strategies/{}", self.base_url, strategy_id);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Strategy", &strategy_id.to_string()).await
    }

    /// Record that the strategy was opened for review.
    pub async fn open(&self, strategy_id: Uuid) -> Result<StrategyView> {
        let url = format!("{}/api/v1/strategies/{}/open", self.base_url, strategy_id);

        let response = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Strategy", &strategy_id.to_string()).await
    }

    /// Rewrite one section's content.
    pub async fn edit_section(
        &self,
        strategy_id: Uuid,
        section_id: Uuid,
        content: &str,
    ) -> Result<StrategyView> {
        let url = format!(
            "{}/api/v1/strategies/{}/sections/{}",
            self.base_url, strategy_id, section_id
        );
        debug!("Editing section {} of strategy {}", section_id, strategy_id);

        let response = self
            .http_client
            .patch(&url)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Section", &section_id.to_string()).await
    }

    /// Approve the strategy, locking it against further edits.
    pub async fn approve(&self, strategy_id: Uuid) -> Result<StrategyView> {
        let url = format!("{}/api/v1/strategies/{}/approve", self.base_url, strategy_id);
        debug!("Approving strategy {}", strategy_id);

        let response = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Strategy", &strategy_id.to_string()).await
    }

    /// Apply a full permutation of the strategy's block order.
    pub async fn reorder_blocks(
        &self,
        strategy_id: Uuid,
        order: &[Uuid],
    ) -> Result<StrategyView> {
        let url = format!(
            "{}/api/v1/strategies/{}/blocks/order",
            self.base_url, strategy_id
        );

        let response = self
            .http_client
            .put(&url)
            .json(&serde_json::json!({ "order": order }))
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Strategy", &strategy_id.to_string()).await
    }

    /// Render and send an approved strategy to a recipient.
    pub async fn deliver(
        &self,
        strategy_id: Uuid,
        recipient: &str,
    ) -> Result<DeliveryReceiptView> {
        let url = format!("{}/api/v1/strategies/{}/deliver", self.base_url, strategy_id);
        debug!("Delivering strategy {} to {}", strategy_id, recipient);

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "recipient": recipient }))
            .send()
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        decode(response, "Strategy", &strategy_id.to_string()).await
    }

    /// Subscribe to a brief's live strategy lifecycle events.
    pub async fn watch(&self, brief_id: Uuid) -> Result<StrategyEventStream> {
        let ws_url = format!(
            "{}/ws/briefs/{}/strategy",
            self.base_url
                .replace("http://", "ws://")
                .replace("https://", "wss://"),
            brief_id
        );

        StrategyEventStream::connect(&ws_url, brief_id).await
    }
}
