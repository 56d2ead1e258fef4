//! Service client: JSON over HTTP with a fixed fallback on every failure path.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

use outpost_core::config::{ApiConfig, OutpostConfig};
use outpost_core::persistence::LocalSaveStore;
use outpost_core::GameState;

use crate::error::{ApiError, Result};
use crate::fallback;
use crate::types::{DialogueRequest, DialogueResponse, GenerateQuestRequest, GenerateQuestResponse, SaveOutcome};

/// Endpoint paths relative to the base URL.
pub mod endpoints {
    /// NPC reply generation.
    pub const DIALOGUE: &str = "/api/dialogue";
    /// Quest generation from a player suggestion.
    pub const GENERATE_QUEST: &str = "/api/generate-quest";
    /// Legacy quest generation.
    pub const QUEST: &str = "/api/quest";
    /// Store a save.
    pub const SAVE: &str = "/api/save";
    /// Fetch the latest save.
    pub const LOAD: &str = "/api/load";
    /// Recent service logs.
    pub const LOGS: &str = "/api/logs";
    /// Truncate the service log.
    pub const CLEAR_LOGS: &str = "/api/logs/clear";
    /// Liveness check.
    pub const HEALTH: &str = "/api/health";
}

/// What the dialogue controller needs from the remote service.
///
/// Implementations never fail: every error path resolves to a fallback.
#[async_trait]
pub trait GameService: Send + Sync {
    /// The NPC's reply to a player line.
    async fn dialogue(&self, request: &DialogueRequest) -> String;

    /// A quest built from the player's suggestion, or a refusal.
    async fn generate_quest(&self, request: &GenerateQuestRequest) -> GenerateQuestResponse;
}

/// reqwest-backed client for the dialogue/quest/save service.
pub struct ServiceClient {
    http: Client,
    base_url: String,
    timeout_ms: u64,
    local_key: String,
    local: Option<Arc<Mutex<LocalSaveStore>>>,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("local_fallback", &self.local.is_some())
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Build a client for `config`. No local save fallback until
    /// [`Self::with_local_store`] is called.
    ///
    /// # Errors
    /// Returns [`ApiError::Request`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_ms: config.request_timeout_ms,
            local_key: config.local_save_key.clone(),
            local: None,
        })
    }

    /// Build a client and open the configured local save store.
    ///
    /// # Errors
    /// [`ApiError::Request`] if the HTTP client cannot be built,
    /// [`ApiError::Local`] if the save file cannot be opened.
    pub fn from_config(config: &OutpostConfig) -> Result<Self> {
        let store = LocalSaveStore::from_config(config)?;
        Ok(Self::new(&config.api)?.with_local_store(store))
    }

    /// Use `store` when the remote save endpoints are unreachable.
    #[must_use]
    pub fn with_local_store(mut self, store: LocalSaveStore) -> Self {
        self.local = Some(Arc::new(Mutex::new(store)));
        self
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ------------------------------------------------------------------
    // Transport
    // ------------------------------------------------------------------

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let start = Instant::now();
        let resp = self.http.post(self.url(path)).json(body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        let parsed = resp.json::<R>().await.map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(path, elapsed_ms = start.elapsed().as_millis(), "Service call succeeded");
        Ok(parsed)
    }

    async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let start = Instant::now();
        let resp = self.http.get(self.url(path)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        let parsed = resp.json::<R>().await.map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!(path, elapsed_ms = start.elapsed().as_millis(), "Service call succeeded");
        Ok(parsed)
    }

    // ------------------------------------------------------------------
    // Dialogue and quests
    // ------------------------------------------------------------------

    /// Ask the service for an NPC reply.
    ///
    /// Connection failures and timeouts resolve to the `connection_error`
    /// line, every other failure to the `custom` line.
    pub async fn send_dialogue(&self, request: &DialogueRequest) -> String {
        match self.post_json::<_, DialogueResponse>(endpoints::DIALOGUE, request).await {
            Ok(reply) => reply
                .into_text()
                .unwrap_or_else(|| fallback::EMPTY_REPLY_LINE.to_string()),
            Err(err) => {
                let topic = err.fallback_topic();
                warn!(npc = %request.npc_name, error = %err, fallback = %topic, "Dialogue request failed");
                topic.line().to_string()
            }
        }
    }

    /// Ask the service to turn a suggestion into a quest.
    pub async fn request_generated_quest(&self, request: &GenerateQuestRequest) -> GenerateQuestResponse {
        match self
            .post_json::<_, GenerateQuestResponse>(endpoints::GENERATE_QUEST, request)
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                warn!(npc = %request.npc_name, error = %err, "Generate quest request failed");
                fallback::generate_quest_failure()
            }
        }
    }

    /// Legacy quest endpoint; failures yield the placeholder quest.
    pub async fn request_quest(&self, data: &serde_json::Value) -> serde_json::Value {
        match self.post_json::<_, serde_json::Value>(endpoints::QUEST, data).await {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "Quest request failed, using placeholder quest");
                fallback::fallback_quest()
            }
        }
    }

    // ------------------------------------------------------------------
    // Save / load
    // ------------------------------------------------------------------

    /// Send a save to the service, falling back to the local store.
    pub async fn save_game(&self, state: &serde_json::Value) -> SaveOutcome {
        match self.post_json::<_, SaveOutcome>(endpoints::SAVE, state).await {
            Ok(outcome) => {
                info!(save_id = ?outcome.save_id, "Game saved remotely");
                outcome
            }
            Err(err) => {
                warn!(error = %err, "Remote save failed, saving locally");
                self.save_local(state)
            }
        }
    }

    /// Serialize and save a [`GameState`].
    pub async fn save_state(&self, state: &mut GameState) -> SaveOutcome {
        match state.to_save() {
            Ok(value) => self.save_game(&value).await,
            Err(err) => {
                warn!(error = %err, "Could not serialize game state");
                SaveOutcome {
                    success: false,
                    message: Some(err.to_string()),
                    save_id: None,
                }
            }
        }
    }

    fn save_local(&self, state: &serde_json::Value) -> SaveOutcome {
        let Some(store) = &self.local else {
            warn!("No local save store configured, save dropped");
            return SaveOutcome {
                success: false,
                message: Some("No local save store configured".to_string()),
                save_id: None,
            };
        };
        match store.lock().save_json(&self.local_key, state) {
            Ok(()) => SaveOutcome::local(),
            Err(err) => {
                warn!(error = %err, "Local save failed");
                SaveOutcome {
                    success: false,
                    message: Some(err.to_string()),
                    save_id: None,
                }
            }
        }
    }

    /// Fetch the latest save from the service, falling back to the local
    /// copy. `None` when neither exists.
    pub async fn load_game(&self) -> Option<serde_json::Value> {
        match self.get_json::<serde_json::Value>(endpoints::LOAD).await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "Remote load failed, reading local save");
                self.load_local()
            }
        }
    }

    fn load_local(&self) -> Option<serde_json::Value> {
        let store = self.local.as_ref()?;
        match store.lock().load_json(&self.local_key) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "Local load failed");
                None
            }
        }
    }

    /// Load and decode a [`GameState`].
    ///
    /// Remote responses wrap the state in `data`; local copies are bare.
    ///
    /// # Errors
    /// Returns [`ApiError::Local`] if the payload is not a game state.
    pub async fn load_state(&self, config: &OutpostConfig) -> Result<Option<GameState>> {
        let Some(mut value) = self.load_game().await else {
            return Ok(None);
        };
        if let Some(data) = value.get_mut("data") {
            value = data.take();
        }
        Ok(Some(GameState::from_save(value, config)?))
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Recent service logs, passed through as JSON.
    pub async fn logs(&self) -> serde_json::Value {
        self.get_json(endpoints::LOGS)
            .await
            .unwrap_or_else(|err| json!({ "success": false, "message": err.to_string() }))
    }

    /// Truncate the service log.
    pub async fn clear_logs(&self) -> serde_json::Value {
        self.post_json(endpoints::CLEAR_LOGS, &json!({}))
            .await
            .unwrap_or_else(|err| json!({ "success": false, "message": err.to_string() }))
    }

    /// Whether the health endpoint answers with a success status.
    pub async fn test_connection(&self) -> bool {
        match self.http.get(self.url(endpoints::HEALTH)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                warn!(error = %err, base_url = %self.base_url, "Service not available");
                false
            }
        }
    }
}

#[async_trait]
impl GameService for ServiceClient {
    async fn dialogue(&self, request: &DialogueRequest) -> String {
        self.send_dialogue(request).await
    }

    async fn generate_quest(&self, request: &GenerateQuestRequest) -> GenerateQuestResponse {
        self.request_generated_quest(request).await
    }
}
