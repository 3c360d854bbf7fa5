use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;

use crate::client::{ChatClient, ChatRequest, ChatResponse};
use crate::config::{ModelManagerConfig, Provider};
use crate::endpoint::Endpoint;
use crate::errors::ModelManagerError;
use crate::providers::{AnthropicClient, OpenAiCompatibleClient};
use crate::strategy;

/// Selects an endpoint per the configured strategy, dispatches a chat
/// request, retries per policy, and owns endpoint health accounting.
pub struct ModelManager {
    config: ModelManagerConfig,
    endpoints: Vec<Arc<Endpoint>>,
    round_robin_counter: AtomicUsize,
    health_check_task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl ModelManager {
    pub fn new(config: ModelManagerConfig) -> Self {
        let endpoints = config
            .endpoints
            .iter()
            .cloned()
            .map(|endpoint_config| {
                let client: Arc<dyn ChatClient> = match endpoint_config.provider {
                    Provider::OpenAiCompatible => Arc::new(OpenAiCompatibleClient::new(
                        endpoint_config.api_key.clone(),
                        endpoint_config.base_url.clone(),
                        endpoint_config.model.clone(),
                    )),
                    Provider::Anthropic => Arc::new(AnthropicClient::new(
                        endpoint_config.api_key.clone(),
                        endpoint_config.base_url.clone(),
                        endpoint_config.model.clone(),
                    )),
                };
                Arc::new(Endpoint::new(endpoint_config, client))
            })
            .collect();
        Self {
            config,
            endpoints,
            round_robin_counter: AtomicUsize::new(0),
            health_check_task: tokio::sync::Mutex::new(None),
        }
    }

    /// Starts the periodic health-check timer unless `user_control.
    /// disable_health_check` is set. Idempotent: a second call replaces the
    /// previous timer rather than stacking another one.
    pub async fn start_health_check_timer(self: &Arc<Self>) {
        if self.config.user_control.disable_health_check {
            return;
        }
        let manager = Arc::clone(self);
        let interval = std::time::Duration::from_millis(self.config.load_balance.health_check_interval_ms);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                for endpoint in &manager.endpoints {
                    endpoint.reset_for_probation().await;
                }
                tracing::debug!(endpoint_count = manager.endpoints.len(), "health check tick");
            }
        });
        *self.health_check_task.lock().await = Some(handle);
    }

    pub async fn stop_health_check_timer(&self) {
        if let Some(handle) = self.health_check_task.lock().await.take() {
            handle.abort();
        }
    }

    async fn available_endpoints(&self) -> Vec<Arc<Endpoint>> {
        let mut available = Vec::new();
        for endpoint in &self.endpoints {
            if endpoint.is_available().await {
                available.push(endpoint.clone());
            }
        }
        available
    }

    /// Runs one attempt against `endpoint`, recording health either way.
    async fn try_endpoint(&self, endpoint: &Arc<Endpoint>, request: &ChatRequest) -> Result<ChatResponse, ModelManagerError> {
        let started = Instant::now();
        let outcome = tokio::time::timeout(self.config.timeout, endpoint.client.chat(request)).await;
        match outcome {
            Ok(Ok(response)) => {
                endpoint
                    .record_success(
                        started.elapsed(),
                        self.config.load_balance.failure_threshold,
                        self.config.load_balance.recovery_threshold,
                    )
                    .await;
                Ok(response)
            }
            Ok(Err(client_error)) => {
                endpoint.record_failure(self.config.load_balance.failure_threshold).await;
                Err(ModelManagerError::Client(client_error))
            }
            Err(_elapsed) => {
                endpoint.record_failure(self.config.load_balance.failure_threshold).await;
                Err(ModelManagerError::Client(crate::errors::ClientError::Timeout))
            }
        }
    }

    /// Generates a completion, retrying across endpoints per the configured
    /// retry policy.
    pub async fn generate(&self, request: &ChatRequest) -> Result<ChatResponse, ModelManagerError> {
        if self.config.user_control.always_retry_all {
            return self.generate_retry_all(request).await;
        }

        let mut last_error = String::new();
        for attempt in 0..=self.config.max_retries {
            let candidates = self.candidates_for_attempt().await?;
            let endpoint = strategy::select(self.config.strategy, &candidates, &self.round_robin_counter)
                .await
                .ok_or(ModelManagerError::NoAvailableEndpoint)?;

            match self.try_endpoint(&endpoint, request).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    last_error = err.to_string();
                    if attempt < self.config.max_retries {
                        tokio::time::sleep(self.config.retry_delay * (attempt + 1)).await;
                    }
                }
            }
        }
        Err(ModelManagerError::AllRetriesExhausted {
            attempts: self.config.max_retries + 1,
            last_error,
        })
    }

    /// `alwaysRetryAll=true`: iterate every available endpoint once,
    /// bypassing `maxRetries`.
    async fn generate_retry_all(&self, request: &ChatRequest) -> Result<ChatResponse, ModelManagerError> {
        let candidates = self.candidates_for_attempt().await?;
        let mut last_error = String::new();
        for (index, endpoint) in candidates.iter().enumerate() {
            match self.try_endpoint(endpoint, request).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    last_error = err.to_string();
                    if index + 1 < candidates.len() {
                        tokio::time::sleep(self.config.retry_delay * (index as u32 + 1)).await;
                    }
                }
            }
        }
        Err(ModelManagerError::AllRetriesExhausted {
            attempts: candidates.len() as u32,
            last_error,
        })
    }

    /// The candidate set for one selection: the available subset, or — when
    /// nothing is available and fallback is enabled — every endpoint in
    /// declaration order regardless of health.
    async fn candidates_for_attempt(&self) -> Result<Vec<Arc<Endpoint>>, ModelManagerError> {
        let available = self.available_endpoints().await;
        if !available.is_empty() {
            return Ok(available);
        }
        if self.config.user_control.enable_fallback_mode {
            Ok(self.endpoints.clone())
        } else {
            Err(ModelManagerError::NoAvailableEndpoint)
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.endpoints.len()
    }

    /// Builds a manager from already-constructed endpoints, bypassing the
    /// provider-from-config wiring in `new`. Exposed (not `cfg(test)`-gated)
    /// so downstream crates can inject a fake `ChatClient` in their own test
    /// harnesses rather than standing up a real HTTP provider.
    #[doc(hidden)]
    pub fn from_endpoints(config: ModelManagerConfig, endpoints: Vec<Arc<Endpoint>>) -> Self {
        Self {
            config,
            endpoints,
            round_robin_counter: AtomicUsize::new(0),
            health_check_task: tokio::sync::Mutex::new(None),
        }
    }
}
