//! Multi-endpoint model manager: picks an endpoint by strategy, dispatches a
//! chat request, retries on failure, and tracks per-endpoint health.

mod client;
mod config;
mod endpoint;
mod errors;
mod manager;
mod providers;
mod strategy;

pub use client::{ChatClient, ChatMessage, ChatRequest, ChatResponse, ContentPart, Role, Usage};
pub use config::{
    EndpointConfig, LoadBalanceConfig, ModelManagerConfig, Provider, SelectionStrategy, UserControl,
    DEFAULT_MAX_TOKENS_FALLBACK,
};
pub use endpoint::{Endpoint, EndpointHealth, HealthStatus};
pub use errors::{ClientError, ModelManagerError};
pub use manager::ModelManager;
pub use providers::{AnthropicClient, OpenAiCompatibleClient};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// A `ChatClient` that fails its first `fail_times` calls, then succeeds.
    struct FlakyClient {
        fail_times: u32,
        calls: AtomicU32,
    }

    impl FlakyClient {
        fn new(fail_times: u32) -> Self {
            Self {
                fail_times,
                calls: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatClient for FlakyClient {
        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ClientError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.fail_times {
                Err(ClientError::Provider("rate limited".to_string()))
            } else {
                Ok(ChatResponse {
                    content: "ok".to_string(),
                    usage: None,
                })
            }
        }
    }

    struct AlwaysFailsClient;

    #[async_trait]
    impl ChatClient for AlwaysFailsClient {
        async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ClientError> {
            Err(ClientError::Provider("down".to_string()))
        }
    }

    fn endpoint_config(priority: u32) -> EndpointConfig {
        EndpointConfig {
            provider: Provider::OpenAiCompatible,
            api_key: "key".to_string(),
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            priority,
            weight: 1.0,
            enabled: true,
        }
    }

    fn fake_manager(
        endpoints: Vec<(u32, Arc<dyn ChatClient>)>,
        max_retries: u32,
        always_retry_all: bool,
        enable_fallback_mode: bool,
    ) -> ModelManager {
        let built: Vec<Arc<Endpoint>> = endpoints
            .into_iter()
            .map(|(priority, client)| Arc::new(Endpoint::new(endpoint_config(priority), client)))
            .collect();
        let config = ModelManagerConfig {
            strategy: SelectionStrategy::Priority,
            endpoints: vec![],
            temperature: 0.0,
            max_tokens: Some(512),
            max_retries,
            retry_delay: Duration::from_millis(1),
            timeout: Duration::from_millis(200),
            load_balance: LoadBalanceConfig::default(),
            user_control: UserControl {
                always_retry_all,
                enable_fallback_mode,
                ..UserControl::default()
            },
        };
        ModelManager::from_endpoints(config, built)
    }

    #[tokio::test]
    async fn retries_until_the_flaky_client_succeeds() {
        let manager = fake_manager(vec![(0, Arc::new(FlakyClient::new(2)))], 2, false, false);
        let response = manager.generate(&ChatRequest::default()).await.unwrap();
        assert_eq!(response.content, "ok");
    }

    #[tokio::test]
    async fn exhausts_retries_and_reports_the_last_error() {
        let manager = fake_manager(vec![(0, Arc::new(AlwaysFailsClient))], 2, false, false);
        let err = manager.generate(&ChatRequest::default()).await.unwrap_err();
        match err {
            ModelManagerError::AllRetriesExhausted { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected AllRetriesExhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn always_retry_all_tries_every_endpoint_once() {
        let manager = fake_manager(
            vec![
                (0, Arc::new(AlwaysFailsClient)),
                (1, Arc::new(FlakyClient::new(0))),
            ],
            0,
            true,
            false,
        );
        let response = manager.generate(&ChatRequest::default()).await.unwrap();
        assert_eq!(response.content, "ok");
    }

    #[tokio::test]
    async fn priority_selects_the_lowest_priority_endpoint_first() {
        // Priority 1's client always succeeds; priority 5's always fails.
        // A successful first attempt proves selection picked priority 1.
        let manager = fake_manager(
            vec![
                (5, Arc::new(AlwaysFailsClient)),
                (1, Arc::new(FlakyClient::new(0))),
            ],
            0,
            false,
            false,
        );
        let response = manager.generate(&ChatRequest::default()).await.unwrap();
        assert_eq!(response.content, "ok");
    }

    #[tokio::test]
    async fn unhealthy_endpoints_are_excluded_once_the_failure_threshold_trips() {
        let manager = fake_manager(vec![(0, Arc::new(AlwaysFailsClient))], 10, false, false);
        let _ = manager.generate(&ChatRequest::default()).await;
        // load_balance.failure_threshold defaults to 3; after enough failed
        // attempts the single endpoint goes unhealthy and, with fallback
        // disabled, the next call fails fast rather than dispatching.
        let err = manager.generate(&ChatRequest::default()).await.unwrap_err();
        assert!(matches!(
            err,
            ModelManagerError::NoAvailableEndpoint | ModelManagerError::AllRetriesExhausted { .. }
        ));
    }
}
