use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use browser_session::{BrowserSession, SessionConfig};
use cdp_adapter::{
    CookieParam, Driver, DriverError, DriverOutcome, ElementWaitState as DriverWaitState, PageId,
    TabInfo, WaitUntil as DriverWaitUntil,
};
use model_manager::{
    ChatClient, ChatRequest, ChatResponse, ClientError, Endpoint, EndpointConfig,
    LoadBalanceConfig, ModelManager, ModelManagerConfig, Provider, SelectionStrategy, UserControl,
};
use plugin_manager::PluginManager;

use super::*;

const SNAPSHOT_JSON: &str = r#"{"rootId":"n0","map":{
    "n0":{"tag":"button","text":"Go","attributes":{},"xpath":"/html/body/button[1]","isVisible":true,"isTopElement":true,"isInteractive":true,"isInViewport":true,"interactionType":"click","highlightIndex":0,"children":[]}
}}"#;

struct FakeDriver;

#[async_trait]
impl Driver for FakeDriver {
    async fn navigate(&self, _page: PageId, _url: &str, _timeout: Duration) -> Result<DriverOutcome, DriverError> {
        Ok(DriverOutcome::default())
    }
    async fn evaluate_script(&self, _page: PageId, script: &str) -> Result<serde_json::Value, DriverError> {
        if script.contains("location.href") {
            Ok(serde_json::Value::String(r#"{"url":"https://example.test","title":"Example"}"#.to_string()))
        } else {
            Ok(serde_json::Value::String(SNAPSHOT_JSON.to_string()))
        }
    }
    async fn click(&self, _page: PageId, _selector: &str, _timeout: Duration) -> Result<DriverOutcome, DriverError> {
        Ok(DriverOutcome::default())
    }
    async fn type_text(&self, _page: PageId, _selector: &str, _text: &str, _timeout: Duration) -> Result<(), DriverError> {
        Ok(())
    }
    async fn press_key(&self, _page: PageId, _key: &str, _modifiers: &[String], _timeout: Duration) -> Result<DriverOutcome, DriverError> {
        Ok(DriverOutcome::default())
    }
    async fn scroll(&self, _page: PageId, _dx: i32, _dy: i32) -> Result<(), DriverError> {
        Ok(())
    }
    async fn hover(&self, _page: PageId, _selector: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn drag_and_drop(&self, _page: PageId, _source_selector: &str, _target_selector: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn select_option(&self, _page: PageId, _selector: &str, _value: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn upload_file(&self, _page: PageId, _selector: &str, _file_path: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn set_cookie(&self, _page: PageId, _cookie: CookieParam) -> Result<(), DriverError> {
        Ok(())
    }
    async fn go_back(&self, _page: PageId) -> Result<(), DriverError> {
        Ok(())
    }
    async fn go_forward(&self, _page: PageId) -> Result<(), DriverError> {
        Ok(())
    }
    async fn refresh(&self, _page: PageId) -> Result<(), DriverError> {
        Ok(())
    }
    async fn wait_for_navigation(&self, _page: PageId, _timeout: Duration, _wait_until: DriverWaitUntil) -> Result<(), DriverError> {
        Ok(())
    }
    async fn wait_for_element(&self, _page: PageId, _selector: &str, _timeout: Duration, _state: DriverWaitState) -> Result<(), DriverError> {
        Ok(())
    }
    async fn new_tab(&self, _url: Option<&str>) -> Result<PageId, DriverError> {
        Ok(PageId::new())
    }
    async fn switch_tab(&self, _tab_id: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn close_tab(&self, _tab_id: &str) -> Result<(), DriverError> {
        Ok(())
    }
    async fn list_tabs(&self) -> Result<Vec<TabInfo>, DriverError> {
        Ok(vec![])
    }
    async fn take_screenshot(&self, _page: PageId) -> Result<String, DriverError> {
        Ok("base64data".to_string())
    }
}

/// Returns each scripted response in order, then repeats the last one.
struct ScriptedClient {
    responses: Vec<String>,
    calls: AtomicUsize,
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let content = self.responses.get(index).or_else(|| self.responses.last()).cloned().unwrap_or_default();
        Ok(ChatResponse { content, usage: None })
    }
}

fn model_manager_config() -> ModelManagerConfig {
    ModelManagerConfig {
        strategy: SelectionStrategy::Priority,
        endpoints: Vec::new(),
        temperature: 0.0,
        max_tokens: None,
        max_retries: 0,
        retry_delay: Duration::from_millis(1),
        timeout: Duration::from_secs(5),
        load_balance: LoadBalanceConfig::default(),
        user_control: UserControl::default(),
    }
}

fn scripted_model(responses: Vec<&str>) -> ModelManager {
    let client: Arc<dyn ChatClient> = Arc::new(ScriptedClient {
        responses: responses.into_iter().map(String::from).collect(),
        calls: AtomicUsize::new(0),
    });
    let endpoint_config = EndpointConfig {
        provider: Provider::OpenAiCompatible,
        api_key: "test".to_string(),
        base_url: None,
        model: "test-model".to_string(),
        priority: 0,
        weight: 1.0,
        enabled: true,
    };
    ModelManager::from_endpoints(model_manager_config(), vec![Arc::new(Endpoint::new(endpoint_config, client))])
}

async fn harness(responses: Vec<&str>, config: AgentLoopConfig) -> AgentLoop {
    let driver: Arc<dyn cdp_adapter::Driver> = Arc::new(FakeDriver);
    let session = Arc::new(BrowserSession::new(driver, SessionConfig::default()));
    let plugins = Arc::new(PluginManager::new());
    let controller = Controller::new(Arc::clone(&session), plugins);
    let model = Arc::new(scripted_model(responses));
    AgentLoop::new(config, session, controller, model)
}

const CLICK_DECISION: &str = r#"{"thinking":null,"evaluation_previous_goal":"starting","memory":"clicked once","next_goal":"finish the task","tab_decision":{"should_switch":false,"reason":"stay"},"action":{"type":"click","index":0,"locator":{}}}"#;

const DONE_DECISION: &str = r#"{"thinking":null,"evaluation_previous_goal":"clicked the button","memory":"done","next_goal":"task complete","tab_decision":{"should_switch":false,"reason":"stay"},"action":{"type":"done","message":"finished","success":true}}"#;

#[tokio::test]
async fn run_completes_on_a_done_action_and_reports_success() {
    let agent = harness(vec![CLICK_DECISION, DONE_DECISION], AgentLoopConfig::minimal()).await;
    let result = agent.run("click the button").await;

    assert!(result.completed);
    assert!(result.success);
    assert_eq!(result.metadata.termination_reason, TerminationReason::Done);
    assert_eq!(result.steps.len(), 2);
    assert_eq!(result.steps[1].output.next_goal, "task complete");
}

#[tokio::test]
async fn run_exhausts_max_steps_when_the_model_never_signals_done() {
    let config = AgentLoopConfig::minimal().max_steps(3);
    let agent = harness(vec![CLICK_DECISION], config).await;
    let result = agent.run("click forever").await;

    assert!(!result.success);
    assert_eq!(result.metadata.termination_reason, TerminationReason::MaxStepsExhausted);
    assert_eq!(result.steps.len(), 3);
}

#[tokio::test]
async fn identical_clicks_trip_loop_detection_and_force_termination() {
    let config = AgentLoopConfig::minimal().max_steps(10).max_similar_actions(2);
    let agent = harness(vec![CLICK_DECISION], config).await;
    let result = agent.run("click the button repeatedly").await;

    assert_eq!(result.metadata.termination_reason, TerminationReason::ForcedByLoopDetection);
    assert!(!result.success);
}

#[tokio::test]
async fn stop_called_before_run_terminates_on_the_first_iteration_with_failure() {
    let agent = harness(vec![CLICK_DECISION], AgentLoopConfig::minimal().max_steps(10)).await;
    agent.stop();
    let result = agent.run("click the button repeatedly").await;

    assert!(!result.success);
    assert_eq!(result.metadata.termination_reason, TerminationReason::StoppedByCaller);
    assert!(result.steps.is_empty());
}

#[tokio::test]
async fn an_action_targeting_a_missing_element_index_is_skipped_not_executed() {
    let out_of_range = r#"{"thinking":null,"evaluation_previous_goal":null,"memory":null,"next_goal":"click a nonexistent element","tab_decision":{"should_switch":false,"reason":"stay"},"action":{"type":"click","index":99,"locator":{}}}"#;
    let config = AgentLoopConfig::minimal().max_steps(2);
    let agent = harness(vec![out_of_range, DONE_DECISION], config).await;
    let result = agent.run("click something invalid").await;

    assert!(result.steps.iter().all(|step| step.output.action.target_index() != Some(99)));
}
