//! The plugin invocation contract: resolve a plugin id to a registered
//! implementation and call it with `{page, parameters, pluginPath}`,
//! expecting back `{success, message?, error?, data?}`. Discovery of what
//! plugins exist on disk, how they're packaged, and how their manifests are
//! parsed is a concern of the host application, not this crate — callers
//! register an already-resolved [`Plugin`] under its id and path.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use cdp_adapter::PageId;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum PluginManagerError {
    #[error("unknown plugin id {id:?}; registered plugins: {available:?}")]
    UnknownPlugin { id: String, available: Vec<String> },
}

/// What a plugin receives when invoked: the current page, the action's
/// parameters, and the path it was registered under.
#[derive(Debug, Clone)]
pub struct PluginInvocation {
    pub page: PageId,
    pub parameters: HashMap<String, Value>,
    pub plugin_path: String,
}

/// What a plugin returns, regardless of outcome — a plugin-level failure is
/// reported through `success: false`, not an `Err`.
#[derive(Debug, Clone, Default)]
pub struct PluginOutcome {
    pub success: bool,
    pub message: Option<String>,
    pub error: Option<String>,
    pub data: Option<Value>,
}

impl PluginOutcome {
    pub fn ok(message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data,
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

#[async_trait]
pub trait Plugin: Send + Sync {
    async fn invoke(&self, invocation: PluginInvocation) -> PluginOutcome;
}

struct PluginEntry {
    path: String,
    plugin: Arc<dyn Plugin>,
}

/// Holds the resolved set of plugins for one agent run and dispatches
/// `execute_plugin` calls against them. One instance per `Agent`: the plugin
/// registry does not outlive the run that built it.
pub struct PluginManager {
    entries: RwLock<HashMap<String, PluginEntry>>,
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn register(&self, id: impl Into<String>, path: impl Into<String>, plugin: Arc<dyn Plugin>) {
        self.entries.write().await.insert(
            id.into(),
            PluginEntry {
                path: path.into(),
                plugin,
            },
        );
    }

    pub async fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.entries.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Resolves `plugin_id` and invokes it with `parameters` against `page`.
    /// An unknown id is a dispatch-level error (caller should fail the
    /// action with the set of registered ids); any other outcome is
    /// reported through the returned [`PluginOutcome`], not this `Result`.
    pub async fn execute_plugin(
        &self,
        plugin_id: &str,
        page: PageId,
        parameters: HashMap<String, Value>,
    ) -> Result<PluginOutcome, PluginManagerError> {
        let entries = self.entries.read().await;
        let entry = match entries.get(plugin_id) {
            Some(entry) => entry,
            None => {
                let mut available: Vec<String> = entries.keys().cloned().collect();
                available.sort();
                return Err(PluginManagerError::UnknownPlugin {
                    id: plugin_id.to_string(),
                    available,
                });
            }
        };
        let invocation = PluginInvocation {
            page,
            parameters,
            plugin_path: entry.path.clone(),
        };
        tracing::debug!(plugin_id, path = %entry.path, "invoking plugin");
        Ok(entry.plugin.invoke(invocation).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoPlugin;

    #[async_trait]
    impl Plugin for EchoPlugin {
        async fn invoke(&self, invocation: PluginInvocation) -> PluginOutcome {
            PluginOutcome::ok("echoed", Some(serde_json::to_value(invocation.parameters).unwrap()))
        }
    }

    struct FailingPlugin;

    #[async_trait]
    impl Plugin for FailingPlugin {
        async fn invoke(&self, _invocation: PluginInvocation) -> PluginOutcome {
            PluginOutcome::failed("plugin blew up")
        }
    }

    #[tokio::test]
    async fn unknown_plugin_lists_registered_ids() {
        let manager = PluginManager::new();
        manager.register("echo", "/plugins/echo.js", Arc::new(EchoPlugin)).await;
        let err = manager
            .execute_plugin("missing", PageId::new(), HashMap::new())
            .await
            .unwrap_err();
        match err {
            PluginManagerError::UnknownPlugin { id, available } => {
                assert_eq!(id, "missing");
                assert_eq!(available, vec!["echo".to_string()]);
            }
        }
    }

    #[tokio::test]
    async fn registered_plugin_is_invoked_with_parameters_and_path() {
        let manager = PluginManager::new();
        manager.register("echo", "/plugins/echo.js", Arc::new(EchoPlugin)).await;
        let mut params = HashMap::new();
        params.insert("greeting".to_string(), Value::String("hi".to_string()));
        let outcome = manager
            .execute_plugin("echo", PageId::new(), params)
            .await
            .unwrap();
        assert!(outcome.success);
        assert_eq!(
            outcome.data.unwrap().get("greeting").unwrap().as_str().unwrap(),
            "hi"
        );
    }

    #[tokio::test]
    async fn plugin_level_failure_is_not_a_manager_error() {
        let manager = PluginManager::new();
        manager.register("fail", "/plugins/fail.js", Arc::new(FailingPlugin)).await;
        let outcome = manager
            .execute_plugin("fail", PageId::new(), HashMap::new())
            .await
            .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.error.as_deref(), Some("plugin blew up"));
    }
}
