//! The action dispatcher: maps one `Action` to the matching
//! `BrowserSession`/`PluginManager` calls and classifies the outcome into an
//! `ActionResult`. Dispatch is exhaustive over `Action`'s variants so adding
//! one forces this match to be revisited.

use std::sync::Arc;
use std::time::Duration;

use browser_session::BrowserSession;
use cdp_adapter::PageId;
use core_types::{Action, ActionResult, ActionResultMetadata, DOMState, LocatorFallback};
use plugin_manager::PluginManager;

use crate::classify::classify_session_error;
use crate::page_effects::{iframe_wrap_script, modify_page_script};

pub struct Controller {
    session: Arc<BrowserSession>,
    plugins: Arc<PluginManager>,
}

impl Controller {
    pub fn new(session: Arc<BrowserSession>, plugins: Arc<PluginManager>) -> Self {
        Self { session, plugins }
    }

    /// Validates `action`, then executes it. Validation failures and driver
    /// failures are both folded into a failed `ActionResult` — nothing but a
    /// successfully-returned `ActionResult` ever reaches the caller; no
    /// exception crosses this call except a programmer error.
    pub async fn dispatch(&self, action: &Action, dom_state: &DOMState) -> ActionResult {
        if let Err(err) = action_gate::validate(action) {
            return ActionResult::failed(err.to_string());
        }
        let started = std::time::Instant::now();
        let mut result = self.dispatch_inner(action, dom_state).await;
        if let Some(metadata) = result.metadata.as_mut() {
            metadata.duration_ms = Some(started.elapsed().as_millis() as u64);
        } else {
            result.metadata = Some(ActionResultMetadata {
                duration_ms: Some(started.elapsed().as_millis() as u64),
                ..Default::default()
            });
        }
        result
    }

    async fn dispatch_inner(&self, action: &Action, dom_state: &DOMState) -> ActionResult {
        match action {
            Action::Click { index, locator } => {
                match self.session.click(*index, dom_state, locator).await {
                    Ok(navigated) => ActionResult::ok(format!("clicked element {index}"))
                        .with_navigation(navigated),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::Type { index, text, locator } => {
                match self.session.type_text(*index, text, dom_state, locator).await {
                    Ok(()) => ActionResult::ok(format!("typed into element {index}")),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::Navigate { url } => match self.session.navigate(url).await {
                Ok(_) => ActionResult::ok(format!("navigated to {url}")).with_navigation(true),
                Err(err) => classify_session_error(err),
            },

            Action::Scroll { direction, amount } => {
                match self.session.scroll(*direction, *amount).await {
                    Ok(()) => ActionResult::ok("scrolled"),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::Wait { seconds } => {
                tokio::time::sleep(Duration::from_secs_f64(*seconds)).await;
                ActionResult::ok(format!("waited {seconds}s"))
            }

            Action::Done { message, success } => ActionResult {
                success: *success,
                message: Some(message.clone()),
                ..Default::default()
            },

            Action::Hover { index, locator } => {
                match self.session.hover(*index, dom_state, locator).await {
                    Ok(()) => ActionResult::ok(format!("hovered element {index}")),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::DragDrop { source_index, target_index } => {
                let fallback = LocatorFallback::default();
                match self
                    .session
                    .drag_and_drop(*source_index, *target_index, dom_state, &fallback, &fallback)
                    .await
                {
                    Ok(()) => ActionResult::ok(format!(
                        "dragged element {source_index} onto {target_index}"
                    )),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::KeyPress { key, modifiers, .. } => {
                match self.session.press_key(key, modifiers).await {
                    Ok(navigated) => {
                        ActionResult::ok(format!("pressed {key}")).with_navigation(navigated)
                    }
                    Err(err) => classify_session_error(err),
                }
            }

            Action::Select { index, value } => {
                let fallback = LocatorFallback::default();
                match self.session.select_option(*index, value, dom_state, &fallback).await {
                    Ok(()) => ActionResult::ok(format!("selected {value:?} on element {index}")),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::UploadFile { index, file_path } => {
                let fallback = LocatorFallback::default();
                match self
                    .session
                    .upload_file(*index, file_path, dom_state, &fallback)
                    .await
                {
                    Ok(()) => ActionResult::ok(format!("uploaded {file_path} to element {index}")),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::TakeScreenshot => match self.session.take_screenshot().await {
                Ok(data) => ActionResult {
                    success: true,
                    message: Some("screenshot captured".to_string()),
                    screenshot: Some(data),
                    ..Default::default()
                },
                Err(err) => classify_session_error(err),
            },

            Action::ExtractData { selector, description } => {
                self.extract_data(selector.as_deref(), description.as_deref()).await
            }

            Action::ExecuteScript { script, args } => {
                let full_script = if args.is_empty() {
                    script.clone()
                } else {
                    let args_json = serde_json::to_string(args).unwrap_or_else(|_| "[]".to_string());
                    format!("(function(args) {{ {script} }})({args_json})")
                };
                match self.session.execute_script(&full_script).await {
                    Ok(value) => ActionResult {
                        success: true,
                        message: Some("script executed".to_string()),
                        extracted_content: Some(value.to_string()),
                        ..Default::default()
                    },
                    Err(err) => classify_session_error(err),
                }
            }

            Action::SwitchTab { tab_id } => match self.session.switch_tab(tab_id).await {
                Ok(()) => ActionResult::ok(format!("switched to tab {tab_id}")),
                Err(err) => classify_session_error(err),
            },

            Action::NewTab { url } => match self.session.new_tab(url.as_deref()).await {
                Ok(()) => ActionResult::ok("opened new tab"),
                Err(err) => classify_session_error(err),
            },

            Action::CloseTab { tab_id } => {
                let target = match tab_id {
                    Some(id) => id.clone(),
                    None => match self.session.current_page().await {
                        Ok(page) => page_id_as_str(page),
                        Err(err) => return classify_session_error(err),
                    },
                };
                match self.session.close_tab(&target).await {
                    Ok(()) => ActionResult::ok(format!("closed tab {target}")),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::GoBack => match self.session.go_back().await {
                Ok(()) => ActionResult::ok("went back").with_navigation(true),
                Err(err) => classify_session_error(err),
            },

            Action::GoForward => match self.session.go_forward().await {
                Ok(()) => ActionResult::ok("went forward").with_navigation(true),
                Err(err) => classify_session_error(err),
            },

            Action::Refresh => match self.session.refresh().await {
                Ok(()) => ActionResult::ok("refreshed").with_navigation(true),
                Err(err) => classify_session_error(err),
            },

            Action::SetCookie { name, value, domain } => {
                match self.session.set_cookie(name, value, domain.clone()).await {
                    Ok(()) => ActionResult::ok(format!("set cookie {name}")),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::WaitForElement { selector, timeout_ms, state } => {
                match self
                    .session
                    .wait_for_element(selector, Duration::from_millis(*timeout_ms), *state)
                    .await
                {
                    Ok(()) => ActionResult::ok(format!("element {selector} reached {state:?}")),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::WaitForNavigation { timeout_ms, wait_until } => {
                match self
                    .session
                    .wait_for_navigation(Duration::from_millis(*timeout_ms), wait_until.clone())
                    .await
                {
                    Ok(()) => ActionResult::ok("navigation settled").with_navigation(true),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::ExecutePlugin { plugin_id, parameters } => {
                self.execute_plugin(plugin_id, parameters.clone()).await
            }

            Action::CreatePageEffect { effect_id, parameters } => {
                self.execute_plugin(effect_id, parameters.clone()).await
            }

            Action::ModifyPage { modifications, preserve_original } => {
                let script = modify_page_script(modifications, *preserve_original);
                match self.session.execute_script(&script).await {
                    Ok(_) => ActionResult::ok(format!("applied {} modification(s)", modifications.len())),
                    Err(err) => classify_session_error(err),
                }
            }

            Action::WrapPageIframe => match self.session.execute_script(&iframe_wrap_script()).await {
                Ok(_) => ActionResult::ok("wrapped page in iframe"),
                Err(err) => classify_session_error(err),
            },
        }
    }

    /// Resolves `plugin_id` through the plugin manager and folds its
    /// outcome into an `ActionResult`; an unknown id fails the action with
    /// the set of registered ids.
    async fn execute_plugin(
        &self,
        plugin_id: &str,
        parameters: std::collections::HashMap<String, serde_json::Value>,
    ) -> ActionResult {
        let page = match self.session.current_page().await {
            Ok(page) => page,
            Err(err) => return classify_session_error(err),
        };
        match self.plugins.execute_plugin(plugin_id, page, parameters).await {
            Ok(outcome) => ActionResult {
                success: outcome.success,
                message: outcome.message,
                error: outcome.error,
                extracted_content: outcome.data.map(|v| v.to_string()),
                ..Default::default()
            },
            Err(err) => ActionResult::failed(err.to_string()),
        }
    }

    async fn extract_data(&self, selector: Option<&str>, description: Option<&str>) -> ActionResult {
        let script = match selector {
            Some(selector) => format!(
                "JSON.stringify(Array.prototype.map.call(document.querySelectorAll({}), function(el) {{ return el.innerText || el.textContent || \"\"; }}))",
                serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string())
            ),
            None => "JSON.stringify(document.body.innerText || document.body.textContent || \"\")".to_string(),
        };
        match self.session.execute_script(&script).await {
            Ok(value) => {
                let extracted = value.as_str().map(|s| s.to_string()).unwrap_or_else(|| value.to_string());
                let message = match description {
                    Some(description) => format!("extracted data for: {description}"),
                    None => "extracted data".to_string(),
                };
                ActionResult {
                    success: true,
                    message: Some(message),
                    extracted_content: Some(extracted),
                    ..Default::default()
                }
            }
            Err(err) => classify_session_error(err),
        }
    }
}

fn page_id_as_str(page: PageId) -> String {
    page.0.to_string()
}
