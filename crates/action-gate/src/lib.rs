//! Pre-execution validation: catches malformed actions before the controller
//! makes any driver call. Constraints that might otherwise be runtime checks
//! ("click requires a numeric index") are structural here — `Action`'s
//! tagged-enum shape makes them unrepresentable — so this gate only checks
//! what the type system can't: value ranges and non-empty strings.

use core_types::Action;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("navigate url does not look like a url: {0:?}")]
    InvalidUrl(String),
    #[error("wait seconds must be positive, got {0}")]
    NonPositiveWait(f64),
    #[error("done requires a non-empty message")]
    EmptyDoneMessage,
    #[error("key_press requires a non-empty key")]
    EmptyKey,
    #[error("upload_file requires a non-empty file_path")]
    EmptyFilePath,
    #[error("set_cookie requires a non-empty cookie name")]
    EmptyCookieName,
    #[error("switch_tab requires a non-empty tab_id")]
    EmptyTabId,
    #[error("close_tab requires a non-empty tab_id")]
    EmptyCloseTabId,
    #[error("execute_script requires a non-empty script")]
    EmptyScript,
    #[error("{label} requires a non-empty selector")]
    EmptySelector { label: &'static str },
    #[error("{label} requires a positive timeout_ms")]
    NonPositiveTimeout { label: &'static str },
    #[error("execute_plugin requires a non-empty plugin_id")]
    EmptyPluginId,
    #[error("create_page_effect requires a non-empty effect_id")]
    EmptyEffectId,
    #[error("modify_page requires at least one modification")]
    EmptyModifications,
}

fn looks_like_url(candidate: &str) -> bool {
    candidate.starts_with("http://")
        || candidate.starts_with("https://")
        || candidate.starts_with("file://")
        || candidate.starts_with("about:")
        || candidate.starts_with("data:")
}

/// Validates `action`, raising before any side effect if it would fail on
/// contact with the driver for a reason the type system can't catch.
pub fn validate(action: &Action) -> Result<(), ValidationError> {
    match action {
        Action::Click { .. }
        | Action::Type { .. }
        | Action::Hover { .. }
        | Action::Select { .. }
        | Action::DragDrop { .. }
        | Action::TakeScreenshot
        | Action::GoBack
        | Action::GoForward
        | Action::Refresh
        | Action::WrapPageIframe => Ok(()),

        Action::Navigate { url } => {
            if looks_like_url(url) {
                Ok(())
            } else {
                Err(ValidationError::InvalidUrl(url.clone()))
            }
        }

        Action::Scroll { .. } => Ok(()),

        Action::Wait { seconds } => {
            if *seconds > 0.0 {
                Ok(())
            } else {
                Err(ValidationError::NonPositiveWait(*seconds))
            }
        }

        Action::Done { message, .. } => {
            if message.trim().is_empty() {
                Err(ValidationError::EmptyDoneMessage)
            } else {
                Ok(())
            }
        }

        Action::KeyPress { key, .. } => {
            if key.is_empty() {
                Err(ValidationError::EmptyKey)
            } else {
                Ok(())
            }
        }

        Action::UploadFile { file_path, .. } => {
            if file_path.trim().is_empty() {
                Err(ValidationError::EmptyFilePath)
            } else {
                Ok(())
            }
        }

        Action::ExtractData { .. } => Ok(()),

        Action::ExecuteScript { script, .. } => {
            if script.trim().is_empty() {
                Err(ValidationError::EmptyScript)
            } else {
                Ok(())
            }
        }

        Action::SwitchTab { tab_id } => {
            if tab_id.trim().is_empty() {
                Err(ValidationError::EmptyTabId)
            } else {
                Ok(())
            }
        }

        Action::NewTab { .. } => Ok(()),

        Action::CloseTab { tab_id } => match tab_id {
            Some(id) if id.trim().is_empty() => Err(ValidationError::EmptyCloseTabId),
            _ => Ok(()),
        },

        Action::SetCookie { name, .. } => {
            if name.trim().is_empty() {
                Err(ValidationError::EmptyCookieName)
            } else {
                Ok(())
            }
        }

        Action::WaitForElement {
            selector,
            timeout_ms,
            ..
        } => {
            if selector.trim().is_empty() {
                Err(ValidationError::EmptySelector {
                    label: "wait_for_element",
                })
            } else if *timeout_ms == 0 {
                Err(ValidationError::NonPositiveTimeout {
                    label: "wait_for_element",
                })
            } else {
                Ok(())
            }
        }

        Action::WaitForNavigation { timeout_ms, .. } => {
            if *timeout_ms == 0 {
                Err(ValidationError::NonPositiveTimeout {
                    label: "wait_for_navigation",
                })
            } else {
                Ok(())
            }
        }

        Action::ExecutePlugin { plugin_id, .. } => {
            if plugin_id.trim().is_empty() {
                Err(ValidationError::EmptyPluginId)
            } else {
                Ok(())
            }
        }

        Action::CreatePageEffect { effect_id, .. } => {
            if effect_id.trim().is_empty() {
                Err(ValidationError::EmptyEffectId)
            } else {
                Ok(())
            }
        }

        Action::ModifyPage { modifications, .. } => {
            if modifications.is_empty() {
                Err(ValidationError::EmptyModifications)
            } else {
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_rejects_non_url_strings() {
        let action = Action::Navigate {
            url: "not a url".to_string(),
        };
        assert!(matches!(validate(&action), Err(ValidationError::InvalidUrl(_))));
    }

    #[test]
    fn navigate_accepts_http_and_about_urls() {
        assert!(validate(&Action::Navigate {
            url: "https://example.com".to_string()
        })
        .is_ok());
        assert!(validate(&Action::Navigate {
            url: "about:blank".to_string()
        })
        .is_ok());
    }

    #[test]
    fn wait_rejects_zero_and_negative_seconds() {
        assert!(matches!(
            validate(&Action::Wait { seconds: 0.0 }),
            Err(ValidationError::NonPositiveWait(_))
        ));
        assert!(matches!(
            validate(&Action::Wait { seconds: -1.0 }),
            Err(ValidationError::NonPositiveWait(_))
        ));
        assert!(validate(&Action::Wait { seconds: 0.5 }).is_ok());
    }

    #[test]
    fn done_rejects_empty_message() {
        let action = Action::Done {
            message: "   ".to_string(),
            success: true,
        };
        assert!(matches!(validate(&action), Err(ValidationError::EmptyDoneMessage)));
    }

    #[test]
    fn click_is_always_structurally_valid() {
        let action = Action::Click {
            index: 0,
            locator: Default::default(),
        };
        assert!(validate(&action).is_ok());
    }
}
