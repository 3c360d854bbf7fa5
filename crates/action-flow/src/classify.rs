//! Error classification: turns a `SessionError` into the `ActionResult`
//! the controller reports, without ever letting the error cross `dispatch`.

use browser_session::SessionError;
use cdp_adapter::DriverError;
use core_types::ActionResult;

/// Substrings that mean "stop the whole run", matched against the error's
/// `Display` text the same way context-destruction is.
const CRITICAL_PATTERNS: &[&str] = &[
    "Browser session not started",
    "Browser crashed",
    "Authentication failed",
];

pub fn is_critical_message(message: &str) -> bool {
    CRITICAL_PATTERNS.iter().any(|pattern| message.contains(pattern))
}

fn recovery_hint(err: &SessionError) -> &'static str {
    match err {
        SessionError::Driver(DriverError::ElementNotFound(_)) => "scroll or wait",
        SessionError::Driver(DriverError::ElementNotClickable(_)) => "covered by overlay",
        SessionError::Driver(DriverError::NavigationTimeout(_)) => "page changed",
        SessionError::Driver(DriverError::TabNotFound(_)) => "page changed",
        SessionError::Primitive(inner) => match inner.to_string() {
            ref s if s.contains("not found") => "scroll or wait",
            ref s if s.contains("not clickable") => "covered by overlay",
            _ => "page changed",
        },
        SessionError::NoActivePage => "page changed",
        _ => "page changed",
    }
}

/// Translates a failed session call into the `ActionResult` the agent sees.
/// Navigation-during-action is folded into a successful, navigation-flagged
/// result rather than re-raised; `NoActivePage` is treated as the critical
/// "browser session not started" case regardless of its own wording, since
/// there is no recovering from it mid-run.
pub fn classify_session_error(err: SessionError) -> ActionResult {
    let message = err.to_string();
    if cdp_adapter::looks_like_context_destroyed(&message) {
        return ActionResult::ok("navigation detected during action").with_navigation(true);
    }
    if matches!(err, SessionError::NoActivePage) {
        return ActionResult::failed("Browser session not started".to_string());
    }
    let hint = recovery_hint(&err);
    ActionResult::failed(format!("{message} ({hint})"))
}

/// True when `result` represents one of the critical errors the agent loop
/// must break on immediately rather than recording and continuing.
pub fn is_critical(result: &ActionResult) -> bool {
    result
        .error
        .as_deref()
        .map(is_critical_message)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_destroyed_message_becomes_successful_navigation() {
        let err = SessionError::Driver(DriverError::Other(
            "Execution context was destroyed".to_string(),
        ));
        let result = classify_session_error(err);
        assert!(result.success);
        assert_eq!(result.navigation_detected, Some(true));
    }

    #[test]
    fn element_not_found_gets_scroll_or_wait_hint() {
        let err = SessionError::Driver(DriverError::ElementNotFound("#submit".to_string()));
        let result = classify_session_error(err);
        assert!(!result.success);
        assert!(result.error.unwrap().contains("scroll or wait"));
    }

    #[test]
    fn no_active_page_is_critical() {
        let result = classify_session_error(SessionError::NoActivePage);
        assert!(is_critical(&result));
    }
}
