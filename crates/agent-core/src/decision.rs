//! Parses the model's raw response into an [`AgentOutput`], with a lenient
//! repair pass before falling back to a synthesized wait action.

use serde_json::Value;

use crate::types::AgentOutput;

/// The JSON schema handed to the model as `response_schema`. `action` is
/// left as a permissive object — enumerating every one
/// of `core_types::Action`'s 27 variants here would duplicate that enum's
/// own shape; the prompt text (built in `message_manager`) carries the
/// concrete action vocabulary and per-type fields instead.
pub fn decision_schema() -> Value {
    serde_json::json!({
        "type": "object",
        "additionalProperties": false,
        "required": ["thinking", "evaluation_previous_goal", "memory", "next_goal", "tab_decision", "action"],
        "properties": {
            "thinking": {"type": "string"},
            "evaluation_previous_goal": {"type": ["string", "null"]},
            "memory": {"type": ["string", "null"]},
            "next_goal": {"type": "string"},
            "tab_decision": {
                "type": "object",
                "additionalProperties": false,
                "required": ["should_switch", "reason"],
                "properties": {
                    "should_switch": {"type": "boolean"},
                    "target_tab_id": {"type": ["string", "null"]},
                    "reason": {"type": "string"},
                },
            },
            "action": {"type": "object"},
        },
    })
}

/// Parses `raw` into an `AgentOutput`, repairing common malformations a
/// model is prone to before giving up and returning the wait fallback.
pub fn parse_agent_output(raw: &str) -> AgentOutput {
    if let Ok(output) = serde_json::from_str::<AgentOutput>(raw) {
        return output;
    }
    let repaired = repair(raw);
    match serde_json::from_str::<AgentOutput>(&repaired) {
        Ok(output) => output,
        Err(error) => {
            tracing::warn!(error = %error, raw = %raw, "could not parse model output; falling back to wait");
            AgentOutput::fallback_wait()
        }
    }
}

/// Strips markdown code fences, removes trailing commas before `}`/`]`,
/// escapes bare control characters inside string literals, and — if the
/// repaired text is a JSON array — takes its first object.
fn repair(raw: &str) -> String {
    let without_fences = strip_markdown_fences(raw.trim());
    let without_trailing_commas = strip_trailing_commas(&without_fences);
    let escaped = escape_control_chars(&without_trailing_commas);
    first_object_if_array(&escaped)
}

fn strip_markdown_fences(text: &str) -> String {
    let text = text.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        let rest = rest.trim_start_matches('\n');
        if let Some(body) = rest.strip_suffix("```") {
            return body.trim().to_string();
        }
        return rest.trim().to_string();
    }
    text.to_string()
}

fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ',' {
            let mut lookahead = chars.clone();
            while let Some(next) = lookahead.peek() {
                if next.is_whitespace() {
                    lookahead.next();
                } else {
                    break;
                }
            }
            if matches!(lookahead.peek(), Some('}') | Some(']')) {
                continue;
            }
        }
        result.push(c);
    }
    result
}

/// Escapes raw `\n`/`\r`/`\t` bytes that appear inside string literals
/// (models sometimes emit literal newlines instead of `\n`).
fn escape_control_chars(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if in_string {
            if escaped {
                result.push(c);
                escaped = false;
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    result.push(c);
                }
                '"' => {
                    in_string = false;
                    result.push(c);
                }
                '\n' => result.push_str("\\n"),
                '\r' => result.push_str("\\r"),
                '\t' => result.push_str("\\t"),
                _ => result.push(c),
            }
        } else {
            if c == '"' {
                in_string = true;
            }
            result.push(c);
        }
    }
    result
}

fn first_object_if_array(text: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(text) else {
        return text.to_string();
    };
    match value {
        Value::Array(items) => items
            .into_iter()
            .next()
            .map(|first| first.to_string())
            .unwrap_or_else(|| text.to_string()),
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Action;

    fn valid_json() -> String {
        serde_json::json!({
            "thinking": "looking at the page",
            "evaluation_previous_goal": null,
            "memory": null,
            "next_goal": "click submit",
            "tab_decision": {"should_switch": false, "reason": "fine here"},
            "action": {"type": "wait", "seconds": 1.0},
        })
        .to_string()
    }

    #[test]
    fn well_formed_json_parses_directly() {
        let output = parse_agent_output(&valid_json());
        assert_eq!(output.next_goal, "click submit");
        assert!(matches!(output.action, Action::Wait { .. }));
    }

    #[test]
    fn markdown_fenced_json_is_stripped_and_parsed() {
        let fenced = format!("```json\n{}\n```", valid_json());
        let output = parse_agent_output(&fenced);
        assert_eq!(output.next_goal, "click submit");
    }

    #[test]
    fn trailing_comma_before_closing_brace_is_repaired() {
        let with_trailing_comma = valid_json().replacen('}', ",}", 1);
        // Insert after the first object-opening isn't meaningful; build a
        // concrete malformed example instead.
        let malformed = r#"{"thinking":"x","evaluation_previous_goal":null,"memory":null,"next_goal":"g","tab_decision":{"should_switch":false,"reason":"r",},"action":{"type":"wait","seconds":1.0,}}"#;
        let output = parse_agent_output(malformed);
        assert_eq!(output.next_goal, "g");
        let _ = with_trailing_comma;
    }

    #[test]
    fn array_wrapped_object_takes_the_first_element() {
        let wrapped = format!("[{}]", valid_json());
        let output = parse_agent_output(&wrapped);
        assert_eq!(output.next_goal, "click submit");
    }

    #[test]
    fn unrecoverable_garbage_falls_back_to_wait() {
        let output = parse_agent_output("not json at all {{{");
        assert!(matches!(output.action, Action::Wait { seconds } if seconds == 1.0));
    }
}
