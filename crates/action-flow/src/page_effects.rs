//! Script generation for the page-effect action kinds (`modify_page`,
//! `wrap_page_iframe`, `create_page_effect`): these describe DOM mutations
//! declaratively, so the controller lowers them to one `execute_script` call
//! rather than routing them through a third-party plugin.

use core_types::{DomModification, DomMutationKind, ElementSpec, InsertPosition};

/// Wraps the page in an iframe with three fixed-position sibling layers so a
/// later `create_page_effect`/`modify_page` can add elements without
/// perturbing the original layout. Idempotent: a page already wrapped
/// is left alone.
pub fn iframe_wrap_script() -> String {
    r#"(function() {
        if (document.documentElement.dataset.navigatorWrapped === "true") {
            return { success: true, message: "already wrapped" };
        }
        var original = document.createElement("iframe");
        original.id = "navigator-original-page";
        original.style.cssText = "position:fixed;inset:0;width:100%;height:100%;border:0;z-index:1;";
        var originalHtml = document.documentElement.outerHTML;
        var bodyChildren = Array.prototype.slice.call(document.body.children);

        var background = document.createElement("div");
        background.id = "navigator-layer-background";
        background.style.cssText = "position:fixed;inset:0;z-index:0;";

        var overlay = document.createElement("div");
        overlay.id = "navigator-layer-overlay";
        overlay.style.cssText = "position:fixed;inset:0;z-index:2;pointer-events:none;";

        var interaction = document.createElement("div");
        interaction.id = "navigator-layer-interaction";
        interaction.style.cssText = "position:fixed;inset:0;z-index:3;pointer-events:none;";

        document.body.innerHTML = "";
        document.body.appendChild(background);
        document.body.appendChild(original);
        document.body.appendChild(overlay);
        document.body.appendChild(interaction);
        document.documentElement.dataset.navigatorWrapped = "true";

        original.addEventListener("load", function() {
            var doc = original.contentDocument;
            doc.open();
            doc.write(originalHtml);
            doc.close();
        });
        original.src = "about:blank";
        return { success: true, message: "wrapped" };
    })()"#
        .to_string()
}

fn js_string_literal(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

fn element_spec_js(spec: &ElementSpec) -> String {
    let tag = spec.tag.as_deref().unwrap_or("div");
    let mut script = format!(
        "var el = document.createElement({});",
        js_string_literal(tag)
    );
    for (name, value) in &spec.attributes {
        script.push_str(&format!(
            "el.setAttribute({}, {});",
            js_string_literal(name),
            js_string_literal(value)
        ));
    }
    if !spec.styles.is_empty() {
        let style_decls: Vec<String> = spec
            .styles
            .iter()
            .map(|(k, v)| format!("{k}: {v}"))
            .collect();
        script.push_str(&format!(
            "el.style.cssText = {};",
            js_string_literal(&style_decls.join("; "))
        ));
    }
    if let Some(content) = &spec.content {
        script.push_str(&format!(
            "el.textContent = {};",
            js_string_literal(content)
        ));
    }
    script
}

fn target_lookup_js(target: &str) -> String {
    if target.starts_with('/') {
        format!(
            "document.evaluate({}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue",
            js_string_literal(target)
        )
    } else {
        format!("document.querySelector({})", js_string_literal(target))
    }
}

fn insert_js(position: &InsertPosition) -> &'static str {
    match position {
        InsertPosition::Before => "target.parentNode.insertBefore(el, target);",
        InsertPosition::After => "target.parentNode.insertBefore(el, target.nextSibling);",
        InsertPosition::Inside => "target.appendChild(el);",
        InsertPosition::Replace => "target.parentNode.replaceChild(el, target);",
        InsertPosition::AfterBegin => "target.insertBefore(el, target.firstChild);",
    }
}

fn modification_js(modification: &DomModification) -> String {
    let lookup = target_lookup_js(&modification.target);
    match &modification.kind {
        DomMutationKind::Create => {
            let element_spec = modification.element.clone().unwrap_or_default();
            let position = modification
                .position
                .clone()
                .unwrap_or(InsertPosition::Inside);
            format!(
                "(function() {{ var target = {lookup}; if (!target) return; {el} {insert} }})();",
                lookup = lookup,
                el = element_spec_js(&element_spec),
                insert = insert_js(&position),
            )
        }
        DomMutationKind::Modify => {
            let element_spec = modification.element.clone().unwrap_or_default();
            let mut body = format!(
                "(function() {{ var target = {lookup}; if (!target) return;",
                lookup = lookup
            );
            for (name, value) in &element_spec.attributes {
                body.push_str(&format!(
                    "target.setAttribute({}, {});",
                    js_string_literal(name),
                    js_string_literal(value)
                ));
            }
            if !element_spec.styles.is_empty() {
                let style_decls: Vec<String> = element_spec
                    .styles
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect();
                body.push_str(&format!(
                    "target.style.cssText += {};",
                    js_string_literal(&style_decls.join("; "))
                ));
            }
            if let Some(content) = &element_spec.content {
                body.push_str(&format!(
                    "target.textContent = {};",
                    js_string_literal(content)
                ));
            }
            body.push_str(" })();");
            body
        }
        DomMutationKind::Delete => {
            format!(
                "(function() {{ var target = {lookup}; if (target) target.remove(); }})();",
                lookup = lookup
            )
        }
    }
}

/// Builds one script applying every modification in order, optionally
/// preceded by the iframe-wrap bootstrap when `preserve_original` is set.
pub fn modify_page_script(modifications: &[DomModification], preserve_original: bool) -> String {
    let mut script = String::new();
    if preserve_original {
        script.push_str(&iframe_wrap_script());
        script.push(';');
    }
    for modification in modifications {
        script.push_str(&modification_js(modification));
    }
    script.push_str("({ success: true, message: \"applied\" })");
    script
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn create_modification_builds_element_and_inserts() {
        let modification = DomModification {
            kind: DomMutationKind::Create,
            target: "#container".to_string(),
            position: Some(InsertPosition::Inside),
            element: Some(ElementSpec {
                tag: Some("div".to_string()),
                attributes: HashMap::new(),
                styles: HashMap::new(),
                content: Some("hello".to_string()),
            }),
        };
        let script = modification_js(&modification);
        assert!(script.contains("createElement(\"div\")"));
        assert!(script.contains("appendChild(el)"));
        assert!(script.contains("\"hello\""));
    }

    #[test]
    fn xpath_targets_use_document_evaluate() {
        let js = target_lookup_js("/html/body/div[1]");
        assert!(js.contains("document.evaluate"));
    }

    #[test]
    fn preserve_original_prefixes_the_wrap_bootstrap() {
        let script = modify_page_script(&[], true);
        assert!(script.contains("navigatorWrapped"));
    }
}
