//! The in-page snapshot script.
//!
//! Shipped as a string literal and evaluated once per snapshot via
//! [`crate::Snapshotter::capture`]. The parent process never walks the live
//! DOM itself; it only ever sees the JSON this script returns. Keeping the
//! script self-contained (no external script tags, no persisted globals
//! beyond what it cleans up on the next run) is what lets the same snapshot
//! approach work identically across drivers.
//!
//! Traversal descends into shadow roots and same-origin iframes as if they
//! were ordinary children. A cross-origin iframe that matches Cloudflare
//! challenge heuristics (class/id/src) cannot be descended into, so it gets
//! two synthetic leaf children instead — a `cf-checkbox` and a `cf-container`
//! positioned from the iframe's own bounding rect — so the agent still has
//! something to target.

/// Interactive tags recognized without inspecting ARIA role or attributes.
pub const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "option", "label", "summary", "details",
];

pub const INTERACTIVE_ROLES: &[&str] = &[
    "button", "link", "checkbox", "radio", "textbox", "combobox", "listbox", "option", "menuitem",
    "tab", "switch", "slider", "spinbutton", "searchbox", "gridcell", "treeitem",
];

pub const INTERACTIVE_ATTRIBUTES: &[&str] = &[
    "onclick",
    "onmousedown",
    "onmouseup",
    "ontouchstart",
    "role",
    "tabindex",
    "contenteditable",
    "draggable",
];

pub const DENY_LIST_TAGS: &[&str] =
    &["script", "style", "link", "meta", "noscript", "template", "svg"];

/// Returns the snapshot script, parameterized by the JSON-encoded
/// `{highlight, focusIndex, viewportExpansion, debugMode}` options object the
/// caller assembles. The script's only observable side effect besides its
/// return value is, when `highlight` is set, a fixed-position overlay
/// container it creates and removes on the next invocation.
pub fn snapshot_script(options_json: &str) -> String {
    format!(
        r#"(() => {{
  const OPTIONS = {options_json};
  const INTERACTIVE_TAGS = {interactive_tags};
  const INTERACTIVE_ROLES = {interactive_roles};
  const INTERACTIVE_ATTRS = {interactive_attrs};
  const DENY_TAGS = {deny_tags};

  const prior = document.getElementById('__navigator_highlight_container__');
  if (prior) prior.remove();
  document.querySelectorAll('[data-navigator-index]').forEach((el) => {{
    el.removeAttribute('data-navigator-index');
  }});

  const rectCache = new WeakMap();
  const styleCache = new WeakMap();
  const xpathCache = new WeakMap();

  function rectOf(el) {{
    if (!rectCache.has(el)) rectCache.set(el, el.getBoundingClientRect());
    return rectCache.get(el);
  }}

  function styleOf(el) {{
    if (!styleCache.has(el)) styleCache.set(el, window.getComputedStyle(el));
    return styleCache.get(el);
  }}

  function xpathOf(el) {{
    if (xpathCache.has(el)) return xpathCache.get(el);
    if (el === document.body) {{
      xpathCache.set(el, '/html/body');
      return '/html/body';
    }}
    let ix = 1;
    let sibling = el.previousElementSibling;
    while (sibling) {{
      if (sibling.tagName === el.tagName) ix += 1;
      sibling = sibling.previousElementSibling;
    }}
    const parentPath = el.parentElement ? xpathOf(el.parentElement) : '';
    const path = `${{parentPath}}/${{el.tagName.toLowerCase()}}[${{ix}}]`;
    xpathCache.set(el, path);
    return path;
  }}

  function isCfChallenge(el) {{
    const haystack = `${{el.className}} ${{el.id}} ${{el.getAttribute('src') || ''}}`;
    return /cf-turnstile|cloudflare|challenge|turnstile/i.test(haystack);
  }}

  function isVisible(el) {{
    const style = styleOf(el);
    const rect = rectOf(el);
    if (style.display === 'none' || style.visibility === 'hidden') return false;
    if (rect.width === 0 && rect.height === 0) {{
      if (!isCfChallenge(el)) return false;
    }}
    return true;
  }}

  function inViewport(el) {{
    if (OPTIONS.viewportExpansion === -1) return true;
    const rect = rectOf(el);
    const expansion = OPTIONS.viewportExpansion || 0;
    const vw = window.innerWidth;
    const vh = window.innerHeight;
    return (
      rect.right >= -expansion &&
      rect.bottom >= -expansion &&
      rect.left <= vw + expansion &&
      rect.top <= vh + expansion
    );
  }}

  function isTopElement(el) {{
    if (OPTIONS.viewportExpansion === -1) return true;
    const rect = rectOf(el);
    const cx = rect.left + rect.width / 2;
    const cy = rect.top + rect.height / 2;
    if (cx < 0 || cy < 0 || cx > window.innerWidth || cy > window.innerHeight) return true;
    let top = document.elementFromPoint(cx, cy);
    while (top && top !== el && el.contains(top) === false && top.contains(el) === false) {{
      top = top.parentElement;
    }}
    return top === el || (top !== null && el.contains(top));
  }}

  function interactionType(el, interactive) {{
    if (!interactive) return 'none';
    const tag = el.tagName.toLowerCase();
    if (tag === 'input' || tag === 'textarea' || el.isContentEditable) return 'input';
    if (tag === 'a' || tag === 'button') return 'click';
    return 'interactive';
  }}

  function isInteractive(el) {{
    const tag = el.tagName.toLowerCase();
    const style = styleOf(el);
    if (el.disabled || el.getAttribute('aria-disabled') === 'true' || el.inert) return false;
    if (style.cursor === 'not-allowed') return false;
    if (INTERACTIVE_TAGS.includes(tag)) return true;
    const role = el.getAttribute('role');
    if (role && INTERACTIVE_ROLES.includes(role)) return true;
    if (el.isContentEditable) return true;
    for (const attr of INTERACTIVE_ATTRS) {{
      if (el.hasAttribute(attr)) return true;
    }}
    if (style.cursor === 'pointer') return true;
    return false;
  }}

  function textOf(el) {{
    let text = '';
    for (const child of el.childNodes) {{
      if (child.nodeType === Node.TEXT_NODE) text += child.textContent;
    }}
    return text.trim();
  }}

  function attributesOf(el) {{
    const out = {{}};
    for (const attr of el.attributes) {{
      out[attr.name] = attr.value;
    }}
    return out;
  }}

  let nextIndex = 0;
  let virtualCounter = 0;
  const map = {{}};
  let highlightContainer = null;
  if (OPTIONS.highlight) {{
    highlightContainer = document.createElement('div');
    highlightContainer.id = '__navigator_highlight_container__';
    highlightContainer.style.cssText = 'position:fixed;top:0;left:0;pointer-events:none;z-index:2147483647;';
    document.body.appendChild(highlightContainer);
  }}

  function labelHighlight(rect) {{
    if (!highlightContainer) return;
    const label = document.createElement('div');
    label.textContent = String(nextIndex - 1);
    label.style.cssText = `position:fixed;left:${{rect.left}}px;top:${{rect.top}}px;background:#ff5722;color:#fff;font:10px monospace;padding:1px 3px;`;
    highlightContainer.appendChild(label);
  }}

  function makeVirtualNode(kind, x, y, width, height) {{
    virtualCounter += 1;
    const id = `v${{virtualCounter}}`;
    const node = {{
      tag: 'div',
      text: '',
      attributes: {{
        virtual: 'true',
        x: String(Math.round(x)),
        y: String(Math.round(y)),
        width: String(Math.round(width)),
        height: String(Math.round(height)),
      }},
      xpath: '',
      isVisible: true,
      isTopElement: true,
      isInteractive: true,
      isInViewport: true,
      interactionType: kind,
      highlightIndex: nextIndex,
      children: [],
    }};
    nextIndex += 1;
    labelHighlight({{ left: x, top: y }});
    map[id] = node;
    return id;
  }}

  function visit(el, parentId) {{
    if (!el || el.nodeType !== Node.ELEMENT_NODE) return null;
    const tag = el.tagName.toLowerCase();
    if (DENY_TAGS.includes(tag)) return null;

    const visible = isVisible(el);
    const viewport = inViewport(el);
    if (!visible && !viewport) return null;

    const interactive = isInteractive(el);
    const top = interactive ? isTopElement(el) : true;
    const id = `n${{Object.keys(map).length}}`;

    const node = {{
      tag,
      text: textOf(el),
      attributes: attributesOf(el),
      xpath: xpathOf(el),
      isVisible: visible,
      isTopElement: top,
      isInteractive: interactive,
      isInViewport: viewport,
      interactionType: interactionType(el, interactive),
      highlightIndex: null,
      children: [],
    }};

    if (interactive && visible && top && viewport) {{
      node.highlightIndex = nextIndex;
      nextIndex += 1;
      el.setAttribute('data-navigator-index', String(node.highlightIndex));
      labelHighlight(rectOf(el));
    }}

    map[id] = node;

    if (tag === 'iframe') {{
      let sameOriginDoc = null;
      try {{
        sameOriginDoc = el.contentDocument;
      }} catch (e) {{
        sameOriginDoc = null;
      }}
      if (sameOriginDoc && sameOriginDoc.body) {{
        const childId = visit(sameOriginDoc.body, id);
        if (childId) node.children.push(childId);
      }} else if (isCfChallenge(el)) {{
        const rect = rectOf(el);
        const checkboxId = makeVirtualNode('cf-checkbox', rect.left + 12, rect.top + 12, 24, 24);
        const containerId = makeVirtualNode('cf-container', rect.left, rect.top, rect.width, rect.height);
        node.children.push(checkboxId, containerId);
      }}
      return id;
    }}

    for (const child of el.children) {{
      const childId = visit(child, id);
      if (childId) node.children.push(childId);
    }}
    if (el.shadowRoot) {{
      for (const child of el.shadowRoot.children) {{
        const childId = visit(child, id);
        if (childId) node.children.push(childId);
      }}
    }}
    return id;
  }}

  const rootId = visit(document.body, null);
  return JSON.stringify({{ rootId, map }});
}})()"#,
        options_json = options_json,
        interactive_tags = to_js_array(INTERACTIVE_TAGS),
        interactive_roles = to_js_array(INTERACTIVE_ROLES),
        interactive_attrs = to_js_array(INTERACTIVE_ATTRIBUTES),
        deny_tags = to_js_array(DENY_LIST_TAGS),
    )
}

fn to_js_array(items: &[&str]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("'{s}'")).collect();
    format!("[{}]", quoted.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_embeds_options_and_tag_lists() {
        let script = snapshot_script(r#"{"highlight":false,"viewportExpansion":-1}"#);
        assert!(script.contains("viewportExpansion"));
        assert!(script.contains("'button'"));
        assert!(script.contains("JSON.stringify"));
    }

    #[test]
    fn script_synthesizes_cf_challenge_virtual_children() {
        let script = snapshot_script(r#"{"highlight":false,"viewportExpansion":-1}"#);
        assert!(script.contains("isCfChallenge"));
        assert!(script.contains("cf-checkbox"));
        assert!(script.contains("cf-container"));
        assert!(script.contains("makeVirtualNode"));
    }

    #[test]
    fn script_descends_into_shadow_roots_and_same_origin_iframes() {
        let script = snapshot_script(r#"{"highlight":false,"viewportExpansion":-1}"#);
        assert!(script.contains("el.shadowRoot"));
        assert!(script.contains("contentDocument"));
    }
}
