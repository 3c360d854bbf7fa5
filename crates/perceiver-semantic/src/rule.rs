//! Semantic element types and the rules that score a [`core_types::DOMElement`]
//! against them.

use serde::{Deserialize, Serialize};

/// The ~20 semantic roles a rule can assign to an element. `Unknown` is the
/// fallback when no rule clears the match threshold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    VideoContent,
    PlayButton,
    SearchInput,
    Advertisement,
    NavigationLink,
    SubmitButton,
    DownloadButton,
    FormField,
    ArticleContent,
    ImageContent,
    SocialShare,
    Pagination,
    Breadcrumb,
    MenuItem,
    CloseButton,
    LoginButton,
    CartButton,
    PriceElement,
    RatingElement,
    CommentField,
    Unknown,
}

impl SemanticType {
    /// Decorative, emoji-tagged label used when rendering elements into the
    /// prompt. Purely for model comprehension; the agent's decisions never
    /// branch on this string.
    pub fn emoji_label(&self) -> &'static str {
        match self {
            SemanticType::VideoContent => "🎬 video",
            SemanticType::PlayButton => "▶️ play",
            SemanticType::SearchInput => "🔍 search",
            SemanticType::Advertisement => "📢 ad",
            SemanticType::NavigationLink => "🧭 nav",
            SemanticType::SubmitButton => "✅ submit",
            SemanticType::DownloadButton => "⬇️ download",
            SemanticType::FormField => "📝 field",
            SemanticType::ArticleContent => "📰 article",
            SemanticType::ImageContent => "🖼️ image",
            SemanticType::SocialShare => "🔗 share",
            SemanticType::Pagination => "📄 page",
            SemanticType::Breadcrumb => "🍞 crumb",
            SemanticType::MenuItem => "📋 menu",
            SemanticType::CloseButton => "✖️ close",
            SemanticType::LoginButton => "🔑 login",
            SemanticType::CartButton => "🛒 cart",
            SemanticType::PriceElement => "💲 price",
            SemanticType::RatingElement => "⭐ rating",
            SemanticType::CommentField => "💬 comment",
            SemanticType::Unknown => "",
        }
    }

    pub fn action_hint(&self) -> &'static str {
        match self {
            SemanticType::VideoContent => "may start playback on click",
            SemanticType::PlayButton => "click to start playback",
            SemanticType::SearchInput => "type a query then submit",
            SemanticType::Advertisement => "avoid unless task requires it",
            SemanticType::NavigationLink => "click to navigate",
            SemanticType::SubmitButton => "click to submit the enclosing form",
            SemanticType::DownloadButton => "click to start a download",
            SemanticType::FormField => "type into this field",
            SemanticType::ArticleContent => "read-only content, not interactive",
            SemanticType::ImageContent => "not directly actionable",
            SemanticType::SocialShare => "shares the page externally",
            SemanticType::Pagination => "click to change page",
            SemanticType::Breadcrumb => "click to navigate up a level",
            SemanticType::MenuItem => "click to open or select",
            SemanticType::CloseButton => "dismisses a dialog or overlay",
            SemanticType::LoginButton => "click to sign in",
            SemanticType::CartButton => "adds item or opens cart",
            SemanticType::PriceElement => "read-only, not interactive",
            SemanticType::RatingElement => "read-only, not interactive",
            SemanticType::CommentField => "type a comment",
            SemanticType::Unknown => "unclassified element",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub struct Priority(pub u8);

impl Priority {
    pub fn medium() -> Self {
        Priority(3)
    }
}

/// A single classification rule: a semantic type plus the predicate patterns
/// scored against an element's tag, class, id, text, href, role and other
/// attributes. Weights: tag 0.30, class 0.25, text 0.20, href 0.20, id 0.15,
/// role 0.15, each matching attribute-value pair 0.10.
pub struct Rule {
    pub semantic_type: SemanticType,
    pub priority: Priority,
    pub is_recommended: bool,
    pub tags: &'static [&'static str],
    pub class_keywords: &'static [&'static str],
    pub id_keywords: &'static [&'static str],
    pub text_keywords: &'static [&'static str],
    pub href_substrings: &'static [&'static str],
    pub role_values: &'static [&'static str],
    pub attribute_values: &'static [(&'static str, &'static str)],
}

const W_TAG: f64 = 0.30;
const W_CLASS: f64 = 0.25;
const W_TEXT: f64 = 0.20;
const W_HREF: f64 = 0.20;
const W_ID: f64 = 0.15;
const W_ROLE: f64 = 0.15;
const W_ATTR: f64 = 0.10;

pub const MATCH_THRESHOLD: f64 = 0.3;

fn any_contains(haystack: &str, needles: &[&str]) -> bool {
    let haystack = haystack.to_lowercase();
    needles.iter().any(|n| haystack.contains(&n.to_lowercase()))
}

impl Rule {
    pub fn score(&self, tag: &str, class: &str, id: &str, text: &str, href: &str, role: &str, attributes: &std::collections::HashMap<String, String>) -> f64 {
        let mut score = 0.0;

        if !self.tags.is_empty() && self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            score += W_TAG;
        }
        if !self.class_keywords.is_empty() && any_contains(class, self.class_keywords) {
            score += W_CLASS;
        }
        if !self.id_keywords.is_empty() && any_contains(id, self.id_keywords) {
            score += W_ID;
        }
        if !self.text_keywords.is_empty() && any_contains(text, self.text_keywords) {
            score += W_TEXT;
        }
        if !self.href_substrings.is_empty() && any_contains(href, self.href_substrings) {
            score += W_HREF;
        }
        if !self.role_values.is_empty() && self.role_values.iter().any(|r| r.eq_ignore_ascii_case(role)) {
            score += W_ROLE;
        }
        for (attr_name, expected_substring) in self.attribute_values {
            if let Some(actual) = attributes.get(*attr_name) {
                if actual.to_lowercase().contains(&expected_substring.to_lowercase()) {
                    score += W_ATTR;
                }
            }
        }

        score
    }
}
