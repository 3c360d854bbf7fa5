//! The fixed rule table. Grouped roughly by how likely each type is to be
//! acted on by a task, not alphabetically — transactional element types
//! (search, submit, navigation) come first, decorative ones last.

use crate::rule::{Priority, Rule, SemanticType};

pub fn default_rules() -> Vec<Rule> {
    vec![
        Rule {
            semantic_type: SemanticType::SearchInput,
            priority: Priority(5),
            is_recommended: true,
            tags: &["input"],
            class_keywords: &["search"],
            id_keywords: &["search", "query", "q"],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &["searchbox"],
            attribute_values: &[("placeholder", "search"), ("type", "search"), ("name", "q")],
        },
        Rule {
            semantic_type: SemanticType::SubmitButton,
            priority: Priority(5),
            is_recommended: true,
            tags: &["button"],
            class_keywords: &["submit"],
            id_keywords: &["submit"],
            text_keywords: &["submit", "continue", "next", "confirm"],
            href_substrings: &[],
            role_values: &[],
            attribute_values: &[("type", "submit")],
        },
        Rule {
            semantic_type: SemanticType::LoginButton,
            priority: Priority(5),
            is_recommended: true,
            tags: &["button", "a"],
            class_keywords: &["login", "signin", "sign-in"],
            id_keywords: &["login", "signin"],
            text_keywords: &["log in", "login", "sign in"],
            href_substrings: &["login", "signin"],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::CartButton,
            priority: Priority(4),
            is_recommended: true,
            tags: &["button", "a"],
            class_keywords: &["cart", "basket"],
            id_keywords: &["cart"],
            text_keywords: &["add to cart", "buy now", "checkout"],
            href_substrings: &["cart", "checkout"],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::DownloadButton,
            priority: Priority(4),
            is_recommended: true,
            tags: &["a", "button"],
            class_keywords: &["download"],
            id_keywords: &["download"],
            text_keywords: &["download"],
            href_substrings: &[".pdf", ".zip", "download"],
            role_values: &[],
            attribute_values: &[("download", "")],
        },
        Rule {
            semantic_type: SemanticType::PlayButton,
            priority: Priority(4),
            is_recommended: true,
            tags: &["button"],
            class_keywords: &["play"],
            id_keywords: &["play"],
            text_keywords: &["play"],
            href_substrings: &[],
            role_values: &[],
            attribute_values: &[("aria-label", "play")],
        },
        Rule {
            semantic_type: SemanticType::FormField,
            priority: Priority(4),
            is_recommended: true,
            tags: &["input", "textarea", "select"],
            class_keywords: &["field", "form-control"],
            id_keywords: &[],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &["textbox", "combobox"],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::CommentField,
            priority: Priority(3),
            is_recommended: true,
            tags: &["textarea"],
            class_keywords: &["comment"],
            id_keywords: &["comment"],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &[],
            attribute_values: &[("placeholder", "comment")],
        },
        Rule {
            semantic_type: SemanticType::NavigationLink,
            priority: Priority(3),
            is_recommended: true,
            tags: &["a"],
            class_keywords: &["nav", "menu"],
            id_keywords: &["nav"],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &["link"],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::MenuItem,
            priority: Priority(3),
            is_recommended: true,
            tags: &["li", "a", "button"],
            class_keywords: &["menu-item", "nav-item"],
            id_keywords: &[],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &["menuitem"],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::Pagination,
            priority: Priority(3),
            is_recommended: true,
            tags: &["a", "button"],
            class_keywords: &["pagination", "pager"],
            id_keywords: &[],
            text_keywords: &["next page", "previous page", "page "],
            href_substrings: &["page="],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::Breadcrumb,
            priority: Priority(2),
            is_recommended: false,
            tags: &["a"],
            class_keywords: &["breadcrumb"],
            id_keywords: &[],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::CloseButton,
            priority: Priority(3),
            is_recommended: true,
            tags: &["button"],
            class_keywords: &["close", "dismiss"],
            id_keywords: &["close"],
            text_keywords: &["close", "dismiss", "×"],
            href_substrings: &[],
            role_values: &[],
            attribute_values: &[("aria-label", "close")],
        },
        Rule {
            semantic_type: SemanticType::SocialShare,
            priority: Priority(2),
            is_recommended: false,
            tags: &["a", "button"],
            class_keywords: &["share"],
            id_keywords: &[],
            text_keywords: &["share"],
            href_substrings: &["facebook.com/share", "twitter.com/intent", "share?"],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::Advertisement,
            priority: Priority(1),
            is_recommended: false,
            tags: &["div", "iframe"],
            class_keywords: &["ad", "advert", "sponsored", "promo"],
            id_keywords: &["ad-", "google_ads"],
            text_keywords: &["sponsored", "advertisement"],
            href_substrings: &["doubleclick.net", "googlesyndication"],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::VideoContent,
            priority: Priority(3),
            is_recommended: true,
            tags: &["video", "iframe"],
            class_keywords: &["video", "player"],
            id_keywords: &[],
            text_keywords: &[],
            href_substrings: &["youtube.com", "vimeo.com"],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::ImageContent,
            priority: Priority(2),
            is_recommended: false,
            tags: &["img", "picture"],
            class_keywords: &[],
            id_keywords: &[],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &["img"],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::ArticleContent,
            priority: Priority(2),
            is_recommended: false,
            tags: &["article", "p"],
            class_keywords: &["article", "post-content", "entry-content"],
            id_keywords: &[],
            text_keywords: &[],
            href_substrings: &[],
            role_values: &["article"],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::PriceElement,
            priority: Priority(2),
            is_recommended: false,
            tags: &["span", "div"],
            class_keywords: &["price"],
            id_keywords: &["price"],
            text_keywords: &["$", "usd", "price"],
            href_substrings: &[],
            role_values: &[],
            attribute_values: &[],
        },
        Rule {
            semantic_type: SemanticType::RatingElement,
            priority: Priority(2),
            is_recommended: false,
            tags: &["span", "div"],
            class_keywords: &["rating", "stars"],
            id_keywords: &[],
            text_keywords: &["stars", "rating"],
            href_substrings: &[],
            role_values: &["img"],
            attribute_values: &[("aria-label", "star")],
        },
    ]
}
