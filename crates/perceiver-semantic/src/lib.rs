//! Semantic element analyzer: rule-based classification of DOM
//! elements into decorative types used to enrich prompt text.

mod analyzer;
mod rule;
mod rules_table;

pub use analyzer::{SemanticAnalyzer, SemanticClassification};
pub use rule::{Priority, Rule, SemanticType};
