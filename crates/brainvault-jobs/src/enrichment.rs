//! Deterministic enrichment heuristics.
//!
//! Theme and project derivation are pure lexicon scans: identical input and
//! lexicon always produce identical output. Emotion is the one external
//! delegation and is handled by the worker, not here.

/// Default theme when no entity matches.
pub const THEME_DEFAULT: &str = "general";

/// Default project bucket when no keyword matches.
pub const PROJECT_DEFAULT: &str = "General Notes";

/// Entity gazetteer, one list per category. Document-order scan takes the
/// first token found in any list; category priority only breaks ties when
/// one token appears in several lists.
const ENTITY_LEXICON: [(&str, &[&str]); 4] = [
    (
        "organization",
        &[
            "google", "microsoft", "amazon", "apple", "tesla", "openai", "netflix", "spotify",
            "nasa", "ibm", "intel", "samsung", "toyota", "disney",
        ],
    ),
    (
        "product",
        &[
            "iphone", "android", "chatgpt", "kubernetes", "photoshop", "excel", "slack",
            "notion", "figma", "arduino", "raspberry",
        ],
    ),
    (
        "place",
        &[
            "america", "europe", "asia", "africa", "london", "paris", "tokyo", "berlin",
            "california", "york", "seattle", "austin", "india", "china", "japan",
        ],
    ),
    (
        "person",
        &[
            "einstein", "musk", "jobs", "gates", "bezos", "curie", "tesla", "darwin", "newton",
        ],
    ),
];

/// Project keyword buckets in fixed priority order; first bucket with a
/// substring match wins.
const PROJECT_BUCKETS: [(&str, &[&str]); 4] = [
    (
        "Startup Ideas",
        &["startup", "business", "company", "venture", "entrepreneur", "market"],
    ),
    (
        "Blog Content",
        &["blog", "article", "post", "write", "publish", "essay"],
    ),
    (
        "Product Features",
        &["feature", "app", "product", "tool", "platform", "interface"],
    ),
    (
        "Research Notes",
        &["research", "study", "learn", "explore", "experiment", "investigate"],
    ),
];

/// Derived enrichment fields for one idea. Emotion is filled in by the
/// worker after the optional classifier call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrichment {
    pub project: String,
    pub theme: String,
    pub emotion: String,
}

/// Extract a theme: the first entity-lexicon token in document order,
/// title-cased; `THEME_DEFAULT` when nothing matches.
pub fn derive_theme(content: &str) -> String {
    for raw_token in content.split_whitespace() {
        let token: String = raw_token
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        if token.is_empty() {
            continue;
        }
        for (_category, entries) in ENTITY_LEXICON {
            if entries.contains(&token.as_str()) {
                return title_case(&token);
            }
        }
    }
    THEME_DEFAULT.to_string()
}

/// Bucket content into a project label by substring match, first bucket in
/// priority order wins; `PROJECT_DEFAULT` when none match.
pub fn derive_project(content: &str) -> String {
    let lowered = content.to_lowercase();
    for (label, keywords) in PROJECT_BUCKETS {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return label.to_string();
        }
    }
    PROJECT_DEFAULT.to_string()
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_defaults_to_general() {
        assert_eq!(
            derive_theme("We should build a startup around solar panels"),
            "general"
        );
    }

    #[test]
    fn test_theme_first_entity_in_document_order() {
        assert_eq!(
            derive_theme("Pitch the iphone accessory to Google next week"),
            "Iphone"
        );
    }

    #[test]
    fn test_theme_matches_organizations() {
        assert_eq!(derive_theme("Partner with Google on maps"), "Google");
    }

    #[test]
    fn test_theme_ignores_punctuation() {
        assert_eq!(derive_theme("What would Einstein, say?"), "Einstein");
    }

    #[test]
    fn test_theme_is_deterministic() {
        let content = "A trip to Tokyo to visit Samsung";
        assert_eq!(derive_theme(content), derive_theme(content));
    }

    #[test]
    fn test_project_startup_keyword() {
        assert_eq!(
            derive_project("We should build a startup around solar panels"),
            "Startup Ideas"
        );
    }

    #[test]
    fn test_project_priority_order_wins() {
        // Both "business" (bucket 1) and "blog" (bucket 2) appear; the
        // first bucket in priority order takes it.
        assert_eq!(
            derive_project("A blog about my business journey"),
            "Startup Ideas"
        );
    }

    #[test]
    fn test_project_substring_match() {
        // "features" contains "feature".
        assert_eq!(
            derive_project("List the killer features for launch"),
            "Product Features"
        );
    }

    #[test]
    fn test_project_research_bucket() {
        assert_eq!(
            derive_project("Study how bees navigate"),
            "Research Notes"
        );
    }

    #[test]
    fn test_project_default_bucket() {
        assert_eq!(derive_project("Buy milk on the way home"), "General Notes");
    }

    #[test]
    fn test_project_case_insensitive() {
        assert_eq!(derive_project("STARTUP weekend"), "Startup Ideas");
    }
}
