use serde::Serialize;

use crate::error::{FinderError, Result};

/// What to look for. Built once from user input and never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    class_name: String,
    target: String,
    qualified: bool,
    case_sensitive: bool,
    method_filter: Option<String>,
}

impl SearchQuery {
    pub fn new(
        class_name: &str,
        case_sensitive: bool,
        method_filter: Option<&str>,
    ) -> Result<Self> {
        let class_name = normalize_class_name(class_name);
        if class_name.is_empty() {
            return Err(FinderError::InvalidQuery(
                "class name must not be empty".to_string(),
            ));
        }

        let qualified = class_name.contains(['.', '/']);
        let mut target = class_name.replace('.', "/");
        if !case_sensitive {
            target = target.to_lowercase();
        }

        let method_filter = method_filter
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        Ok(Self {
            class_name,
            target,
            qualified,
            case_sensitive,
            method_filter,
        })
    }

    /// The class name as the user gave it, after whitespace cleanup.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Slash-separated (and lower-cased unless case sensitive) form used for
    /// every path comparison.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_qualified(&self) -> bool {
        self.qualified
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn method_filter(&self) -> Option<&str> {
        self.method_filter.as_deref()
    }
}

/// Accepts names pasted straight from an import line, e.g.
/// `import java.util. Random ;`.
fn normalize_class_name(raw: &str) -> String {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("import ") {
        s = rest.trim();
    }
    if s.ends_with(';') {
        s = s.trim_end_matches(';').trim();
    }
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_class_name_strips_import_whitespace_and_semicolon() {
        assert_eq!(
            normalize_class_name("import java.util. Random ;"),
            "java.util.Random"
        );
    }

    #[test]
    fn qualified_query_uses_slashes_and_lowercase() {
        let q = SearchQuery::new("java.util.Random", false, None).unwrap();
        assert!(q.is_qualified());
        assert_eq!(q.target(), "java/util/random");
        assert_eq!(q.class_name(), "java.util.Random");
    }

    #[test]
    fn case_sensitive_query_keeps_case() {
        let q = SearchQuery::new("Random", true, Some("nextInt")).unwrap();
        assert!(!q.is_qualified());
        assert_eq!(q.target(), "Random");
        assert_eq!(q.method_filter(), Some("nextInt"));
    }

    #[test]
    fn blank_method_filter_is_no_filter() {
        let q = SearchQuery::new("Random", false, Some("  ")).unwrap();
        assert_eq!(q.method_filter(), None);
    }

    #[test]
    fn empty_class_name_is_rejected() {
        let err = SearchQuery::new("  ", false, None).unwrap_err();
        assert!(matches!(err, FinderError::InvalidQuery(_)));
    }
}
