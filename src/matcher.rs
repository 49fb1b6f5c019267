use serde::Serialize;
use std::path::Path;

use crate::query::SearchQuery;

const MATCH_EXTENSIONS: [&str; 2] = ["class", "java"];

/// How a file or archive entry is processed once its name matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateKind {
    Compiled,
    Source,
    Container,
}

impl CandidateKind {
    /// Resolved from the extension alone; anything that is neither a class
    /// file nor a java source is treated as a zip-like container.
    pub fn from_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("class") => CandidateKind::Compiled,
            Some("java") => CandidateKind::Source,
            _ => CandidateKind::Container,
        }
    }
}

/// A located file or archive entry.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub display_name: String,
    pub locator_path: String,
    pub kind: CandidateKind,
}

/// Decides whether `name`/`path` denote the queried class.
///
/// For standalone files `name` is the base name and `path` the full path.
/// For container entries both are the entry name; the `/<target>.<ext>`
/// suffix rule then stands in for base-name equality.
pub fn matches(candidate_name: &str, candidate_path: &str, query: &SearchQuery) -> bool {
    let mut name = candidate_name.replace('\\', "/");
    let mut path = candidate_path.replace('\\', "/");
    if !query.is_case_sensitive() {
        name = name.to_lowercase();
        path = path.to_lowercase();
    }

    let target = query.target();
    MATCH_EXTENSIONS.iter().any(|ext| {
        let file_name = format!("{target}.{ext}");
        if query.is_qualified() {
            path.ends_with(&file_name)
        } else {
            name == file_name || path.ends_with(&format!("/{file_name}"))
        }
    })
}
