use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::archive::Container;
use crate::binary;
use crate::error::Result;
use crate::matcher::{Candidate, CandidateKind, matches};
use crate::query::SearchQuery;
use crate::render::render;
use crate::report::{MatchResult, Reporter, SearchEvent};
use crate::scan::scan_candidates;
use crate::source::SourceExtractor;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchSummary {
    pub candidates: usize,
    pub matches: usize,
    pub errors: usize,
}

/// Runs a query over files one at a time, pushing every match and error to
/// the reporter as soon as it is known.
pub struct Searcher<R: Reporter> {
    query: SearchQuery,
    reporter: R,
    source: Option<SourceExtractor>,
    summary: SearchSummary,
}

impl<R: Reporter> Searcher<R> {
    pub fn new(query: SearchQuery, reporter: R) -> Self {
        Self {
            query,
            reporter,
            source: None,
            summary: SearchSummary::default(),
        }
    }

    pub fn summary(&self) -> SearchSummary {
        self.summary
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Lists and searches every directory. A directory that cannot be listed
    /// is reported and skipped.
    pub fn search_directories(&mut self, directories: &[PathBuf], recursive: bool) -> SearchSummary {
        self.verbose("Building directory search tree...".to_string());
        for dir in directories {
            match scan_candidates(dir, recursive) {
                Ok(files) => self.search_files(&files),
                Err(e) => self.error(dir.display().to_string(), e.to_string()),
            }
        }
        self.verbose("Finished search".to_string());
        self.summary
    }

    pub fn search_files(&mut self, files: &[PathBuf]) {
        for file in files {
            self.search_file(file);
        }
    }

    /// Searches one file: a class file, a source file or a container.
    pub fn search_file(&mut self, path: &Path) {
        self.summary.candidates += 1;

        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let locator = absolute.to_string_lossy().to_string();
        let display_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| locator.clone());
        let kind = CandidateKind::from_name(&display_name);

        let outcome = match kind {
            CandidateKind::Compiled | CandidateKind::Source => {
                if !matches(&display_name, &locator, &self.query) {
                    return;
                }
                let candidate = Candidate {
                    display_name,
                    locator_path: locator.clone(),
                    kind,
                };
                self.resolve(candidate, || Ok(std::fs::read(&absolute)?))
            }
            CandidateKind::Container => self.search_container(&absolute, &locator),
        };

        if let Err(e) = outcome {
            self.verbose(format!("Error reading file {locator}: {e}"));
            self.error(locator, e.to_string());
        }
    }

    fn search_container(&mut self, path: &Path, locator: &str) -> Result<()> {
        let mut entries = Container::open(path)?.entries();

        while let Some(entry) = entries.next_entry() {
            let mut entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.verbose(format!("Error reading an entry of {locator}: {e}"));
                    self.error(locator.to_string(), e.to_string());
                    continue;
                }
            };
            if entry.is_dir() {
                continue;
            }

            let name = entry.name().to_string();
            if !matches(&name, &name, &self.query) {
                continue;
            }

            let candidate = Candidate {
                kind: CandidateKind::from_name(&name),
                display_name: name.clone(),
                locator_path: locator.to_string(),
            };
            if let Err(e) = self.resolve(candidate, || entry.read_bytes()) {
                self.verbose(format!("Error reading {name} from {locator}: {e}"));
                self.error(locator.to_string(), format!("{name}: {e}"));
            }
        }

        Ok(())
    }

    /// Reports a matched candidate, with one line per matching method when
    /// a method filter is set. Content is only loaded in that case.
    ///
    /// Only class and source names pass [`matches`], so the candidate is
    /// never a container.
    fn resolve(
        &mut self,
        candidate: Candidate,
        load: impl FnOnce() -> Result<Vec<u8>>,
    ) -> Result<()> {
        let Some(filter) = self.query.method_filter().map(str::to_string) else {
            self.emit(candidate, None);
            return Ok(());
        };

        if candidate.kind == CandidateKind::Source {
            let text = String::from_utf8_lossy(&load()?).into_owned();
            let records = self.source_extractor()?.extract(&text, &filter)?;
            for record in records {
                self.emit(candidate.clone(), Some(render(&record)));
            }
            return Ok(());
        }

        let bytes = load()?;
        for outcome in binary::extract(&bytes, &filter)? {
            match outcome {
                Ok(record) => self.emit(candidate.clone(), Some(render(&record))),
                Err(e) => {
                    self.verbose(format!(
                        "Error reading method {filter} from class {}: {e}",
                        candidate.display_name
                    ));
                    self.error(
                        candidate.locator_path.clone(),
                        format!("{}: {e}", candidate.display_name),
                    );
                }
            }
        }

        Ok(())
    }

    fn source_extractor(&mut self) -> Result<&mut SourceExtractor> {
        let extractor = match self.source.take() {
            Some(extractor) => extractor,
            None => SourceExtractor::new()?,
        };
        Ok(self.source.insert(extractor))
    }

    fn emit(&mut self, candidate: Candidate, signature: Option<String>) {
        self.summary.matches += 1;
        self.reporter.report(SearchEvent::Match(MatchResult {
            candidate,
            signature,
        }));
    }

    fn verbose(&mut self, message: String) {
        self.reporter.report(SearchEvent::Verbose(message));
    }

    fn error(&mut self, locator: String, message: String) {
        self.summary.errors += 1;
        self.reporter.report(SearchEvent::Error { locator, message });
    }
}

/// Convenience for callers holding a plain list of directories.
pub fn search<R: Reporter>(
    query: SearchQuery,
    directories: &[PathBuf],
    recursive: bool,
    reporter: R,
) -> (SearchSummary, R) {
    let mut searcher = Searcher::new(query, reporter);
    let summary = searcher.search_directories(directories, recursive);
    (summary, searcher.into_reporter())
}
