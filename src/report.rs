use serde::Serialize;
use std::io::Write;
use tracing::{debug, error};

use crate::cli::OutputFormat;
use crate::matcher::Candidate;

#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Everything the search core tells the outside world.
#[derive(Debug, Clone)]
pub enum SearchEvent {
    Match(MatchResult),
    /// Progress and diagnostic detail, shown only in verbose mode.
    Verbose(String),
    /// A recoverable failure scoped to one candidate, one method or one
    /// search directory.
    Error { locator: String, message: String },
}

/// Sink for search events. Events arrive in discovery order and are never
/// batched.
pub trait Reporter {
    fn report(&mut self, event: SearchEvent);
}

impl Reporter for Vec<SearchEvent> {
    fn report(&mut self, event: SearchEvent) {
        self.push(event);
    }
}

/// Prints matches to a writer (stdout in the binary) and sends diagnostics
/// to `tracing`.
pub struct ConsoleReporter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    fn write_match(&mut self, result: &MatchResult) -> std::io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                let line = serde_json::to_string(result).map_err(std::io::Error::other)?;
                writeln!(self.out, "{line}")
            }
            OutputFormat::Text => {
                let c = &result.candidate;
                match &result.signature {
                    Some(sig) => writeln!(self.out, "{}\t{}\t{sig}", c.display_name, c.locator_path),
                    None => writeln!(self.out, "{}\t{}", c.display_name, c.locator_path),
                }
            }
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn report(&mut self, event: SearchEvent) {
        match event {
            SearchEvent::Match(result) => {
                if let Err(e) = self.write_match(&result) {
                    error!("failed to write result: {e}");
                }
            }
            SearchEvent::Verbose(message) => debug!("{message}"),
            SearchEvent::Error { locator, message } => {
                debug!("error while reading {locator}: {message}");
                error!("{message}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::CandidateKind;
    use serde_json::Value;

    fn result(signature: Option<&str>) -> MatchResult {
        MatchResult {
            candidate: Candidate {
                display_name: "java/util/Random.class".to_string(),
                locator_path: "/libs/rt.jar".to_string(),
                kind: CandidateKind::Compiled,
            },
            signature: signature.map(str::to_string),
        }
    }

    #[test]
    fn text_format_is_tab_separated() {
        let mut out = Vec::new();
        let mut reporter = ConsoleReporter::new(&mut out, OutputFormat::Text);
        reporter.report(SearchEvent::Match(result(None)));
        reporter.report(SearchEvent::Match(result(Some("public int nextInt();"))));
        reporter.report(SearchEvent::Verbose("Finished search".to_string()));
        drop(reporter);

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "java/util/Random.class\t/libs/rt.jar\n\
             java/util/Random.class\t/libs/rt.jar\tpublic int nextInt();\n"
        );
    }

    #[test]
    fn json_format_writes_one_object_per_line() {
        let mut out = Vec::new();
        let mut reporter = ConsoleReporter::new(&mut out, OutputFormat::Json);
        reporter.report(SearchEvent::Match(result(Some("public int nextInt();"))));
        reporter.report(SearchEvent::Error {
            locator: "/libs/broken.jar".to_string(),
            message: "cannot read archive".to_string(),
        });
        drop(reporter);

        // errors go to tracing, never to the match stream
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 1);
        let value: Value = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(value["display_name"], "java/util/Random.class");
        assert_eq!(value["locator_path"], "/libs/rt.jar");
        assert_eq!(value["kind"], "compiled");
        assert_eq!(value["signature"], "public int nextInt();");
    }
}
