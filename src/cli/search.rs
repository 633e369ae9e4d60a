//! One-shot search over a text or over each line of a file.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::cache::{CachePolicy, ResultCache};
use crate::embedding::Embedder;
use crate::matching::{MatchEngine, MatchError, MatchOutcome};

const SEPARATOR_WIDTH: usize = 50;

/// Where documents come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    /// A single document.
    Text(String),
    /// One document per non-blank line.
    File(PathBuf),
}

/// Runs queries against documents and prints the results.
///
/// Outcomes are memoized for the session, so repeated lines are evaluated once.
pub struct Searcher<E> {
    engine: MatchEngine<E>,
    cache: ResultCache<MatchOutcome>,
    threshold: f32,
}

impl<E: Embedder> Searcher<E> {
    pub fn new(engine: MatchEngine<E>, threshold: f32) -> Self {
        Self {
            engine,
            cache: ResultCache::new(CachePolicy::Unbounded),
            threshold,
        }
    }

    pub fn engine(&self) -> &MatchEngine<E> {
        &self.engine
    }

    pub fn cache(&self) -> &ResultCache<MatchOutcome> {
        &self.cache
    }

    pub fn run<W: Write>(&self, out: &mut W, input: &SearchInput, query: &str) -> io::Result<()> {
        match input {
            SearchInput::Text(document) => self.process_document(out, document, query, None),
            SearchInput::File(path) => self.process_file(out, path, query),
        }
    }

    /// Prints the document, the query, and the result block for one document.
    pub fn process_document<W: Write>(
        &self,
        out: &mut W,
        document: &str,
        query: &str,
        line_num: Option<usize>,
    ) -> io::Result<()> {
        info!(query, document, line_num, "Processing document");

        writeln!(out, "Document: '{document}'")?;
        writeln!(out, "Query: '{query}'")?;

        match self.evaluate(document, query) {
            Ok(MatchOutcome::Accepted(result)) => {
                writeln!(
                    out,
                    "Result: Phrase - {}, Position: {}, Score: {:.4}",
                    result.matched_text(),
                    result.position(),
                    result.score
                )?;
                info!(
                    found = true,
                    matched = result.matched_text(),
                    position = %result.position(),
                    score = result.score,
                    query,
                    line_num,
                    "Search result"
                );
            }
            Ok(outcome) => {
                if let Some(reason) = outcome.reject_reason() {
                    warn!(%reason, query, line_num, "Document rejected");
                }
                writeln!(out, "No matches found for '{query}' in the document")?;
                info!(
                    found = false,
                    score = outcome.score(),
                    query,
                    line_num,
                    "Search result"
                );
            }
            Err(e) => {
                error!(error = %e, query, line_num, "Match failed");
                writeln!(out, "Error: {e}")?;
            }
        }

        writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    /// Processes each trimmed, non-blank line as its own document.
    ///
    /// An unreadable file is reported on `out` and in the log; only write failures
    /// on `out` are returned.
    pub fn process_file<W: Write>(&self, out: &mut W, path: &Path, query: &str) -> io::Result<()> {
        info!(filename = %path.display(), "Processing file");

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return report_read_error(out, path, &e),
        };

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => return report_read_error(out, path, &e),
            };
            let document = line.trim();
            if document.is_empty() {
                continue;
            }

            let line_num = idx + 1;
            writeln!(out, "\nLine {line_num}:")?;
            self.process_document(out, document, query, Some(line_num))?;
        }

        Ok(())
    }

    fn evaluate(&self, document: &str, query: &str) -> Result<MatchOutcome, MatchError> {
        let lookup = self
            .cache
            .get_or_compute(document, query, self.threshold, || {
                self.engine.find_match(document, query, self.threshold)
            })?;

        if lookup.hit {
            debug!(query, "Result cache hit");
        }
        Ok(lookup.value)
    }
}

fn report_read_error<W: Write>(out: &mut W, path: &Path, err: &io::Error) -> io::Result<()> {
    let message = if err.kind() == io::ErrorKind::NotFound {
        format!("File '{}' not found", path.display())
    } else {
        format!("Error reading file: {err}")
    };

    error!(error = %message, filename = %path.display(), "File read failed");
    writeln!(out, "Error: {message}")
}
