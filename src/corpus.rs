// WHY: Whether the index is per document or corpus-wide is the caller's choice;
// this module makes that choice explicit and records per-document stats

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

use crate::matcher::{AbbrevMatcher, AbbreviationIndex};
use crate::reader::{read_document_lines, DocumentLines};
use crate::sources::DocumentSource;

/// How the matcher index is shared between documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchScope {
    /// Reset before each document; per-document results are merged into the report
    PerDocument,
    /// Keep accumulating across documents
    #[default]
    Corpus,
}

/// Per-document processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DocumentStats {
    pub id: String,
    pub lines_processed: u64,
    /// Long forms recorded while matching this document
    pub long_forms_recorded: u64,
    pub processing_time_ms: u64,
    /// success or failed
    pub status: String,
    pub error: Option<String>,
}

/// Outcome of matching a whole collection
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct CollectionReport {
    pub scope: MatchScope,
    pub documents_processed: u64,
    pub documents_failed: u64,
    pub total_long_forms: u64,
    pub total_processing_time_ms: u64,
    pub documents: Vec<DocumentStats>,
    pub index: AbbreviationIndex,
}

/// Match each line separately; returns how many long forms were recorded.
/// Lines should keep their terminators so a bracket at the end of a line still counts
pub fn extract_lines<'a, I>(matcher: &mut AbbrevMatcher, lines: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    let before = matcher.index().long_form_count();
    for line in lines {
        matcher.match_abbrevs(line);
    }
    (matcher.index().long_form_count() - before) as u64
}

/// Discover pairs in one file, line by line
pub async fn extract_from_file<'m>(
    matcher: &'m mut AbbrevMatcher,
    path: impl AsRef<Path>,
) -> Result<&'m AbbreviationIndex> {
    let path = path.as_ref();
    let document = read_document_lines(path).await?;
    let recorded = extract_lines(matcher, document.iter());
    info!("Matched {}: {} lines, {} long forms recorded", path.display(), document.len(), recorded);
    Ok(matcher.index())
}

/// Discover pairs in every document of `source`.
///
/// Failed fetches are recorded in the report unless `fail_fast` is set.
pub async fn extract_from_collection<S: DocumentSource>(
    matcher: &mut AbbrevMatcher,
    source: &S,
    scope: MatchScope,
    fail_fast: bool,
) -> Result<CollectionReport> {
    let run_start = Instant::now();
    let mut report = CollectionReport {
        scope,
        ..CollectionReport::default()
    };

    for id in source.document_ids() {
        let started = Instant::now();
        if scope == MatchScope::PerDocument {
            matcher.clear_cache();
        }

        let stats = match source.fetch(&id).await {
            Ok(text) => {
                let document = DocumentLines::from_text(&text);
                let recorded = extract_lines(matcher, document.iter());
                if scope == MatchScope::PerDocument {
                    report.index.merge(matcher.index());
                }
                report.documents_processed += 1;
                report.total_long_forms += recorded;
                DocumentStats {
                    id,
                    lines_processed: document.len() as u64,
                    long_forms_recorded: recorded,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    status: "success".to_string(),
                    error: None,
                }
            }
            Err(e) => {
                if fail_fast {
                    return Err(e.context(format!("Failed to fetch document {id}")));
                }
                warn!("Skipping document {}: {}", id, e);
                report.documents_failed += 1;
                DocumentStats {
                    id,
                    lines_processed: 0,
                    long_forms_recorded: 0,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                    status: "failed".to_string(),
                    error: Some(e.to_string()),
                }
            }
        };
        report.documents.push(stats);
    }

    if scope == MatchScope::Corpus {
        report.index = matcher.index().clone();
    }
    report.total_processing_time_ms = run_start.elapsed().as_millis() as u64;
    info!(
        "{} abbreviations discovered in {} documents ({} failed)",
        report.index.len(),
        report.documents_processed,
        report.documents_failed
    );
    Ok(report)
}

/// Substitute abbreviations in a whole file, keeping its text otherwise intact
pub async fn replace_in_file(matcher: &mut AbbrevMatcher, path: impl AsRef<Path>) -> Result<String> {
    let text = tokio::fs::read_to_string(path.as_ref()).await?;
    Ok(matcher.substitute(&text))
}

/// Write a report as pretty JSON
pub async fn write_stats(path: impl AsRef<Path>, report: &CollectionReport) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    let content = serde_json::to_string_pretty(report)?;
    tokio::fs::write(path, content).await?;
    Ok(())
}
