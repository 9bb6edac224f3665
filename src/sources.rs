// WHY: Document retrieval and section extraction are collaborators of the matcher.
// Only their interfaces live here, plus plain-text implementations for local corpora

use anyhow::{bail, Result};
use regex_automata::meta::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::discovery::{collect_discovered_files, DiscoveryConfig};
use crate::matcher::AbbrevMatcher;
use crate::reader::read_document;

/// Yields raw text per document identifier
#[allow(async_fn_in_trait)]
pub trait DocumentSource {
    /// Identifiers in processing order
    fn document_ids(&self) -> Vec<String>;

    async fn fetch(&self, id: &str) -> Result<String>;
}

/// Named piece of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub text: String,
}

impl Section {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

/// Splits a document into named sections; the matcher treats each as opaque text
pub trait SectionExtractor {
    fn sections(&self, document: &str) -> Vec<Section>;
}

/// Directory of `<id>.txt` documents
#[derive(Debug, Clone)]
pub struct TextDirSource {
    documents: Vec<(String, PathBuf)>,
}

impl TextDirSource {
    /// Every document found under `root`, identified by file stem
    pub async fn discover(root: impl AsRef<Path>, config: DiscoveryConfig) -> Result<Self> {
        let validations = collect_discovered_files(root.as_ref(), config).await?;
        let documents: Vec<(String, PathBuf)> = validations
            .into_iter()
            .filter(|v| v.error.is_none())
            .filter_map(|v| {
                let id = v.path.file_stem()?.to_string_lossy().to_string();
                Some((id, v.path))
            })
            .collect();
        info!("Document source has {} documents under {}", documents.len(), root.as_ref().display());
        Ok(Self { documents })
    }

    /// Only the listed identifiers, resolved to `<root>/<id>.txt`
    pub fn from_ids<I, S>(root: impl AsRef<Path>, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let root = root.as_ref();
        let documents = ids
            .into_iter()
            .map(Into::into)
            .map(|id: String| {
                let path = root.join(format!("{id}.txt"));
                (id, path)
            })
            .collect();
        Self { documents }
    }

    /// Read an id list, one identifier per line
    pub async fn from_id_file(root: impl AsRef<Path>, id_file: impl AsRef<Path>) -> Result<Self> {
        let content = read_document(id_file).await?;
        let ids: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Self::from_ids(root, ids))
    }

    pub fn path_of(&self, id: &str) -> Option<&Path> {
        self.documents
            .iter()
            .find(|(candidate, _)| candidate == id)
            .map(|(_, path)| path.as_path())
    }
}

impl DocumentSource for TextDirSource {
    fn document_ids(&self) -> Vec<String> {
        self.documents.iter().map(|(id, _)| id.clone()).collect()
    }

    async fn fetch(&self, id: &str) -> Result<String> {
        let Some(path) = self.path_of(id) else {
            bail!("Unknown document id: {id}");
        };
        debug!("Fetching document {} from {}", id, path.display());
        read_document(path).await
    }
}

/// The whole document as one `TEXT` section
#[derive(Debug, Clone, Copy, Default)]
pub struct WholeDocument;

impl SectionExtractor for WholeDocument {
    fn sections(&self, document: &str) -> Vec<Section> {
        vec![Section::new("TEXT", document)]
    }
}

/// Blank-line separated paragraphs. A paragraph opening with an upper-case
/// label such as `METHODS:` is named after it; others are `P1`, `P2`, ...
#[derive(Debug)]
pub struct ParagraphSections {
    label: Regex,
}

impl ParagraphSections {
    pub fn new() -> Result<Self> {
        Ok(Self {
            label: Regex::new(r"^[A-Z][A-Z ]*[A-Z]:")?,
        })
    }

    fn section_for(&self, number: usize, paragraph: &str) -> Section {
        match self.label.find(paragraph) {
            Some(found) => Section::new(
                &paragraph[..found.end() - 1],
                paragraph[found.end()..].trim_start(),
            ),
            None => Section::new(format!("P{number}"), paragraph),
        }
    }
}

impl SectionExtractor for ParagraphSections {
    fn sections(&self, document: &str) -> Vec<Section> {
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in document.lines() {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    paragraphs.push(current.join("\n"));
                    current.clear();
                }
            } else {
                current.push(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current.join("\n"));
        }

        paragraphs
            .iter()
            .enumerate()
            .map(|(i, paragraph)| self.section_for(i + 1, paragraph))
            .collect()
    }
}

/// Normalize the sections of one document in order with one matcher. Each
/// section is matched first, then every pair known so far is applied, so an
/// abbreviation defined in an earlier section is expanded in later ones too
pub fn normalize_sections(matcher: &mut AbbrevMatcher, sections: Vec<Section>) -> Vec<Section> {
    sections
        .into_iter()
        .map(|section| {
            matcher.match_abbrevs(&section.text);
            Section {
                text: matcher.apply_index(&section.text),
                name: section.name,
            }
        })
        .collect()
}
