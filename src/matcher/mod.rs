// WHY: Matcher facade tying the four stages together over one owned index.
// Discovery only appends; substitution reads the index after discovery ran

use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, warn};

pub mod config;
pub mod index;
pub mod locator;
pub mod prefilter;
pub mod reconstruct;
pub mod resolve;

// Re-export core types
pub use config::{read_exclusion_file, MatcherConfig};
pub use index::AbbreviationIndex;
pub use locator::{CandidateLocator, MatchCandidate};
pub use prefilter::{is_valid_abbreviation_shape, is_valid_long_form};
pub use reconstruct::{LongFormReconstructor, WalkState};
pub use resolve::{narrow, resolve, Narrowed, Resolution, RESOLUTION_RULES};

/// Rule-based abbreviation matcher owning its accumulated index
#[derive(Debug)]
pub struct AbbrevMatcher {
    config: MatcherConfig,
    locator: CandidateLocator,
    reconstructor: LongFormReconstructor,
    index: AbbreviationIndex,
}

impl AbbrevMatcher {
    pub fn new(config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            locator: CandidateLocator::new()?,
            reconstructor: LongFormReconstructor::new(config.long_version_max)?,
            index: AbbreviationIndex::new(),
            config,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(MatcherConfig::default())
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn index(&self) -> &AbbreviationIndex {
        &self.index
    }

    /// Discover pairs in `text` and append them to the index
    pub fn match_abbrevs(&mut self, text: &str) -> &AbbreviationIndex {
        self.discover(text);
        &self.index
    }

    /// Reset the index; configuration is kept
    pub fn clear_cache(&mut self) {
        self.index.clear();
    }

    /// Append entries from a previously built index
    pub fn load_index(&mut self, index: &AbbreviationIndex) {
        self.index.merge(index);
    }

    /// Abbreviations recorded by this call, in first-seen order
    fn discover(&mut self, text: &str) -> Vec<String> {
        let mut recorded: Vec<String> = Vec::new();

        for candidate in self.locator.scan(text) {
            let abbreviation = candidate.abbreviation;
            if !is_valid_abbreviation_shape(abbreviation, &self.config) {
                debug!(abbreviation, "Rejected candidate shape");
                continue;
            }

            let Some(long_form) =
                self.reconstructor
                    .reconstruct(text, candidate.offset, candidate.anchor)
            else {
                debug!(abbreviation, "No long form before candidate");
                continue;
            };

            if !is_valid_long_form(&long_form, abbreviation) {
                debug!(abbreviation, long_form = %long_form, "Rejected long form");
                continue;
            }

            debug!(abbreviation, long_form = %long_form, "Recorded pair");
            self.index.record(abbreviation, long_form);
            if !recorded.iter().any(|seen| seen == abbreviation) {
                recorded.push(abbreviation.to_string());
            }
        }

        recorded
    }

    /// Resolve one abbreviation against everything recorded for it
    pub fn resolve(&self, abbreviation: &str) -> Option<Resolution<'_>> {
        let long_forms = self.index.get(abbreviation)?;
        let resolution = resolve(abbreviation, long_forms)?;
        if resolution.ambiguous && self.config.debug {
            warn!(
                abbreviation,
                ?long_forms,
                chosen = resolution.long_form,
                "Ambiguous abbreviation, using first-seen long form"
            );
        }
        Some(resolution)
    }

    /// Discover pairs in `text`, then replace every literal occurrence of each
    /// abbreviation found there with its resolved long form.
    ///
    /// Replacement is plain substring replacement: an abbreviation that also
    /// occurs inside a longer word is replaced there too.
    pub fn substitute(&mut self, text: &str) -> String {
        let discovered: HashSet<String> = self.discover(text).into_iter().collect();
        self.replace_resolved(text, |abbreviation| discovered.contains(abbreviation))
    }

    /// [`substitute`](Self::substitute) for input that may be absent
    pub fn substitute_opt(&mut self, text: Option<&str>) -> Option<String> {
        text.map(|text| self.substitute(text))
    }

    /// Replace every abbreviation in the index without discovering anything new
    pub fn apply_index(&self, text: &str) -> String {
        self.replace_resolved(text, |_| true)
    }

    fn replace_resolved(&self, text: &str, include: impl Fn(&str) -> bool) -> String {
        let mut output = text.to_string();
        for abbreviation in self.index.abbreviations() {
            if !include(abbreviation) {
                continue;
            }
            if let Some(resolution) = self.resolve(abbreviation) {
                output = output.replace(abbreviation, resolution.long_form);
            }
        }
        output
    }
}
