// WHY: Bracketed-span scanner. The character after ")" must be a non-word character,
// but it is only peeked, so the next scan may start on it

use anyhow::Result;
use regex_automata::{meta::Regex, Anchored, Input};
use tracing::debug;

/// Optional whitespace, then a parenthesised run without nested parentheses
pub const BRACKET_PATTERN: &str = r"\s?\([^()]+\)";

const WORD_CHAR_PATTERN: &str = r"\w";

/// A bracketed abbreviation candidate found in source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchCandidate<'h> {
    /// Byte offset where the match starts (including the optional leading whitespace)
    pub offset: usize,
    /// Candidate text with whitespace, punctuation and brackets stripped
    pub abbreviation: &'h str,
    /// First character of the abbreviation, compared case-insensitively
    pub anchor: char,
}

/// Compiled patterns for locating candidates
#[derive(Debug)]
pub struct CandidateLocator {
    bracket: Regex,
    word_char: Regex,
}

impl CandidateLocator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            bracket: Regex::new(BRACKET_PATTERN)?,
            word_char: Regex::new(WORD_CHAR_PATTERN)?,
        })
    }

    /// Lazily scan `text` for candidates; clone the iterator to restart from the same point
    pub fn scan<'r, 'h>(&'r self, text: &'h str) -> Candidates<'r, 'h> {
        Candidates {
            locator: self,
            text,
            position: 0,
        }
    }

    fn followed_by_non_word(&self, text: &str, end: usize) -> bool {
        if end >= text.len() {
            return false;
        }
        let input = Input::new(text).range(end..).anchored(Anchored::Yes);
        !self.word_char.is_match(input)
    }
}

/// Strip surrounding whitespace, trailing punctuation and the opening bracket
pub fn derive_candidate(raw: &str) -> &str {
    raw.trim()
        .trim_end_matches(|c: char| c.is_ascii_punctuation())
        .trim_start_matches('(')
}

/// Iterator over candidates in one text
#[derive(Debug, Clone)]
pub struct Candidates<'r, 'h> {
    locator: &'r CandidateLocator,
    text: &'h str,
    position: usize,
}

impl<'r, 'h> Iterator for Candidates<'r, 'h> {
    type Item = MatchCandidate<'h>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.text.len() {
            let input = Input::new(self.text).range(self.position..);
            let found = self.locator.bracket.find(input)?;
            self.position = found.end();

            if !self.locator.followed_by_non_word(self.text, found.end()) {
                continue;
            }

            let abbreviation = derive_candidate(&self.text[found.range()]);
            let Some(anchor) = abbreviation.chars().next() else {
                debug!(offset = found.start(), "Skipping bracket with no candidate text");
                continue;
            };

            return Some(MatchCandidate {
                offset: found.start(),
                abbreviation,
                anchor,
            });
        }
        None
    }
}
