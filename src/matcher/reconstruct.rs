// WHY: Long-form recovery walks the words before a bracket from right to left.
// Each word moves a small state machine instead of breaking out of nested loops

use anyhow::Result;
use regex_automata::meta::Regex;
use tracing::debug;

use super::prefilter::{same_letter, strip_punctuation};

/// Runs of whitespace, slashes and hyphens separate tokens
pub const TOKEN_SEPARATOR_PATTERN: &str = r"[/\s-]+";

/// Words that may share the anchor letter without starting the long form
pub const STOPWORDS: &[&str] = &["and", "also"];

/// From this position on, a matching word right before the bracket wins outright
pub const FALLBACK_POSITION: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    /// Still looking for the word that starts with the anchor character
    Scanning,
    /// The first word of the long form was found
    AnchorFound,
    /// Walk gave up; the span is either the nearest word or nothing
    FallbackTriggered,
}

/// Accumulating state of one backward walk
struct TokenWalk<'t> {
    anchor: char,
    long_version_max: usize,
    last_position: usize,
    first_before: Option<char>,
    span: Vec<&'t str>,
}

impl<'t> TokenWalk<'t> {
    fn new(nearest: &'t str, anchor: char, last_position: usize, long_version_max: usize) -> Self {
        Self {
            anchor,
            long_version_max,
            last_position,
            first_before: nearest.chars().next(),
            span: vec![nearest],
        }
    }

    fn advance(&mut self, position: usize, token: &'t str) -> WalkState {
        let Some(word_start) = strip_punctuation(token).chars().next() else {
            // Punctuation-only tokens hold a position but trigger nothing
            return WalkState::Scanning;
        };

        if same_letter(word_start, self.anchor) {
            self.span.push(token);
            if !is_stopword(token) {
                return WalkState::AnchorFound;
            }
        }

        if position >= FALLBACK_POSITION
            && self.first_before.is_some_and(|c| same_letter(c, self.anchor))
        {
            self.span.truncate(1);
            return WalkState::FallbackTriggered;
        }

        if position == self.last_position {
            if position <= self.long_version_max {
                self.span.truncate(1);
            } else {
                self.span.clear();
            }
            return WalkState::FallbackTriggered;
        }

        // A stopword that matched the anchor lands in the span a second time here
        self.span.push(token);
        WalkState::Scanning
    }

    /// Reading-order span with outer punctuation removed
    fn finish(mut self) -> Option<String> {
        self.span.reverse();
        let joined = self.span.join(" ");
        let long_form = strip_punctuation(&joined);
        (!long_form.is_empty()).then(|| long_form.to_string())
    }
}

fn is_stopword(token: &str) -> bool {
    let lowered = token.to_lowercase();
    STOPWORDS.contains(&lowered.as_str())
}

/// Rebuilds the long form that precedes a bracketed candidate
#[derive(Debug)]
pub struct LongFormReconstructor {
    separator: Regex,
    long_version_max: usize,
}

impl LongFormReconstructor {
    pub fn new(long_version_max: usize) -> Result<Self> {
        Ok(Self {
            separator: Regex::new(TOKEN_SEPARATOR_PATTERN)?,
            long_version_max,
        })
    }

    /// Preceding tokens, nearest first
    fn tokens_before<'t>(&self, text: &'t str, offset: usize) -> Vec<&'t str> {
        let preceding = &text[..offset];
        let mut tokens: Vec<&str> = self
            .separator
            .split(preceding)
            .map(|span| &preceding[span.start..span.end])
            .collect();
        tokens.reverse();
        tokens
    }

    /// Walk back from `offset` and return the long form, if any
    pub fn reconstruct(&self, text: &str, offset: usize, anchor: char) -> Option<String> {
        let tokens = self.tokens_before(text, offset);
        let (&nearest, rest) = tokens.split_first()?;

        let mut walk = TokenWalk::new(nearest, anchor, tokens.len() - 1, self.long_version_max);
        let mut state = WalkState::Scanning;
        for (index, &token) in rest.iter().enumerate() {
            state = walk.advance(index + 1, token);
            if state != WalkState::Scanning {
                break;
            }
        }

        debug!(?state, tokens = walk.span.len(), "Backward walk finished");
        walk.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(text: &str, abbreviation: &str) -> Option<String> {
        let reconstructor = LongFormReconstructor::new(7).unwrap();
        let offset = text.find(&format!(" ({abbreviation})")).unwrap();
        reconstructor.reconstruct(text, offset, abbreviation.chars().next().unwrap())
    }

    #[test]
    fn test_anchor_found_on_first_matching_word() {
        assert_eq!(reconstruct("Interleukin 6 (IL6) is", "IL6").as_deref(), Some("Interleukin 6"));
        assert_eq!(
            reconstruct("levels of Tumor necrosis factor (TNF) rose", "TNF").as_deref(),
            Some("Tumor necrosis factor")
        );
    }

    #[test]
    fn test_anchor_is_case_insensitive() {
        assert_eq!(
            reconstruct("raised tumor necrosis factor (TNF) levels", "TNF").as_deref(),
            Some("tumor necrosis factor")
        );
    }

    #[test]
    fn test_stopword_with_anchor_letter_keeps_walking() {
        assert_eq!(
            reconstruct("Alpha and Beta (AB) x", "AB").as_deref(),
            Some("Alpha and and Beta")
        );
        assert_eq!(
            reconstruct("the Area also Beyond (AB) x", "AB").as_deref(),
            Some("Area also also Beyond")
        );
    }

    #[test]
    fn test_stopword_without_anchor_letter_is_kept_once() {
        assert_eq!(
            reconstruct("Bone and marrow (BM) x", "BM").as_deref(),
            Some("Bone and marrow")
        );
    }

    #[test]
    fn test_double_space_leaves_empty_nearest_token() {
        // The bracket pattern consumes one space, so the nearest token is empty
        assert_eq!(
            reconstruct("Tumor necrosis factor  (TNF) x", "TNF").as_deref(),
            Some("Tumor necrosis factor ")
        );
    }

    #[test]
    fn test_empty_token_at_last_position_skips_fallback() {
        // Leading separator yields an empty last token, so the walk runs out instead
        // of falling back to the nearest word
        let reconstructor = LongFormReconstructor::new(7).unwrap();
        let text = " foo bar baz (XY) x";
        let offset = text.find(" (XY)").unwrap();
        assert_eq!(
            reconstructor.reconstruct(text, offset, 'X').as_deref(),
            Some("foo bar baz")
        );
    }

    #[test]
    fn test_hyphens_and_slashes_split_tokens() {
        assert_eq!(
            reconstruct("Interleukin-6 (IL6) x", "IL6").as_deref(),
            Some("Interleukin 6")
        );
        assert_eq!(
            reconstruct("some input/output (IO) x", "IO").as_deref(),
            Some("input output")
        );
    }

    #[test]
    fn test_start_of_text_falls_back_to_nearest_word() {
        assert_eq!(reconstruct("some words here (XY) x", "XY").as_deref(), Some("here"));
    }

    #[test]
    fn test_long_context_without_anchor_yields_nothing() {
        let text = "one two three four five six seven eight nine ten (XY) x";
        assert_eq!(reconstruct(text, "XY"), None);
    }

    #[test]
    fn test_eighth_token_fallback_uses_nearest_word() {
        let text = "one two three four five six seven eight nine xenon (XY) z";
        assert_eq!(reconstruct(text, "XY").as_deref(), Some("xenon"));
    }

    #[test]
    fn test_outer_punctuation_is_stripped() {
        assert_eq!(
            reconstruct("(Tumor necrosis factor (TNF) x", "TNF").as_deref(),
            Some("Tumor necrosis factor")
        );
        assert_eq!(
            reconstruct("we saw: \"Bone marrow\", (BM) x", "BM").as_deref(),
            Some("Bone marrow")
        );
    }

    #[test]
    fn test_punctuation_only_tokens_are_skipped() {
        assert_eq!(
            reconstruct("Heat shock - protein (HSP) x", "HSP").as_deref(),
            Some("Heat shock protein")
        );
        // Skipped tokens are not carried into the span either
        assert_eq!(
            reconstruct("Heat ... shock protein (HSP) x", "HSP").as_deref(),
            Some("Heat shock protein")
        );
    }

    #[test]
    fn test_empty_preceding_text() {
        let reconstructor = LongFormReconstructor::new(7).unwrap();
        assert_eq!(reconstructor.reconstruct("(AB) x", 0, 'A'), None);
    }
}
