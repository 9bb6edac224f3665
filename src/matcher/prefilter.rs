// WHY: Shape rules for both halves of a pair, kept free of state so they can run
// before any backward walk and be tested in isolation

use super::MatcherConfig;

/// Longest long form accepted, in characters
pub const LONG_FORM_MAX_CHARS: usize = 50;

/// Most ASCII punctuation characters a long form may contain
pub const LONG_FORM_MAX_PUNCTUATION: usize = 2;

/// Case-insensitive comparison of two characters
pub fn same_letter(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Strip ASCII punctuation from both ends
pub fn strip_punctuation(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_ascii_punctuation())
}

pub fn count_punctuation(text: &str) -> usize {
    text.chars().filter(char::is_ascii_punctuation).count()
}

pub fn has_punctuation(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_punctuation())
}

/// True when the text has a lower-case letter and no upper-case one
fn is_all_lowercase(text: &str) -> bool {
    text.chars().any(char::is_lowercase) && !text.chars().any(char::is_uppercase)
}

/// Accept or reject a bracketed candidate by its own characters
pub fn is_valid_abbreviation_shape(candidate: &str, config: &MatcherConfig) -> bool {
    let length = candidate.chars().count();
    if length < config.min_len || length > config.max_len {
        return false;
    }
    if candidate.contains('=') {
        return false;
    }
    if !candidate.chars().any(char::is_alphabetic) {
        return false;
    }
    if is_all_lowercase(candidate) {
        return false;
    }
    !config.abbrev_exclude.contains(candidate)
}

/// Accept or reject a reconstructed long form against its abbreviation
pub fn is_valid_long_form(long_form: &str, abbreviation: &str) -> bool {
    if long_form.chars().count() > LONG_FORM_MAX_CHARS {
        return false;
    }
    if long_form.contains(" .") {
        return false;
    }
    if count_punctuation(long_form) > LONG_FORM_MAX_PUNCTUATION {
        return false;
    }

    let folded = long_form.to_lowercase();
    // Self-referential spans such as "IL6 receptor (IL6)" are never long forms
    if folded.contains(&abbreviation.to_lowercase()) {
        return false;
    }
    abbreviation
        .chars()
        .all(|c| folded.contains(&c.to_lowercase().to_string()))
}
