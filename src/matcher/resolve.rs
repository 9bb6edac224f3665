// WHY: Picking one long form per abbreviation is a fixed sequence of narrowing rules.
// The table is evaluated in order and the first rule that applies decides

use super::prefilter::has_punctuation;

/// A narrowing rule: returns indices of the long forms it keeps, or None when it does not apply
pub type RuleFn = fn(abbreviation: &str, long_forms: &[String]) -> Option<Vec<usize>>;

#[derive(Debug, Clone, Copy)]
pub struct ResolutionRule {
    pub name: &'static str,
    pub apply: RuleFn,
}

pub const RESOLUTION_RULES: &[ResolutionRule] = &[
    ResolutionRule { name: "case-fold", apply: case_fold_identical },
    ResolutionRule { name: "gene-suffix", apply: gene_suffix_identical },
    ResolutionRule { name: "initials", apply: initials_cover_abbreviation },
    ResolutionRule { name: "punctuation-free", apply: punctuation_free },
];

/// All forms are the same ignoring case: keep the first
fn case_fold_identical(_abbreviation: &str, long_forms: &[String]) -> Option<Vec<usize>> {
    let first = long_forms.first()?.to_lowercase();
    long_forms
        .iter()
        .all(|long_form| long_form.to_lowercase() == first)
        .then(|| vec![0])
}

fn without_gene_suffix(long_form: &str) -> String {
    let lowered = long_form.to_lowercase();
    lowered
        .strip_suffix("gene")
        .unwrap_or(&lowered)
        .trim_end()
        .to_string()
}

/// Forms differ only by a trailing "gene": keep the first one without it.
/// When every form ends in "gene" nothing survives and resolution falls back to first-seen
fn gene_suffix_identical(_abbreviation: &str, long_forms: &[String]) -> Option<Vec<usize>> {
    let first = without_gene_suffix(long_forms.first()?);
    if !long_forms.iter().all(|long_form| without_gene_suffix(long_form) == first) {
        return None;
    }
    Some(
        long_forms
            .iter()
            .position(|long_form| !long_form.ends_with("gene"))
            .into_iter()
            .collect(),
    )
}

/// First form whose word initials include every character of the abbreviation
fn initials_cover_abbreviation(abbreviation: &str, long_forms: &[String]) -> Option<Vec<usize>> {
    long_forms
        .iter()
        .position(|long_form| {
            let initials: Vec<String> = long_form
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .map(|c| c.to_lowercase().to_string())
                .collect();
            abbreviation
                .chars()
                .all(|c| initials.contains(&c.to_lowercase().to_string()))
        })
        .map(|position| vec![position])
}

/// Every form without any punctuation
fn punctuation_free(_abbreviation: &str, long_forms: &[String]) -> Option<Vec<usize>> {
    let clean: Vec<usize> = long_forms
        .iter()
        .enumerate()
        .filter(|(_, long_form)| !has_punctuation(long_form))
        .map(|(position, _)| position)
        .collect();
    (!clean.is_empty()).then_some(clean)
}

/// Candidates left after the rule table ran
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Narrowed {
    pub candidates: Vec<usize>,
    /// Name of the rule that produced the candidates, None when no rule applied
    pub rule: Option<&'static str>,
}

/// Run the rule table; the first rule that applies decides, even when it keeps nothing
pub fn narrow(abbreviation: &str, long_forms: &[String]) -> Narrowed {
    for rule in RESOLUTION_RULES {
        if let Some(candidates) = (rule.apply)(abbreviation, long_forms) {
            return Narrowed { candidates, rule: Some(rule.name) };
        }
    }
    Narrowed {
        candidates: (0..long_forms.len()).collect(),
        rule: None,
    }
}

/// Long form chosen for substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub long_form: &'a str,
    pub rule: Option<&'static str>,
    /// More than one candidate survived, so the first-seen form was used
    pub ambiguous: bool,
}

/// Pick one long form: the single survivor of narrowing, otherwise the first seen
pub fn resolve<'a>(abbreviation: &str, long_forms: &'a [String]) -> Option<Resolution<'a>> {
    let first_seen = long_forms.first()?;
    let narrowed = narrow(abbreviation, long_forms);
    let resolution = match narrowed.candidates.as_slice() {
        [only] => Resolution {
            long_form: &long_forms[*only],
            rule: narrowed.rule,
            ambiguous: false,
        },
        _ => Resolution {
            long_form: first_seen,
            rule: narrowed.rule,
            ambiguous: true,
        },
    };
    Some(resolution)
}
