// WHY: Matcher settings are fixed at construction; loading and validation live here
// so the CLI, tests and library callers build them the same way

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Construction-time settings for an [`AbbrevMatcher`](super::AbbrevMatcher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    /// Shortest accepted abbreviation, in characters
    pub min_len: usize,
    /// Longest accepted abbreviation, in characters
    pub max_len: usize,
    /// Look-back token count up to which a walk that reaches the start of the text keeps the nearest word
    pub long_version_max: usize,
    /// Abbreviations that are always rejected
    pub abbrev_exclude: HashSet<String>,
    /// Report ambiguous resolutions as warnings
    pub debug: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 4,
            long_version_max: 7,
            abbrev_exclude: HashSet::new(),
            debug: false,
        }
    }
}

impl MatcherConfig {
    /// Add abbreviations to the exclusion set
    pub fn with_excluded<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abbrev_exclude
            .extend(abbreviations.into_iter().map(Into::into));
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_len == 0 {
            bail!("min_len must be at least 1");
        }
        if self.min_len > self.max_len {
            bail!(
                "min_len ({}) must not exceed max_len ({})",
                self.min_len,
                self.max_len
            );
        }
        Ok(())
    }

    /// Parse TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid matcher configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Cannot load config file {}", path.display()))
    }
}

/// Read an exclusion list, one abbreviation per line; blank lines and `#` comments are ignored
pub fn read_exclusion_file(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read exclusion file {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}
